//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by every binding.

use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// One page of results from a list operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in the order the service returned them
    pub items: Vec<T>,
    /// Cursor for the following page; absent or empty ends the listing
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Create a page that continues at `cursor`
    pub fn with_cursor(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self::new(items, Some(cursor.into()))
    }

    /// Create the final page of a listing
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Check if the service reported a further page
    pub fn has_more(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Filter parameters of a paginated listing
///
/// Implementors are plain values. A pager never mutates the request it was
/// built with; each fetch derives a fresh value through [`with_cursor`].
///
/// [`with_cursor`]: PageRequest::with_cursor
pub trait PageRequest: Clone + Send + Sync {
    /// Wire name of the cursor field (e.g. `page_token`)
    const CURSOR_FIELD: &'static str;

    /// The cursor carried by this request, if any
    fn cursor(&self) -> Option<&str>;

    /// A copy of this request resuming at `cursor`
    fn with_cursor(&self, cursor: &str) -> Self;

    /// A copy of this request with the cursor slot cleared
    fn without_cursor(&self) -> Self;
}

/// A response body that holds one page of a listing
pub trait Paginated {
    /// The individual item type within a page
    type Item;

    /// Returns the cursor for the next page, if any
    fn next_cursor(&self) -> Option<String>;

    /// Returns the items from this page
    fn into_items(self) -> Vec<Self::Item>;

    /// Split the response into a [`Page`]
    fn into_page(self) -> Page<Self::Item>
    where
        Self: Sized,
    {
        let next_cursor = self.next_cursor();
        Page::new(self.into_items(), next_cursor)
    }
}

/// A single cursor-paginated list call
///
/// Implementations must be idempotent reads: the pager re-issues the exact
/// same request when a caller retries after a failure.
#[async_trait]
pub trait ListOperation: Send + Sync {
    /// Filter parameters, including the cursor slot
    type Request: PageRequest;
    /// Element type of the listing
    type Item: Send;

    /// Fetch the page addressed by `request`
    async fn list(&self, request: &Self::Request) -> Result<Page<Self::Item>>;
}

/// [`ListOperation`] backed by an async closure
pub struct ListFn<F, R, T> {
    f: F,
    _marker: PhantomData<fn(R) -> T>,
}

/// Adapt an async closure into a [`ListOperation`]
///
/// ```rust,ignore
/// let op = list_fn(|req: MyRequest| async move { client.fetch(req).await });
/// let mut pager = Pager::new(op, MyRequest::default())?;
/// ```
pub fn list_fn<F, Fut, R, T>(f: F) -> ListFn<F, R, T>
where
    F: Fn(R) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send,
    R: PageRequest,
    T: Send,
{
    ListFn {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, R, T> ListOperation for ListFn<F, R, T>
where
    F: Fn(R) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send,
    R: PageRequest + 'static,
    T: Send + 'static,
{
    type Request = R;
    type Item = T;

    async fn list(&self, request: &R) -> Result<Page<T>> {
        (self.f)(request.clone()).await
    }
}

impl<F, R, T> std::fmt::Debug for ListFn<F, R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListFn").finish_non_exhaustive()
    }
}
