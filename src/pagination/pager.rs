//! Generic cursor pager
//!
//! A `Pager` owns one copy of the filter parameters, the cursor returned by
//! the previous page, and nothing else. It is single-owner: `get_next` takes
//! `&mut self`, so only one fetch can be in flight per pager.

use super::types::{ListOperation, Page, PageRequest};
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

/// Cursor progression of a pager
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CursorState {
    /// No page fetched yet
    Fresh,
    /// Previous page handed back this cursor
    InProgress(String),
    /// Service reported no further cursor
    Exhausted,
}

/// Observable position of a pager in its listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerPhase {
    /// Constructed, nothing fetched yet
    Fresh,
    /// At least one page fetched and more remain
    InProgress,
    /// Listing complete; no further calls will be made
    Exhausted,
}

/// Iterates a cursor-paginated listing one page at a time
///
/// ```rust,ignore
/// let mut pager = findings.notes_pager(ListNotesOptions::new("my-provider"))?;
/// while pager.has_next() {
///     for note in pager.get_next().await? {
///         println!("{}", note.id);
///     }
/// }
/// ```
///
/// A failed `get_next` leaves the pager exactly where it was, so calling it
/// again repeats the same request. The pager never retries on its own.
pub struct Pager<O: ListOperation> {
    operation: O,
    request: O::Request,
    pub(super) state: CursorState,
    pages_fetched: usize,
}

impl<O: ListOperation> Pager<O> {
    /// Create a pager over `operation` with fixed filter parameters
    ///
    /// Fails with [`Error::CursorPreset`] if `request` already carries a
    /// cursor. An empty cursor is cleared so the first call omits it. No
    /// call is made before the first `get_next`.
    pub fn new(operation: O, request: O::Request) -> Result<Self> {
        let request = match request.cursor().map(str::is_empty) {
            None => request,
            Some(true) => request.without_cursor(),
            Some(false) => {
                return Err(Error::cursor_preset(
                    <O::Request as PageRequest>::CURSOR_FIELD,
                ))
            }
        };

        Ok(Self {
            operation,
            request,
            state: CursorState::Fresh,
            pages_fetched: 0,
        })
    }

    /// Check whether another page may be fetched
    pub fn has_next(&self) -> bool {
        !matches!(self.state, CursorState::Exhausted)
    }

    /// Current position in the listing
    pub fn phase(&self) -> PagerPhase {
        match self.state {
            CursorState::Fresh => PagerPhase::Fresh,
            CursorState::InProgress(_) => PagerPhase::InProgress,
            CursorState::Exhausted => PagerPhase::Exhausted,
        }
    }

    /// Number of pages fetched successfully so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The filter parameters this pager was built with
    pub fn request(&self) -> &O::Request {
        &self.request
    }

    /// Fetch the next page
    ///
    /// Fails with [`Error::PagerExhausted`] once `has_next()` is false.
    /// Errors from the list operation are returned unchanged and leave the
    /// cursor untouched.
    pub async fn get_next(&mut self) -> Result<Vec<O::Item>> {
        let request = match &self.state {
            CursorState::Exhausted => return Err(Error::PagerExhausted),
            CursorState::Fresh => self.request.clone(),
            CursorState::InProgress(cursor) => self.request.with_cursor(cursor),
        };

        // State is only written after the call resolves; a failed or
        // dropped call leaves it as it was.
        let Page { items, next_cursor } = self.operation.list(&request).await?;

        self.pages_fetched += 1;
        self.state = match next_cursor.none_if_empty() {
            Some(cursor) => CursorState::InProgress(cursor),
            None => CursorState::Exhausted,
        };

        debug!(
            page = self.pages_fetched,
            items = items.len(),
            exhausted = !self.has_next(),
            "fetched page"
        );

        Ok(items)
    }

    /// Fetch every remaining page and concatenate the items in page order
    ///
    /// On error the items gathered so far are dropped and the error is
    /// returned; use `get_next` or [`into_pages`](Self::into_pages) to keep
    /// partial results.
    pub async fn get_all(&mut self) -> Result<Vec<O::Item>> {
        let mut all = Vec::new();
        while self.has_next() {
            let items = self.get_next().await?;
            all.extend(items);
        }
        Ok(all)
    }

    /// Convert into a stream yielding one `Vec` per page
    ///
    /// The stream ends after the final page, or after the first error.
    pub fn into_pages(self) -> impl Stream<Item = Result<Vec<O::Item>>> {
        stream::try_unfold(self, advance)
    }

    /// Convert into a stream of individual items
    pub fn into_items(self) -> impl Stream<Item = Result<O::Item>> {
        self.into_pages()
            .map_ok(|items| stream::iter(items.into_iter().map(Ok::<_, Error>)))
            .try_flatten()
    }
}

async fn advance<O: ListOperation>(
    mut pager: Pager<O>,
) -> Result<Option<(Vec<O::Item>, Pager<O>)>> {
    if !pager.has_next() {
        return Ok(None);
    }
    let items = pager.get_next().await?;
    Ok(Some((items, pager)))
}

impl<O: ListOperation> std::fmt::Debug for Pager<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("phase", &self.phase())
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
