//! Pagination module
//!
//! Turns any cursor-paginated list operation into a `has_next`/`get_next`
//! iteration contract.
//!
//! # Overview
//!
//! A [`Pager`] is written once and bound to each endpoint through a thin
//! [`ListOperation`] implementation. The endpoint's response type implements
//! [`Paginated`] to say where its items and its next cursor live, and its
//! options type implements [`PageRequest`] to say which field carries the
//! cursor.
//!
//! ```text
//!   Fresh ──get_next()──▶ InProgress ──get_next()──▶ Exhausted
//!     │                    ▲      │
//!     │                    └──────┘ cursor present
//!     └───────────── no cursor ──────────────────────▶ Exhausted
//! ```

mod pager;
mod types;

pub use pager::{Pager, PagerPhase};
pub use types::{list_fn, ListFn, ListOperation, Page, PageRequest, Paginated};
