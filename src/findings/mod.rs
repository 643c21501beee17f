//! Findings service
//!
//! Notes and occurrences under `/v1/{account_id}`. Listings are cursor
//! paginated: the cursor travels as the `page_token` query parameter and
//! comes back in `next_page_token`.

mod client;
mod models;

pub use client::{
    FindingsClient, ListNoteOccurrences, ListNoteOccurrencesOptions, ListNotes, ListNotesOptions,
    ListOccurrences, ListOccurrencesOptions,
};
pub use models::{
    ApiNote, ApiOccurrence, Finding, ListNotesResponse, ListOccurrencesResponse, NoteKind,
    Severity,
};

#[cfg(test)]
mod tests;
