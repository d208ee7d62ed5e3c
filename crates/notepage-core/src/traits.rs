//! Core traits for notepage abstractions.
//!
//! The pagination algorithms depend only on [`NoteQueryRepository`], so any
//! store that can return notes in `(note_date DESC, id DESC)` order with an
//! optional inclusive upper bound can back them.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteKey, NoteWithUser};

// =============================================================================
// NOTE QUERY REPOSITORY
// =============================================================================

/// A bounded, ordered read over the notes table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotePageQuery {
    /// Inclusive upper bound: only rows with `(note_date, id) <= before`.
    pub before: Option<NoteKey>,
    /// Rows to skip after ordering and filtering.
    pub offset: i64,
    /// Maximum rows to return.
    pub limit: i64,
}

impl NotePageQuery {
    /// Query for the first `limit` rows, optionally starting at `before`.
    pub fn keyset(before: Option<NoteKey>, limit: i64) -> Self {
        Self {
            before,
            offset: 0,
            limit,
        }
    }

    /// Query for a skip/take window with no key bound.
    pub fn window(offset: i64, limit: i64) -> Self {
        Self {
            before: None,
            offset,
            limit,
        }
    }
}

/// Read-only access to ordered note records.
///
/// Every method is a single cancellable query: dropping the returned future
/// aborts it without side effects.
#[async_trait]
pub trait NoteQueryRepository: Send + Sync {
    /// Return rows ordered by `(note_date DESC, id DESC)` matching `query`.
    async fn fetch_page(&self, query: NotePageQuery) -> Result<Vec<Note>>;

    /// Count all rows.
    async fn count(&self) -> Result<i64>;

    /// Return every note joined with its owner's name, newest first.
    async fn list_with_users(&self) -> Result<Vec<NoteWithUser>>;
}
