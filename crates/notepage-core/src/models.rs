//! Core data models for notepage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ENTITIES
// =============================================================================

/// A note row as stored in `notes.user_notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// UUIDv7, later notes compare greater.
    pub id: Uuid,
    /// Owning user (`identity.users.id`).
    pub user_id: Uuid,
    /// Free text, at most [`crate::defaults::NOTE_MAX_LEN`] characters.
    pub note: String,
    /// Calendar date the note belongs to. Not unique.
    pub note_date: NaiveDate,
}

impl Note {
    /// The composite key this note sorts by.
    pub fn key(&self) -> NoteKey {
        NoteKey {
            note_date: self.note_date,
            id: self.id,
        }
    }
}

/// A user row as stored in `identity.users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// Composite sort key `(note_date, id)`.
///
/// Field order matters: the derived `Ord` compares `note_date` first and
/// falls back to `id`, which is the same row comparison PostgreSQL applies to
/// `(note_date, id) <= ($1, $2)`. Pages are emitted in descending key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteKey {
    pub note_date: NaiveDate,
    pub id: Uuid,
}

// =============================================================================
// RESPONSE PROJECTIONS
// =============================================================================

/// Public projection of a [`Note`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub note: String,
    pub note_date: NaiveDate,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            user_id: note.user_id,
            note: note.note,
            note_date: note.note_date,
        }
    }
}

/// A note joined with its owner's name, as returned by the unpaged listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteWithUser {
    pub id: Uuid,
    pub note: String,
    pub note_date: NaiveDate,
    pub user_id: Uuid,
    pub user_name: String,
}

// =============================================================================
// PAGINATED RESPONSES
// =============================================================================

/// Pagination state for a cursor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorMetadata {
    pub limit: i64,
    pub has_more: bool,
    /// Present exactly when `has_more` is true.
    pub next_cursor: Option<String>,
}

/// One page of notes produced by cursor pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPage {
    pub items: Vec<NoteResponse>,
    pub metadata: CursorMetadata,
}

/// Pagination state for an offset page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetMetadata {
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// One page of notes produced by offset pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage {
    pub items: Vec<NoteResponse>,
    pub metadata: OffsetMetadata,
}
