//! Opaque continuation tokens for cursor pagination.
//!
//! A cursor is the `(note_date, id)` key of the first row of the next page
//! plus a version tag, serialized as JSON and then base64url-encoded without
//! padding so it can travel in a query string unescaped:
//!
//! ```text
//! {"date":"2025-01-04","last_id":"0190...","version":1}  ->  eyJkYXRlIjoi...
//! ```
//!
//! Tokens are opaque but not signed. A forged token decodes to an arbitrary
//! position and yields a shifted page, never a corrupted one.
//!
//! Decoding never fails loudly: anything that is not a well-formed token is
//! reported as `None`, which callers treat as "start from the beginning".
//! A well-formed token with a different `version` decodes successfully so the
//! caller can reject it explicitly.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::NoteKey;

/// The only cursor layout this server knows how to resume.
pub const CURSOR_VERSION: i32 = 1;

fn default_version() -> i32 {
    CURSOR_VERSION
}

/// Decoded continuation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub date: NaiveDate,
    pub last_id: Uuid,
    #[serde(default = "default_version")]
    pub version: i32,
}

impl Cursor {
    /// Create a current-version cursor.
    pub fn new(date: NaiveDate, last_id: Uuid) -> Self {
        Self {
            date,
            last_id,
            version: CURSOR_VERSION,
        }
    }

    /// Create a current-version cursor positioned at `key`.
    pub fn from_key(key: NoteKey) -> Self {
        Self::new(key.note_date, key.id)
    }

    /// The sort key this cursor resumes from.
    pub fn key(&self) -> NoteKey {
        NoteKey {
            note_date: self.date,
            id: self.last_id,
        }
    }

    /// Whether this server can resume from the cursor.
    pub fn is_supported(&self) -> bool {
        self.version == CURSOR_VERSION
    }

    /// Encode into an opaque URL-safe token.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// Returns `None` for a missing or empty token and for any token that is
    /// not valid base64url, not UTF-8 JSON, or lacks `date`/`last_id`.
    /// A missing `version` field is read as [`CURSOR_VERSION`].
    pub fn decode(encoded: Option<&str>) -> Option<Self> {
        let encoded = encoded?;
        if encoded.is_empty() {
            return None;
        }

        // Accept padded tokens from clients that re-encode with standard padding.
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Encode a `(date, last_id, version)` triple into an opaque token.
pub fn encode_cursor(date: NaiveDate, last_id: Uuid, version: i32) -> Result<String> {
    Cursor {
        date,
        last_id,
        version,
    }
    .encode()
}

/// Decode a token into its `(date, last_id, version)` triple.
pub fn decode_cursor(encoded: Option<&str>) -> Option<(NaiveDate, Uuid, i32)> {
    Cursor::decode(encoded).map(|c| (c.date, c.last_id, c.version))
}
