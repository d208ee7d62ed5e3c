//! # notepage-core
//!
//! Core types, traits, and pagination algorithms for notepage.
//!
//! This crate provides the note data model, the opaque cursor codec, the
//! [`NoteQueryRepository`] abstraction the storage crates implement, and the
//! cursor/offset pagination algorithms the HTTP layer calls.

pub mod cursor;
pub mod defaults;
pub mod error;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use cursor::{decode_cursor, encode_cursor, Cursor, CURSOR_VERSION};
pub use error::{Error, Result};
pub use memory::InMemoryNoteRepository;
pub use models::*;
pub use pagination::{
    paginate_by_cursor, paginate_by_offset, CursorPageRequest, OffsetPageRequest,
};
pub use traits::*;
pub use uuid_utils::{new_v7, v7_from_millis};
