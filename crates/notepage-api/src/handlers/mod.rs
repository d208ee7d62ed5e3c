//! HTTP handlers for notepage-api.

pub mod cursor;
pub mod health;
pub mod notes;
pub mod offset;
