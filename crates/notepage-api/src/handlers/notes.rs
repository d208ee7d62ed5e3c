//! Unpaged note listing and the root greeting.

use std::time::Instant;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::info;

use crate::{ApiError, AppState};

pub async fn hello() -> &'static str {
    "Hello World!"
}

/// List every note with its owner's name, newest first.
pub async fn list_note_items(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let items = state.notes.list_with_users().await?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "list_note_items",
        result_count = items.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Listed note items"
    );
    Ok(Json(items))
}
