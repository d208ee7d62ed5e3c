//! Cursor (keyset) pagination endpoint.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{ApiError, AppState};
use notepage_core::defaults::DEFAULT_LIMIT;
use notepage_core::{paginate_by_cursor, CursorPageRequest};

/// Query parameters for `GET /cursor`.
#[derive(Debug, Deserialize)]
pub struct CursorQuery {
    /// Opaque token from a previous response's `metadata.next_cursor`.
    pub cursor: Option<String>,
    /// Page size, 1 to 100 (default 30).
    pub limit: Option<i64>,
}

/// Return one page of notes newest first.
///
/// A cursor that cannot be decoded is ignored and the first page is returned.
pub async fn get_cursor_page(
    State(state): State<AppState>,
    Query(query): Query<CursorQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let req = CursorPageRequest {
        cursor: query.cursor,
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
    };
    let page = paginate_by_cursor(state.notes.as_ref(), req).await?;
    Ok(Json(page))
}
