//! Offset (numbered page) pagination endpoint.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{ApiError, AppState};
use notepage_core::defaults::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use notepage_core::{paginate_by_offset, OffsetPageRequest};

/// Query parameters for `GET /offset`.
#[derive(Debug, Deserialize)]
pub struct OffsetQuery {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Rows per page, 1 to 100 (default 30).
    pub page_size: Option<i64>,
}

pub async fn get_offset_page(
    State(state): State<AppState>,
    Query(query): Query<OffsetQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let req = OffsetPageRequest {
        page: query.page.unwrap_or(DEFAULT_PAGE),
        page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let page = paginate_by_offset(state.notes.as_ref(), req).await?;
    Ok(Json(page))
}
