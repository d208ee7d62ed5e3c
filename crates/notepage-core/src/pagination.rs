//! Cursor and offset pagination over a [`NoteQueryRepository`].
//!
//! # Strategies
//!
//! | Strategy   | Queries        | Stable under inserts | Jump to page |
//! |------------|----------------|----------------------|--------------|
//! | **Cursor** | 1 (`limit+1`)  | Yes                  | No           |
//! | **Offset** | 2 (count+page) | No                   | Yes          |
//!
//! Both strategies emit notes in `(note_date DESC, id DESC)` order. The id
//! tie-break makes the order total, so no two rows ever compare equal.
//!
//! # Cursor boundary
//!
//! A page is fetched with `limit + 1` rows. When the extra row is present it is
//! dropped from the page and its key becomes the next cursor. The next request
//! reads rows with `(note_date, id) <= cursor`, so the dropped row is the first
//! row of the following page: every row is emitted exactly once.
//!
//! All validation runs before the repository is touched.

use std::time::Instant;

use tracing::{debug, info};

use crate::cursor::Cursor;
use crate::defaults::{
    DEFAULT_LIMIT, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE,
};
use crate::error::{Error, Result};
use crate::models::{CursorMetadata, CursorPage, NoteResponse, OffsetMetadata, OffsetPage};
use crate::traits::{NotePageQuery, NoteQueryRepository};

// =============================================================================
// REQUESTS
// =============================================================================

/// Input to [`paginate_by_cursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPageRequest {
    /// Opaque token from a previous page's `next_cursor`.
    pub cursor: Option<String>,
    pub limit: i64,
}

impl Default for CursorPageRequest {
    fn default() -> Self {
        Self {
            cursor: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Input to [`paginate_by_offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPageRequest {
    /// 1-based page number.
    pub page: i64,
    pub page_size: i64,
}

impl Default for OffsetPageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check a cursor page `limit` against `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
pub fn validate_limit(limit: i64) -> Result<()> {
    if limit < MIN_PAGE_SIZE {
        return Err(Error::InvalidInput("Limit must be greater than 0".into()));
    }
    if limit > MAX_PAGE_SIZE {
        return Err(Error::InvalidInput(format!(
            "Limit must be less than or equal to {}",
            MAX_PAGE_SIZE
        )));
    }
    Ok(())
}

/// Check an offset page request.
pub fn validate_offset_request(req: &OffsetPageRequest) -> Result<()> {
    if req.page < 1 {
        return Err(Error::InvalidInput("Page must be greater than 0".into()));
    }
    if req.page_size < MIN_PAGE_SIZE {
        return Err(Error::InvalidInput("Page size must be greater than 0".into()));
    }
    if req.page_size > MAX_PAGE_SIZE {
        return Err(Error::InvalidInput(format!(
            "Page size must be less than or equal to {}",
            MAX_PAGE_SIZE
        )));
    }
    Ok(())
}

/// Decode the request cursor.
///
/// An undecodable token is treated as absent. A decodable token from another
/// cursor version is rejected.
pub fn resolve_cursor(token: Option<&str>) -> Result<Option<Cursor>> {
    match Cursor::decode(token) {
        Some(cursor) if !cursor.is_supported() => {
            Err(Error::UnsupportedCursorVersion(cursor.version))
        }
        decoded => Ok(decoded),
    }
}

/// `ceil(total_count / page_size)`, zero when there are no rows.
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

// =============================================================================
// CURSOR PAGINATION
// =============================================================================

/// Fetch one cursor page.
pub async fn paginate_by_cursor<R>(repo: &R, req: CursorPageRequest) -> Result<CursorPage>
where
    R: NoteQueryRepository + ?Sized,
{
    let limit = req.limit;
    validate_limit(limit)?;

    let cursor = resolve_cursor(req.cursor.as_deref())?;
    info!(
        subsystem = "pagination",
        component = "cursor",
        op = "paginate",
        cursor_present = cursor.is_some(),
        cursor = ?cursor,
        limit,
        "Cursor pagination"
    );

    let start = Instant::now();
    let mut rows = repo
        .fetch_page(NotePageQuery::keyset(
            cursor.map(|c| c.key()),
            limit + 1,
        ))
        .await?;

    let has_more = rows.len() as i64 > limit;
    let next_cursor = if has_more {
        // The overflow row opens the next page.
        let overflow = rows.split_off(limit as usize);
        overflow
            .first()
            .map(|row| Cursor::from_key(row.key()).encode())
            .transpose()?
    } else {
        None
    };

    debug!(
        subsystem = "pagination",
        component = "cursor",
        op = "paginate",
        result_count = rows.len(),
        has_more,
        duration_ms = start.elapsed().as_millis() as u64,
        "Cursor page assembled"
    );

    Ok(CursorPage {
        items: rows.into_iter().map(NoteResponse::from).collect(),
        metadata: CursorMetadata {
            limit,
            has_more,
            next_cursor,
        },
    })
}

// =============================================================================
// OFFSET PAGINATION
// =============================================================================

/// Fetch one offset page.
pub async fn paginate_by_offset<R>(repo: &R, req: OffsetPageRequest) -> Result<OffsetPage>
where
    R: NoteQueryRepository + ?Sized,
{
    info!(
        subsystem = "pagination",
        component = "offset",
        op = "paginate",
        page = req.page,
        page_size = req.page_size,
        "Offset pagination"
    );
    validate_offset_request(&req)?;

    let start = Instant::now();
    let total_count = repo.count().await?;
    let total_pages = total_pages(total_count, req.page_size);

    let skip = (req.page - 1).saturating_mul(req.page_size);
    let rows = repo
        .fetch_page(NotePageQuery::window(skip, req.page_size))
        .await?;

    debug!(
        subsystem = "pagination",
        component = "offset",
        op = "paginate",
        result_count = rows.len(),
        total_count,
        duration_ms = start.elapsed().as_millis() as u64,
        "Offset page assembled"
    );

    Ok(OffsetPage {
        items: rows.into_iter().map(NoteResponse::from).collect(),
        metadata: OffsetMetadata {
            page: req.page,
            page_size: req.page_size,
            total_count,
            total_pages,
            has_previous_page: req.page > 1,
            has_next_page: req.page < total_pages,
        },
    })
}
