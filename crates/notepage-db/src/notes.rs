//! Note repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use notepage_core::defaults::{NOTE_MAX_LEN, USER_NAME_MAX_LEN};
use notepage_core::{
    new_v7, Error, Note, NotePageQuery, NoteQueryRepository, NoteWithUser, Result,
};

/// PostgreSQL implementation of NoteQueryRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a user and return its new UUIDv7 id.
    pub async fn insert_user(&self, name: &str) -> Result<Uuid> {
        if name.chars().count() > USER_NAME_MAX_LEN {
            return Err(Error::InvalidInput(format!(
                "User name must be at most {} characters",
                USER_NAME_MAX_LEN
            )));
        }
        let id = new_v7();
        sqlx::query("INSERT INTO identity.users (id, name) VALUES ($1, $2)")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(id)
    }

    /// Insert a note and return its new UUIDv7 id.
    pub async fn insert_note(&self, user_id: Uuid, note: &str, note_date: NaiveDate) -> Result<Uuid> {
        if note.chars().count() > NOTE_MAX_LEN {
            return Err(Error::InvalidInput(format!(
                "Note must be at most {} characters",
                NOTE_MAX_LEN
            )));
        }
        let id = new_v7();
        sqlx::query(
            "INSERT INTO notes.user_notes (id, user_id, note, note_date) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(user_id)
        .bind(note)
        .bind(note_date)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(id)
    }
}

// =============================================================================
// QUERY BUILDING
// =============================================================================

const NOTE_COLUMNS: &str = "n.id, n.user_id, n.note, n.note_date";

const PAGE_ORDER: &str = "ORDER BY n.note_date DESC, n.id DESC";

/// Build the page query for `query`.
///
/// Parameters: `$1, $2` are the bound's date and id when a bound is present,
/// followed by LIMIT and OFFSET.
fn build_page_query(query: &NotePageQuery) -> String {
    let mut sql = format!("SELECT {} FROM notes.user_notes n ", NOTE_COLUMNS);
    let mut param_idx = 1;

    if query.before.is_some() {
        // Row comparison keeps the (note_date, id) index usable.
        sql.push_str("WHERE (n.note_date, n.id) <= ($1::date, $2::uuid) ");
        param_idx += 2;
    }

    sql.push_str(PAGE_ORDER);
    sql.push_str(&format!(" LIMIT ${} OFFSET ${}", param_idx, param_idx + 1));
    sql
}

fn map_row_to_note(row: &PgRow) -> Result<Note> {
    Ok(Note {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        note: row.try_get("note")?,
        note_date: row.try_get("note_date")?,
    })
}

fn map_row_to_note_with_user(row: &PgRow) -> Result<NoteWithUser> {
    Ok(NoteWithUser {
        id: row.try_get("id")?,
        note: row.try_get("note")?,
        note_date: row.try_get("note_date")?,
        user_id: row.try_get("user_id")?,
        user_name: row.try_get("user_name")?,
    })
}

#[async_trait]
impl NoteQueryRepository for PgNoteRepository {
    async fn fetch_page(&self, query: NotePageQuery) -> Result<Vec<Note>> {
        let start = Instant::now();
        let sql = build_page_query(&query);

        let mut q = sqlx::query(&sql);
        if let Some(bound) = query.before {
            q = q.bind(bound.note_date).bind(bound.id);
        }
        let rows = q
            .bind(query.limit.max(0))
            .bind(query.offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let notes = rows
            .iter()
            .map(map_row_to_note)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "fetch_page",
            db_table = "notes.user_notes",
            bounded = query.before.is_some(),
            limit = query.limit,
            offset = query.offset,
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched note page"
        );
        Ok(notes)
    }

    async fn count(&self) -> Result<i64> {
        let start = Instant::now();
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes.user_notes")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "count",
            db_table = "notes.user_notes",
            total_count = total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Counted notes"
        );
        Ok(total)
    }

    async fn list_with_users(&self) -> Result<Vec<NoteWithUser>> {
        let start = Instant::now();
        let sql = format!(
            "SELECT n.id, n.note, n.note_date, n.user_id, u.name AS user_name \
             FROM notes.user_notes n \
             JOIN identity.users u ON u.id = n.user_id \
             {}",
            PAGE_ORDER
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let items = rows
            .iter()
            .map(map_row_to_note_with_user)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "list_with_users",
            result_count = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes with owners"
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notepage_core::NoteKey;

    #[test]
    fn test_unbounded_query_uses_first_params_for_window() {
        let sql = build_page_query(&NotePageQuery::window(30, 30));
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY n.note_date DESC, n.id DESC LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_bounded_query_uses_inclusive_row_comparison() {
        let bound = NoteKey {
            note_date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            id: Uuid::nil(),
        };
        let sql = build_page_query(&NotePageQuery::keyset(Some(bound), 31));
        assert!(sql.contains("WHERE (n.note_date, n.id) <= ($1::date, $2::uuid)"));
        assert!(sql.ends_with("LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn test_query_selects_projection_columns() {
        let sql = build_page_query(&NotePageQuery::default());
        assert!(sql.starts_with("SELECT n.id, n.user_id, n.note, n.note_date FROM notes.user_notes n"));
    }
}
