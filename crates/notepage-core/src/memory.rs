//! In-memory note repository.
//!
//! Implements [`NoteQueryRepository`] over a `Vec` with the same ordering and
//! bound semantics as the PostgreSQL repository. Used by tests and by the
//! server's in-memory demo mode.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notepage_core::memory::InMemoryNoteRepository;
//! use notepage_core::traits::{NotePageQuery, NoteQueryRepository};
//!
//! #[tokio::test]
//! async fn first_three() {
//!     let repo = InMemoryNoteRepository::with_demo_data(5);
//!     let rows = repo.fetch_page(NotePageQuery::keyset(None, 3)).await.unwrap();
//!     assert_eq!(rows.len(), 3);
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Note, NoteWithUser, User};
use crate::traits::{NotePageQuery, NoteQueryRepository};
use crate::uuid_utils::v7_from_millis;

#[derive(Debug, Default)]
struct Store {
    notes: Vec<Note>,
    users: HashMap<Uuid, User>,
}

#[derive(Debug, Clone, Default)]
struct MockConfig {
    latency: Option<Duration>,
    failure: Option<String>,
}

/// Note repository backed by process memory.
#[derive(Clone, Default)]
pub struct InMemoryNoteRepository {
    store: Arc<RwLock<Store>>,
    config: Arc<MockConfig>,
    query_count: Arc<AtomicUsize>,
}

impl InMemoryNoteRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated from `notes`.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let store = Store {
            notes: notes.into_iter().collect(),
            users: HashMap::new(),
        };
        Self {
            store: Arc::new(RwLock::new(store)),
            ..Self::default()
        }
    }

    /// Create a repository with one demo user and `count` notes, one per day
    /// ending at 2025-01-01, with strictly increasing ids.
    pub fn with_demo_data(count: usize) -> Self {
        let Some(start) = NaiveDate::from_ymd_opt(2025, 1, 1) else {
            return Self::new();
        };
        let user = User {
            id: v7_from_millis(DEMO_EPOCH_MS, 0),
            name: "demo".to_string(),
        };
        let notes = (0..count)
            .map(|i| Note {
                id: v7_from_millis(DEMO_EPOCH_MS + 1 + i as u64, 0),
                user_id: user.id,
                note: format!("Demo note #{}", i + 1),
                note_date: start
                    .checked_sub_days(Days::new((count - 1 - i) as u64))
                    .unwrap_or(start),
            })
            .collect();

        let store = Store {
            notes,
            users: HashMap::from([(user.id, user)]),
        };
        Self {
            store: Arc::new(RwLock::new(store)),
            ..Self::default()
        }
    }

    /// Delay every query by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = Some(latency);
        self
    }

    /// Fail every query with a database error carrying `message`.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Add a user.
    pub async fn insert_user(&self, user: User) {
        self.store.write().await.users.insert(user.id, user);
    }

    /// Add a note.
    pub async fn insert(&self, note: Note) {
        self.store.write().await.notes.push(note);
    }

    /// Number of queries answered or attempted so far.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    async fn begin_query(&self) -> Result<()> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.config.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.config.failure {
            Some(message) => Err(Error::Database(sqlx::Error::Protocol(message.clone()))),
            None => Ok(()),
        }
    }
}

/// 2024-01-23T08:53:20Z, the millisecond clock origin of demo ids.
const DEMO_EPOCH_MS: u64 = 1_706_000_000_000;

fn sorted_desc(notes: &[Note]) -> Vec<&Note> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by(|a, b| b.key().cmp(&a.key()));
    sorted
}

#[async_trait]
impl NoteQueryRepository for InMemoryNoteRepository {
    async fn fetch_page(&self, query: NotePageQuery) -> Result<Vec<Note>> {
        self.begin_query().await?;
        let store = self.store.read().await;

        let rows = sorted_desc(&store.notes)
            .into_iter()
            .filter(|n| query.before.map_or(true, |bound| n.key() <= bound))
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn count(&self) -> Result<i64> {
        self.begin_query().await?;
        Ok(self.store.read().await.notes.len() as i64)
    }

    async fn list_with_users(&self) -> Result<Vec<NoteWithUser>> {
        self.begin_query().await?;
        let store = self.store.read().await;

        // Inner join: notes whose owner is unknown are skipped.
        let rows = sorted_desc(&store.notes)
            .into_iter()
            .filter_map(|n| {
                store.users.get(&n.user_id).map(|u| NoteWithUser {
                    id: n.id,
                    note: n.note.clone(),
                    note_date: n.note_date,
                    user_id: n.user_id,
                    user_name: u.name.clone(),
                })
            })
            .collect();
        Ok(rows)
    }
}
