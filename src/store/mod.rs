//! Persistence for articles and notes.
//!
//! The [`Store`] trait is the repository layer: each HTTP route maps onto one
//! of its operations. Two backends implement it:
//!
//! | Backend | Module | Selected by |
//! |---------|--------|-------------|
//! | SQLite | [`sqlite`] | any `sqlite:` database URL |
//! | In-memory | [`memory`] | the literal URL `memory://` |
//!
//! Operations that touch an article and its notes together (note creation,
//! note deletion, unsaving) are atomic in both backends, so an article's
//! note list only ever names notes that point back at it.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{Article, ArticleFilter, NewArticle, Note, PopulatedArticle};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// URL that selects the in-memory backend.
pub const MEMORY_URL: &str = "memory://";

/// Which kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Article,
    Note,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Article => f.write_str("article"),
            RecordKind::Note => f.write_str("note"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: Uuid },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn article_not_found(id: Uuid) -> Self {
        StoreError::NotFound {
            kind: RecordKind::Article,
            id,
        }
    }

    pub fn note_not_found(id: Uuid) -> Self {
        StoreError::NotFound {
            kind: RecordKind::Note,
            id,
        }
    }
}

/// Repository operations over the article and note collections.
///
/// List operations return articles in insertion order; notes inside an
/// article are always in creation order.
#[async_trait]
pub trait Store: Send + Sync {
    /// Articles matching `filter`, with notes as ids.
    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>, StoreError>;

    /// Articles matching `filter`, with notes populated.
    async fn list_populated(
        &self,
        filter: ArticleFilter,
    ) -> Result<Vec<PopulatedArticle>, StoreError>;

    /// A single article with notes populated.
    async fn get_article(&self, id: Uuid) -> Result<PopulatedArticle, StoreError>;

    /// Insert a new unsaved article with no notes. Duplicates are not checked.
    async fn create_article(&self, new: NewArticle) -> Result<Article, StoreError>;

    /// Mark an article as saved and return its updated state.
    async fn save_article(&self, id: Uuid) -> Result<Article, StoreError>;

    /// Move an article back to the inbox, deleting every note attached to it.
    async fn unsave_article(&self, id: Uuid) -> Result<Article, StoreError>;

    /// Create a note and append it to the article's note list.
    async fn create_note(&self, article_id: Uuid, body: &str) -> Result<Note, StoreError>;

    async fn get_note(&self, id: Uuid) -> Result<Note, StoreError>;

    /// Delete a note and pull it from the owning article's note list.
    ///
    /// Fails with `NotFound` when no note `note_id` is attached to `article_id`.
    async fn delete_note(&self, note_id: Uuid, article_id: Uuid) -> Result<(), StoreError>;
}

/// Open the backend named by `database_url`.
///
/// [`MEMORY_URL`] yields a fresh [`MemoryStore`]; anything else is handed to
/// SQLite, which creates the database file and schema when missing.
#[instrument(level = "info")]
pub async fn connect(database_url: &str) -> Result<Arc<dyn Store>, StoreError> {
    if database_url == MEMORY_URL {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = SqliteStore::connect(database_url).await?;
    info!("SQLite store ready");
    Ok(Arc::new(store))
}
