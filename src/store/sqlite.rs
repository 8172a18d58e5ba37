//! SQLite-backed [`Store`] implementation.
//!
//! Articles and notes live in two tables; an article's note list is the set
//! of notes whose `article_id` points at it, ordered by insertion (`rowid`).
//! Timestamps are stored as Unix milliseconds, ids as hyphenated UUID text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::models::{Article, ArticleFilter, NewArticle, Note, PopulatedArticle};
use crate::utils::now_millis;

use super::{Store, StoreError};

const ARTICLE_COLUMNS: &str = "a.id, a.title, a.link, a.saved, a.created_at";
const NOTE_COLUMNS: &str = "n.id, n.article_id, n.body, n.created_at";

/// SQLite implementation of the [`Store`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url` and apply the schema.
    #[instrument(level = "info", skip_all)]
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                link TEXT NOT NULL,
                saved INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                article_id TEXT NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
                body TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_saved ON articles(saved)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_article ON notes(article_id)")
            .execute(&self.pool)
            .await?;

        info!("Schema up to date");
        Ok(())
    }

    /// Articles matching `filter` with their notes, in insertion order.
    async fn fetch_populated(
        &self,
        filter: ArticleFilter,
    ) -> Result<Vec<PopulatedArticle>, StoreError> {
        let where_clause = if filter.saved().is_some() {
            " WHERE a.saved = ?"
        } else {
            ""
        };

        let article_sql =
            format!("SELECT {ARTICLE_COLUMNS} FROM articles a{where_clause} ORDER BY a.rowid");
        let note_sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n JOIN articles a ON a.id = n.article_id{where_clause} ORDER BY n.rowid"
        );

        let mut article_query = sqlx::query(&article_sql);
        let mut note_query = sqlx::query(&note_sql);
        if let Some(saved) = filter.saved() {
            article_query = article_query.bind(saved);
            note_query = note_query.bind(saved);
        }

        // One read transaction so both selects see the same snapshot.
        let mut tx = self.pool.begin().await?;
        let article_rows = article_query.fetch_all(&mut *tx).await?;
        let note_rows = note_query.fetch_all(&mut *tx).await?;
        tx.commit().await?;

        let mut notes_by_article: HashMap<Uuid, Vec<Note>> = HashMap::new();
        for row in &note_rows {
            let note = note_from_row(row)?;
            notes_by_article.entry(note.article).or_default().push(note);
        }

        article_rows
            .iter()
            .map(|row| {
                let mut article = article_from_row(row)?;
                article.notes = notes_by_article.remove(&article.id).unwrap_or_default();
                Ok(article)
            })
            .collect()
    }
}

fn parse_uuid(row: &SqliteRow, column: &str) -> Result<Uuid, StoreError> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| StoreError::Corrupt(format!("{column} {raw:?}: {e}")))
}

fn parse_timestamp(row: &SqliteRow) -> Result<DateTime<Utc>, StoreError> {
    let millis: i64 = row.try_get("created_at")?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::Corrupt(format!("created_at out of range: {millis}")))
}

/// Decode an article row. Notes are left empty for the caller to fill.
fn article_from_row(row: &SqliteRow) -> Result<PopulatedArticle, StoreError> {
    Ok(PopulatedArticle {
        id: parse_uuid(row, "id")?,
        title: row.try_get("title")?,
        link: row.try_get("link")?,
        saved: row.try_get("saved")?,
        notes: Vec::new(),
        created_at: parse_timestamp(row)?,
    })
}

fn note_from_row(row: &SqliteRow) -> Result<Note, StoreError> {
    Ok(Note {
        id: parse_uuid(row, "id")?,
        body: row.try_get("body")?,
        article: parse_uuid(row, "article_id")?,
        created_at: parse_timestamp(row)?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>, StoreError> {
        Ok(self
            .fetch_populated(filter)
            .await?
            .into_iter()
            .map(PopulatedArticle::depopulate)
            .collect())
    }

    async fn list_populated(
        &self,
        filter: ArticleFilter,
    ) -> Result<Vec<PopulatedArticle>, StoreError> {
        self.fetch_populated(filter).await
    }

    async fn get_article(&self, id: Uuid) -> Result<PopulatedArticle, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::article_not_found(id))?;

        let mut article = article_from_row(&row)?;

        let note_rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes n WHERE n.article_id = ? ORDER BY n.rowid"
        ))
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        article.notes = note_rows
            .iter()
            .map(note_from_row)
            .collect::<Result<_, _>>()?;
        Ok(article)
    }

    async fn create_article(&self, new: NewArticle) -> Result<Article, StoreError> {
        let article = Article {
            id: Uuid::new_v4(),
            title: new.title,
            link: new.link,
            saved: false,
            notes: Vec::new(),
            created_at: now_millis(),
        };

        sqlx::query(
            "INSERT INTO articles (id, title, link, saved, created_at) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(article.id.to_string())
        .bind(&article.title)
        .bind(&article.link)
        .bind(article.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        debug!(id = %article.id, "Inserted article");
        Ok(article)
    }

    async fn save_article(&self, id: Uuid) -> Result<Article, StoreError> {
        let result = sqlx::query("UPDATE articles SET saved = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::article_not_found(id));
        }
        Ok(self.get_article(id).await?.depopulate())
    }

    async fn unsave_article(&self, id: Uuid) -> Result<Article, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE articles SET saved = 0 WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::article_not_found(id));
        }

        let removed = sqlx::query("DELETE FROM notes WHERE article_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(%id, notes_removed = removed.rows_affected(), "Unsaved article");

        Ok(self.get_article(id).await?.depopulate())
    }

    async fn create_note(&self, article_id: Uuid, body: &str) -> Result<Note, StoreError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT 1 FROM articles WHERE id = ?")
            .bind(article_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StoreError::article_not_found(article_id));
        }

        let note = Note {
            id: Uuid::new_v4(),
            body: body.to_string(),
            article: article_id,
            created_at: now_millis(),
        };

        sqlx::query("INSERT INTO notes (id, article_id, body, created_at) VALUES (?, ?, ?, ?)")
            .bind(note.id.to_string())
            .bind(article_id.to_string())
            .bind(&note.body)
            .bind(note.created_at.timestamp_millis())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(note)
    }

    async fn get_note(&self, id: Uuid) -> Result<Note, StoreError> {
        let row = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM notes n WHERE n.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::note_not_found(id))?;

        note_from_row(&row)
    }

    async fn delete_note(&self, note_id: Uuid, article_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND article_id = ?")
            .bind(note_id.to_string())
            .bind(article_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::note_not_found(note_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::conformance;
    use tempfile::TempDir;

    async fn open() -> (TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let store = SqliteStore::connect(&url).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_created_articles_start_unsaved() {
        let (_dir, store) = open().await;
        conformance::created_articles_start_unsaved(&store).await;
    }

    #[tokio::test]
    async fn test_list_order_and_filters() {
        let (_dir, store) = open().await;
        conformance::list_preserves_insertion_order_and_filters(&store).await;
    }

    #[tokio::test]
    async fn test_duplicates_are_not_merged() {
        let (_dir, store) = open().await;
        conformance::duplicates_are_not_merged(&store).await;
    }

    #[tokio::test]
    async fn test_notes_attach_and_populate() {
        let (_dir, store) = open().await;
        conformance::notes_attach_and_populate(&store).await;
    }

    #[tokio::test]
    async fn test_note_on_missing_article() {
        let (_dir, store) = open().await;
        conformance::note_on_missing_article_is_rejected(&store).await;
    }

    #[tokio::test]
    async fn test_delete_note() {
        let (_dir, store) = open().await;
        conformance::delete_note_detaches_it(&store).await;
    }

    #[tokio::test]
    async fn test_delete_note_wrong_article() {
        let (_dir, store) = open().await;
        conformance::delete_note_requires_matching_article(&store).await;
    }

    #[tokio::test]
    async fn test_unsave_clears_notes() {
        let (_dir, store) = open().await;
        conformance::unsave_clears_notes(&store).await;
    }

    #[tokio::test]
    async fn test_missing_articles() {
        let (_dir, store) = open().await;
        conformance::missing_articles_report_not_found(&store).await;
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let (_dir, store) = open().await;
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_listing_during_unsave_sees_one_snapshot() {
        let (_dir, store) = open().await;

        for round in 0..20 {
            let article = store
                .create_article(NewArticle {
                    title: format!("Round {round}"),
                    link: format!("https://example.com/{round}"),
                })
                .await
                .unwrap();
            store.save_article(article.id).await.unwrap();
            store.create_note(article.id, "annotated").await.unwrap();

            let (listed, unsaved) = tokio::join!(
                store.list_populated(ArticleFilter::Saved),
                store.unsave_article(article.id)
            );
            unsaved.unwrap();

            for saved in listed.unwrap() {
                assert_eq!(saved.notes.len(), 1, "saved article listed without its note");
            }
        }
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("reopen.db").display());

        let first = SqliteStore::connect(&url).await.unwrap();
        let article = first
            .create_article(NewArticle {
                title: "Kept".to_string(),
                link: "https://example.com/kept".to_string(),
            })
            .await
            .unwrap();
        first.create_note(article.id, "still here").await.unwrap();
        first.pool.close().await;

        let second = SqliteStore::connect(&url).await.unwrap();
        let reloaded = second.get_article(article.id).await.unwrap();
        assert_eq!(reloaded.title, "Kept");
        assert_eq!(reloaded.notes.len(), 1);
    }
}
