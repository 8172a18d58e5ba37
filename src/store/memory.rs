//! In-memory [`Store`] implementation for tests and throwaway runs.
//!
//! Articles live in a `Vec` (insertion order) and notes in a `HashMap`, both
//! behind one `tokio::sync::RwLock` so every two-record update happens under
//! a single write guard.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Article, ArticleFilter, NewArticle, Note, PopulatedArticle};
use crate::utils::now_millis;

use super::{Store, StoreError};

#[derive(Default)]
struct Collections {
    articles: Vec<Article>,
    notes: HashMap<Uuid, Note>,
}

impl Collections {
    fn article(&self, id: Uuid) -> Result<&Article, StoreError> {
        self.articles
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::article_not_found(id))
    }

    fn article_mut(&mut self, id: Uuid) -> Result<&mut Article, StoreError> {
        self.articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::article_not_found(id))
    }

    fn populate(&self, article: &Article) -> PopulatedArticle {
        PopulatedArticle {
            id: article.id,
            title: article.title.clone(),
            link: article.link.clone(),
            saved: article.saved,
            notes: article
                .notes
                .iter()
                .filter_map(|id| self.notes.get(id).cloned())
                .collect(),
            created_at: article.created_at,
        }
    }
}

/// In-memory store. Contents are lost when the process exits.
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .articles
            .iter()
            .filter(|a| filter.matches(a.saved))
            .cloned()
            .collect())
    }

    async fn list_populated(
        &self,
        filter: ArticleFilter,
    ) -> Result<Vec<PopulatedArticle>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .articles
            .iter()
            .filter(|a| filter.matches(a.saved))
            .map(|a| inner.populate(a))
            .collect())
    }

    async fn get_article(&self, id: Uuid) -> Result<PopulatedArticle, StoreError> {
        let inner = self.inner.read().await;
        let article = inner.article(id)?;
        Ok(inner.populate(article))
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
        self.inner.write().await.articles.push(article.clone());
        debug!(id = %article.id, "Stored article in memory");
        Ok(article)
    }

    async fn save_article(&self, id: Uuid) -> Result<Article, StoreError> {
        let mut inner = self.inner.write().await;
        let article = inner.article_mut(id)?;
        article.saved = true;
        Ok(article.clone())
    }

    async fn unsave_article(&self, id: Uuid) -> Result<Article, StoreError> {
        let mut inner = self.inner.write().await;
        let article = inner.article_mut(id)?;
        article.saved = false;
        let detached = std::mem::take(&mut article.notes);
        let updated = article.clone();
        for note_id in detached {
            inner.notes.remove(&note_id);
        }
        Ok(updated)
    }

    async fn create_note(&self, article_id: Uuid, body: &str) -> Result<Note, StoreError> {
        let mut inner = self.inner.write().await;
        let note = Note {
            id: Uuid::new_v4(),
            body: body.to_string(),
            article: article_id,
            created_at: now_millis(),
        };
        inner.article_mut(article_id)?.notes.push(note.id);
        inner.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn get_note(&self, id: Uuid) -> Result<Note, StoreError> {
        let inner = self.inner.read().await;
        inner
            .notes
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::note_not_found(id))
    }

    async fn delete_note(&self, note_id: Uuid, article_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.notes.get(&note_id) {
            Some(note) if note.article == article_id => {}
            _ => return Err(StoreError::note_not_found(note_id)),
        }
        inner.notes.remove(&note_id);
        inner.article_mut(article_id)?.notes.retain(|id| *id != note_id);
        Ok(())
    }
}
