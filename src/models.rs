//! Data models for scraped articles and the notes attached to them.
//!
//! This module defines the records persisted by the [`Store`](crate::store::Store):
//! - [`Article`]: A scraped headline with its note ids
//! - [`PopulatedArticle`]: The same headline with its notes resolved to full records
//! - [`Note`]: A free-text annotation owned by one article
//! - [`NewArticle`]: A `(title, link)` pair produced by the scraper
//!
//! Identifiers serialize under `_id` so the JSON routes keep the shape of a
//! document-store response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A `(title, link)` pair extracted from the source page, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewArticle {
    /// Anchor text of the headline.
    pub title: String,
    /// Absolute URL of the story.
    pub link: String,
}

/// A stored headline.
///
/// `notes` holds the ids of the attached [`Note`]s in creation order. Use
/// [`PopulatedArticle`] when the note bodies are needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub link: String,
    /// Whether the article sits in the saved view rather than the inbox.
    pub saved: bool,
    pub notes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// An [`Article`] whose notes have been resolved to full records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PopulatedArticle {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub saved: bool,
    pub notes: Vec<Note>,
    pub created_at: DateTime<Utc>,
}

impl PopulatedArticle {
    /// Drop the note bodies, keeping only their ids.
    pub fn depopulate(self) -> Article {
        Article {
            id: self.id,
            title: self.title,
            link: self.link,
            saved: self.saved,
            notes: self.notes.into_iter().map(|note| note.id).collect(),
            created_at: self.created_at,
        }
    }
}

/// A free-text annotation attached to exactly one article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub body: String,
    /// Id of the owning [`Article`].
    pub article: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Partition of the article collection used by list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleFilter {
    All,
    Saved,
    Unsaved,
}

impl ArticleFilter {
    /// The `saved` value this filter requires, or `None` for every article.
    pub fn saved(self) -> Option<bool> {
        match self {
            ArticleFilter::All => None,
            ArticleFilter::Saved => Some(true),
            ArticleFilter::Unsaved => Some(false),
        }
    }

    pub fn matches(self, saved: bool) -> bool {
        self.saved().is_none_or(|wanted| wanted == saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note(article: Uuid) -> Note {
        Note {
            id: Uuid::new_v4(),
            body: "Follow up on this".to_string(),
            article,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_article_serializes_id_as_underscore_id() {
        let article = Article {
            id: Uuid::new_v4(),
            title: "Markets rally".to_string(),
            link: "https://example.com/markets".to_string(),
            saved: false,
            notes: vec![],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["_id"], article.id.to_string());
        assert!(json.get("id").is_none());
        assert_eq!(json["saved"], false);
    }

    #[test]
    fn test_depopulate_keeps_note_order() {
        let id = Uuid::new_v4();
        let first = sample_note(id);
        let second = sample_note(id);
        let populated = PopulatedArticle {
            id,
            title: "Storm warning".to_string(),
            link: "https://example.com/storm".to_string(),
            saved: true,
            notes: vec![first.clone(), second.clone()],
            created_at: Utc::now(),
        };

        let article = populated.depopulate();
        assert_eq!(article.notes, vec![first.id, second.id]);
        assert!(article.saved);
    }

    #[test]
    fn test_note_deserialization() {
        let article = Uuid::new_v4();
        let json = format!(
            r#"{{
                "_id": "{}",
                "body": "Check the numbers",
                "article": "{}",
                "created_at": "2025-05-06T14:30:00Z"
            }}"#,
            Uuid::new_v4(),
            article
        );

        let note: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(note.article, article);
        assert_eq!(note.body, "Check the numbers");
    }

    #[test]
    fn test_filter_matches() {
        assert!(ArticleFilter::All.matches(true));
        assert!(ArticleFilter::All.matches(false));
        assert!(ArticleFilter::Saved.matches(true));
        assert!(!ArticleFilter::Saved.matches(false));
        assert!(ArticleFilter::Unsaved.matches(false));
        assert!(!ArticleFilter::Unsaved.matches(true));
    }
}
