//! Headline scraping from the configured news homepage.
//!
//! A scrape is a single pass with two phases:
//!
//! 1. **Indexing**: fetch the homepage and pull one `(title, link)` pair out of
//!    every `<article>` element ([`article_links`]).
//! 2. **Storing**: create one [`Article`](crate::models::Article) per pair.
//!    A failed insert is logged and skipped; the rest of the batch continues.
//!
//! The batch runs to completion before [`scrape_into_store`] returns, so the
//! caller always gets an accurate [`ScrapeOutcome`]. Nothing is deduplicated:
//! scraping the same page twice stores every headline twice.

pub mod article_links;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::models::NewArticle;
use crate::store::Store;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Counts reported back to the `/scrape` caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeOutcome {
    /// Headlines extracted from the page.
    pub found: usize,
    /// Articles successfully stored.
    pub created: usize,
    /// Inserts that failed and were skipped.
    pub failed: usize,
}

/// Fetches the source homepage and extracts headline links from it.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    source: Url,
}

impl Scraper {
    /// Build a scraper for `source` whose requests give up after `timeout`.
    pub fn new(source: Url, timeout: Duration) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source_err| ScrapeError::Http {
                url: source.to_string(),
                source: source_err,
            })?;
        Ok(Self { client, source })
    }

    pub fn source(&self) -> &Url {
        &self.source
    }

    /// Download the homepage and return every headline found on it.
    #[instrument(level = "info", skip_all, fields(source = %self.source))]
    pub async fn index_articles(&self) -> Result<Vec<NewArticle>, ScrapeError> {
        let url = self.source.to_string();
        let http_err = |source| ScrapeError::Http {
            url: url.clone(),
            source,
        };

        let response = self.client.get(self.source.clone()).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.clone(),
                status,
            });
        }
        let html = response.text().await.map_err(http_err)?;

        let links = article_links::extract(&html, &self.source);
        info!(count = links.len(), bytes = html.len(), "Indexed headlines");
        debug!(links = ?links, "Extracted headlines");
        Ok(links)
    }
}

/// Scrape the source page and store every extracted headline.
///
/// Fails only when the page itself cannot be fetched. Individual insert
/// failures are logged and counted in [`ScrapeOutcome::failed`].
#[instrument(level = "info", skip_all, fields(source = %scraper.source()))]
pub async fn scrape_into_store(
    scraper: &Scraper,
    store: &dyn Store,
) -> Result<ScrapeOutcome, ScrapeError> {
    let links = scraper.index_articles().await?;
    let found = links.len();

    let outcome = stream::iter(links)
        .then(move |link| async move {
            let title = link.title.clone();
            match store.create_article(link).await {
                Ok(article) => {
                    debug!(id = %article.id, title = %article.title, "Stored article");
                    true
                }
                Err(e) => {
                    error!(error = %e, %title, "Failed to store article; skipping");
                    false
                }
            }
        })
        .fold(
            ScrapeOutcome {
                found,
                ..ScrapeOutcome::default()
            },
            |mut outcome, stored| async move {
                if stored {
                    outcome.created += 1;
                } else {
                    outcome.failed += 1;
                }
                outcome
            },
        )
        .await;

    info!(
        found = outcome.found,
        created = outcome.created,
        failed = outcome.failed,
        "Scrape complete"
    );
    Ok(outcome)
}
