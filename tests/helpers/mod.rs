#![allow(dead_code)]

use axum::{Router, response::Html, routing::get};
use headline_notes::models::Article;
use headline_notes::scrapers::Scraper;
use headline_notes::server::{self, AppState};
use headline_notes::store::{MemoryStore, SqliteStore, Store};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

/// A running application plus the HTTP client used to drive it.
pub struct TestApp {
    pub base: String,
    pub client: reqwest::Client,
    pub store: Arc<dyn Store>,
    _dir: Option<TempDir>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn articles(&self) -> Vec<Article> {
        self.client
            .get(self.url("/articles"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// Store one article directly, bypassing the scraper.
    pub async fn seed(&self, title: &str) -> Article {
        self.store
            .create_article(headline_notes::models::NewArticle {
                title: title.to_string(),
                link: format!("https://example.com/{}", title.replace(' ', "-")),
            })
            .await
            .unwrap()
    }
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

async fn spawn_app(store: Arc<dyn Store>, source: Url, dir: Option<TempDir>) -> TestApp {
    let scraper = Scraper::new(source, Duration::from_secs(5)).unwrap();
    let public = Path::new(env!("CARGO_MANIFEST_DIR")).join("public");
    let router = server::router(AppState::new(store.clone(), scraper), &public);
    TestApp {
        base: spawn(router).await,
        client: reqwest::Client::new(),
        store,
        _dir: dir,
    }
}

/// App backed by the in-memory store, scraping `source`.
pub async fn memory_app(source: Url) -> TestApp {
    spawn_app(Arc::new(MemoryStore::new()), source, None).await
}

/// App backed by a SQLite file in a temporary directory, scraping `source`.
pub async fn sqlite_app(source: Url) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("headlines.db").display());
    let store = SqliteStore::connect(&url).await.unwrap();
    spawn_app(Arc::new(store), source, Some(dir)).await
}

/// Serve `html` at `/` of a local server standing in for the news site.
pub async fn news_site(html: &'static str) -> Url {
    let router = Router::new().route("/", get(move || async move { Html(html) }));
    Url::parse(&format!("{}/", spawn(router).await)).unwrap()
}

/// A source URL nothing listens on; for tests that never scrape.
pub fn unused_source() -> Url {
    Url::parse("http://127.0.0.1:9/").unwrap()
}
