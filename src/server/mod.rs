//! HTTP server: routes, shared state and startup.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Render unsaved articles |
//! | `GET` | `/saved` | Render saved articles with their notes |
//! | `GET` | `/scrape` | Scrape the source page and store every headline |
//! | `GET` | `/articles` | All articles as JSON |
//! | `GET` | `/articles/{id}` | One article, notes populated |
//! | `POST` | `/articles/save/{id}` | Mark an article saved |
//! | `POST` | `/articles/delete/{id}` | Unsave an article and drop its notes |
//! | `POST` | `/notes/save/{id}` | Attach a note to an article |
//! | `GET` | `/notes/{id}` | One note |
//! | `DELETE` | `/notes/delete/{note_id}/{article_id}` | Delete a note |
//! | `GET` | `/health` | Health check (returns version) |
//! | `GET` | `/public/*` | Static assets |
//!
//! Requests are logged by `tower-http`'s trace layer; failures are rendered
//! by [`error::AppError`].

pub mod error;
mod routes;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::scrapers::Scraper;
use crate::store::Store;

/// Shared application state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    scraper: Arc<Scraper>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, scraper: Scraper) -> Self {
        Self {
            store,
            scraper: Arc::new(scraper),
        }
    }
}

/// Build the application router, serving static assets from `public_dir`.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/saved", get(routes::saved))
        .route("/scrape", get(routes::scrape))
        .route("/articles", get(routes::list_articles))
        .route("/articles/{id}", get(routes::get_article))
        .route("/articles/save/{id}", post(routes::save_article))
        .route("/articles/delete/{id}", post(routes::unsave_article))
        .route("/notes/save/{id}", post(routes::create_note))
        .route("/notes/{id}", get(routes::get_note))
        .route(
            "/notes/delete/{note_id}/{article_id}",
            delete(routes::delete_note),
        )
        .route("/health", get(routes::health))
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `listener` until the process is stopped.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "App running");
    axum::serve(listener, app).await
}
