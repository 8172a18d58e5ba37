//! Route handlers. Each one performs a single store call (or one scrape
//! pass) and turns the result into HTML, JSON or plain text.

use axum::{
    Form, Json,
    extract::{FromRequest, Path, Request, State},
    http::header::CONTENT_TYPE,
    response::Html,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::AppState;
use super::error::{AppError, parse_id};
use crate::models::{Article, ArticleFilter, Note, PopulatedArticle};
use crate::scrapers::scrape_into_store;
use crate::utils::truncate_for_log;
use crate::views;

#[instrument(level = "info", skip_all)]
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let articles = state.store.list_articles(ArticleFilter::Unsaved).await?;
    Ok(Html(views::render_home(&articles)))
}

#[instrument(level = "info", skip_all)]
pub async fn saved(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let articles = state.store.list_populated(ArticleFilter::Saved).await?;
    Ok(Html(views::render_saved(&articles)))
}

/// Runs the whole scrape before answering, so the counts are final.
#[instrument(level = "info", skip_all)]
pub async fn scrape(State(state): State<AppState>) -> Result<String, AppError> {
    let outcome = scrape_into_store(&state.scraper, state.store.as_ref()).await?;
    Ok(format!(
        "Scrape Complete ({} found, {} added, {} failed)",
        outcome.found, outcome.created, outcome.failed
    ))
}

pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    Ok(Json(state.store.list_articles(ArticleFilter::All).await?))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PopulatedArticle>, AppError> {
    let id = parse_id(&id, "article")?;
    Ok(Json(state.store.get_article(id).await?))
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn save_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let id = parse_id(&id, "article")?;
    let article = state.store.save_article(id).await?;
    info!(%id, "Article saved");
    Ok(Json(article))
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn unsave_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let id = parse_id(&id, "article")?;
    let article = state.store.unsave_article(id).await?;
    info!(%id, "Article removed from saved");
    Ok(Json(article))
}

/// Body of `POST /notes/save/{id}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct NoteInput {
    pub text: String,
}

/// Accepts a [`NoteInput`] sent either as JSON or as a urlencoded form.
pub struct NoteBody(pub NoteInput);

impl<S> FromRequest<S> for NoteBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        let input = if is_json {
            let Json(input) = Json::<NoteInput>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
            input
        } else {
            let Form(input) = Form::<NoteInput>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
            input
        };
        Ok(NoteBody(input))
    }
}

#[instrument(level = "info", skip_all, fields(article = %id))]
pub async fn create_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NoteBody(input): NoteBody,
) -> Result<Json<Note>, AppError> {
    let article_id = parse_id(&id, "article")?;
    let text = input.text.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("note text must not be empty"));
    }

    let note = state.store.create_note(article_id, text).await?;
    info!(%article_id, note_id = %note.id, preview = %truncate_for_log(text, 80), "Note created");
    Ok(Json(note))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let id = parse_id(&id, "note")?;
    Ok(Json(state.store.get_note(id).await?))
}

#[instrument(level = "info", skip_all, fields(note = %note_id, article = %article_id))]
pub async fn delete_note(
    State(state): State<AppState>,
    Path((note_id, article_id)): Path<(String, String)>,
) -> Result<&'static str, AppError> {
    let note_id = parse_id(&note_id, "note")?;
    let article_id = parse_id(&article_id, "article")?;
    state.store.delete_note(note_id, article_id).await?;
    info!(%note_id, %article_id, "Note deleted");
    Ok("Note Deleted")
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
