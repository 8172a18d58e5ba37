//! # Headline Notes
//!
//! A small news-scraping web application. It fetches a news homepage,
//! extracts the headline link of every `<article>` element, stores the
//! headlines, and serves them back as HTML pages and JSON routes. Readers
//! can save headlines worth keeping and attach free-text notes to them.
//!
//! ## Modules
//!
//! - [`scrapers`]: fetch the source page and extract `(title, link)` pairs
//! - [`store`]: the repository trait with SQLite and in-memory backends
//! - [`server`]: the axum router and route handlers
//! - [`views`]: server-side HTML for the home and saved pages
//! - [`models`]: articles, notes and filters
//! - [`cli`]: runtime configuration from flags and environment variables

pub mod cli;
pub mod models;
pub mod scrapers;
pub mod server;
pub mod store;
pub mod utils;
pub mod views;
