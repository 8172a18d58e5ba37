//! # Headline Notes
//!
//! Server entry point: parse configuration, open the store, and serve the
//! web application.
//!
//! ## Usage
//!
//! ```sh
//! headline_notes --port 3000 --database-url sqlite://headlines.db
//! ```

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use headline_notes::cli::Cli;
use headline_notes::scrapers::Scraper;
use headline_notes::server::{self, AppState};
use headline_notes::store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "headline_notes starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let store = match store::connect(&args.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Could not open the article store");
            return Err(e.into());
        }
    };

    let scraper = Scraper::new(
        args.source_url.clone(),
        Duration::from_secs(args.scrape_timeout_secs),
    )?;
    info!(source = %scraper.source(), "Scraper configured");

    if !args.public_dir.is_dir() {
        warn!(path = %args.public_dir.display(), "Public directory missing; /public will return 404");
    }

    let app = server::router(AppState::new(store, scraper), &args.public_dir);
    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;
    server::serve(listener, app).await?;

    Ok(())
}
