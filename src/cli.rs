//! Command-line interface definitions for Headline Notes.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also be supplied through an environment variable, and
//! every option has a default, so the server starts with no arguments at all.

use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for the Headline Notes server.
///
/// # Examples
///
/// ```sh
/// # Defaults: port 3000, ./headlines.db, scraping https://www.nytimes.com/
/// headline_notes
///
/// # Throwaway in-memory store on another port
/// PORT=8080 headline_notes --database-url memory://
///
/// # Scrape a different homepage
/// headline_notes --source-url https://lite.cnn.com/
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Database connection string (`sqlite://…`, or `memory://` for a throwaway store)
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite://headlines.db")]
    pub database_url: String,

    /// Homepage whose `<article>` links are scraped
    #[arg(short, long, env = "SCRAPE_SOURCE_URL", default_value = "https://www.nytimes.com/")]
    pub source_url: Url,

    /// Directory served under `/public`
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Seconds before a scrape request to the source gives up
    #[arg(long, env = "SCRAPE_TIMEOUT_SECS", default_value_t = 30)]
    pub scrape_timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["headline_notes"]).unwrap();

        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.source_url.as_str(), "https://www.nytimes.com/");
        assert_eq!(cli.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "headline_notes",
            "--port",
            "8080",
            "--database-url",
            "memory://",
            "--source-url",
            "https://lite.cnn.com/",
            "--scrape-timeout-secs",
            "5",
        ]);

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.database_url, "memory://");
        assert_eq!(cli.source_url.host_str(), Some("lite.cnn.com"));
        assert_eq!(cli.scrape_timeout_secs, 5);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["headline_notes", "-p", "4000", "-d", "sqlite:///tmp/h.db"]);

        assert_eq!(cli.port, 4000);
        assert_eq!(cli.database_url, "sqlite:///tmp/h.db");
    }

    #[test]
    fn test_cli_rejects_bad_source_url() {
        assert!(Cli::try_parse_from(["headline_notes", "--source-url", "not a url"]).is_err());
    }
}
