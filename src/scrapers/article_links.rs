//! Headline extraction from a news homepage.
//!
//! Every `<article>` element contributes at most one headline. Only the
//! article's **direct child** anchors are considered: their text, joined, is
//! the title, and the first one's `href` is the link. Relative links are
//! resolved against the page URL.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::models::NewArticle;
use crate::utils::collapse_whitespace;

static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());

/// Extract one [`NewArticle`] per `<article>` element of `html`.
///
/// Articles without a child anchor, with an empty title, or whose `href`
/// does not resolve to an `http`/`https` URL are skipped.
pub fn extract(html: &str, base: &Url) -> Vec<NewArticle> {
    let document = Html::parse_document(html);
    document
        .select(&ARTICLE_SELECTOR)
        .enumerate()
        .filter_map(|(index, article)| {
            let found = headline(article, base);
            if found.is_none() {
                debug!(index, "Skipping article element without a usable headline");
            }
            found
        })
        .collect()
}

fn headline(article: ElementRef<'_>, base: &Url) -> Option<NewArticle> {
    let anchors: Vec<ElementRef<'_>> = article
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "a")
        .collect();

    let title = collapse_whitespace(&anchors.iter().flat_map(|a| a.text()).collect::<String>());
    if title.is_empty() {
        return None;
    }

    let href = anchors.first()?.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    let link = base.join(href).ok()?;
    if !matches!(link.scheme(), "http" | "https") {
        debug!(scheme = link.scheme(), "Skipping headline with a non-web link");
        return None;
    }

    Some(NewArticle {
        title,
        link: link.to_string(),
    })
}
