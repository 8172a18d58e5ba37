//! Server-side HTML for the two browsable pages.
//!
//! | Page | Route | Shows |
//! |------|-------|-------|
//! | Home | `/` | unsaved articles with a "Save Article" button |
//! | Saved | `/saved` | saved articles, their notes, and a note form |
//!
//! Pages are assembled with `write!` into a `String` and wrapped in the
//! shared [`layout`]. Every piece of stored text is escaped with
//! `html-escape` before it reaches the markup. Buttons carry `data-*`
//! attributes that `public/app.js` turns into calls to the JSON routes.

pub mod layout;

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use crate::models::{Article, Note, PopulatedArticle};
use layout::{Nav, page};

/// Render the inbox of unsaved articles.
pub fn render_home(articles: &[Article]) -> String {
    let mut body = String::new();

    if articles.is_empty() {
        body.push_str(&empty_state(
            "Uh Oh. Looks like we don't have any new articles.",
            EmptyAction::Scrape,
        ));
        return page("Latest Headlines", Nav::Home, &body);
    }

    for article in articles {
        writeln!(body, "<div class=\"card\" data-id=\"{}\">", article.id).unwrap();
        writeln!(body, "  <div class=\"card-header\">").unwrap();
        body.push_str(&headline_link(&article.title, &article.link));
        writeln!(
            body,
            "    <button type=\"button\" class=\"save\" data-action=\"save\" data-id=\"{}\">Save Article</button>",
            article.id
        )
        .unwrap();
        writeln!(body, "  </div>").unwrap();
        writeln!(body, "</div>").unwrap();
    }

    page("Latest Headlines", Nav::Home, &body)
}

/// Render saved articles together with their notes.
pub fn render_saved(articles: &[PopulatedArticle]) -> String {
    let mut body = String::new();

    if articles.is_empty() {
        body.push_str(&empty_state(
            "Uh Oh. Looks like we don't have any saved articles.",
            EmptyAction::BrowseHome,
        ));
        return page("Saved Articles", Nav::Saved, &body);
    }

    for article in articles {
        writeln!(body, "<div class=\"card\" data-id=\"{}\">", article.id).unwrap();
        writeln!(body, "  <div class=\"card-header\">").unwrap();
        body.push_str(&headline_link(&article.title, &article.link));
        writeln!(
            body,
            "    <button type=\"button\" class=\"delete\" data-action=\"unsave\" data-id=\"{}\">Delete From Saved</button>",
            article.id
        )
        .unwrap();
        writeln!(body, "  </div>").unwrap();
        body.push_str(&notes_section(article));
        writeln!(body, "</div>").unwrap();
    }

    page("Saved Articles", Nav::Saved, &body)
}

fn headline_link(title: &str, link: &str) -> String {
    format!(
        "    <h3><a class=\"article-link\" target=\"_blank\" rel=\"noopener\" href=\"{}\">{}</a></h3>\n",
        encode_double_quoted_attribute(link),
        encode_text(title)
    )
}

fn notes_section(article: &PopulatedArticle) -> String {
    let mut html = String::new();
    writeln!(html, "  <section class=\"notes\">").unwrap();
    writeln!(html, "    <h4>Notes For Article</h4>").unwrap();

    if article.notes.is_empty() {
        writeln!(html, "    <p class=\"no-notes\">No notes for this article yet.</p>").unwrap();
    } else {
        writeln!(html, "    <ul class=\"note-list\">").unwrap();
        for note in &article.notes {
            html.push_str(&note_item(note));
        }
        writeln!(html, "    </ul>").unwrap();
    }

    writeln!(
        html,
        "    <form class=\"note-form\" data-action=\"add-note\" data-id=\"{}\">",
        article.id
    )
    .unwrap();
    writeln!(
        html,
        "      <textarea name=\"text\" placeholder=\"New Note\" required></textarea>"
    )
    .unwrap();
    writeln!(html, "      <button type=\"submit\">Save Note</button>").unwrap();
    writeln!(html, "    </form>").unwrap();
    writeln!(html, "  </section>").unwrap();
    html
}

fn note_item(note: &Note) -> String {
    format!(
        "      <li class=\"note\">{} <button type=\"button\" class=\"note-delete\" data-action=\"delete-note\" data-note-id=\"{}\" data-article-id=\"{}\">x</button></li>\n",
        encode_text(&note.body),
        note.id,
        note.article
    )
}

/// What the empty-state panel offers instead of a list.
enum EmptyAction {
    Scrape,
    BrowseHome,
}

fn empty_state(message: &str, action: EmptyAction) -> String {
    let mut html = String::new();
    writeln!(html, "<div class=\"empty\">").unwrap();
    writeln!(html, "  <h4>{}</h4>", encode_text(message)).unwrap();
    writeln!(html, "  <h3>What Would You Like To Do?</h3>").unwrap();
    match action {
        EmptyAction::Scrape => writeln!(
            html,
            "  <button type=\"button\" class=\"scrape-new\" data-action=\"scrape\">Scrape New Articles</button>"
        )
        .unwrap(),
        EmptyAction::BrowseHome => writeln!(html, "  <a href=\"/\">Browse Articles</a>").unwrap(),
    }
    writeln!(html, "</div>").unwrap();
    html
}
