//! Shared page chrome: document head, navigation bar and page header.

use html_escape::encode_text;
use std::fmt::Write;

/// Which navigation entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Home,
    Saved,
}

/// Wrap `body` in the site layout.
pub fn page(title: &str, active: Nav, body: &str) -> String {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>").unwrap();
    writeln!(html, "<html lang=\"en\">").unwrap();
    writeln!(html, "<head>").unwrap();
    writeln!(html, "  <meta charset=\"utf-8\">").unwrap();
    writeln!(
        html,
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    )
    .unwrap();
    writeln!(html, "  <title>{} | Headline Notes</title>", encode_text(title)).unwrap();
    writeln!(html, "  <link rel=\"stylesheet\" href=\"/public/style.css\">").unwrap();
    writeln!(html, "</head>").unwrap();
    writeln!(html, "<body>").unwrap();
    html.push_str(&navbar(active));
    html.push_str(&header(title));
    writeln!(html, "<main class=\"container\">").unwrap();
    html.push_str(body);
    writeln!(html, "</main>").unwrap();
    writeln!(html, "<script src=\"/public/app.js\"></script>").unwrap();
    writeln!(html, "</body>").unwrap();
    writeln!(html, "</html>").unwrap();
    html
}

fn navbar(active: Nav) -> String {
    let class = |nav: Nav| if nav == active { " class=\"active\"" } else { "" };

    let mut html = String::new();
    writeln!(html, "<nav class=\"navbar\">").unwrap();
    writeln!(html, "  <a class=\"brand\" href=\"/\">Headline Notes</a>").unwrap();
    writeln!(html, "  <ul>").unwrap();
    writeln!(html, "    <li><a href=\"/\"{}>Home</a></li>", class(Nav::Home)).unwrap();
    writeln!(
        html,
        "    <li><a href=\"/saved\"{}>Saved Articles</a></li>",
        class(Nav::Saved)
    )
    .unwrap();
    writeln!(html, "  </ul>").unwrap();
    writeln!(
        html,
        "  <button type=\"button\" class=\"scrape-new\" data-action=\"scrape\">Scrape New Articles</button>"
    )
    .unwrap();
    writeln!(html, "</nav>").unwrap();
    html
}

fn header(title: &str) -> String {
    format!(
        "<header class=\"jumbotron\">\n  <h1>{}</h1>\n</header>\n",
        encode_text(title)
    )
}
