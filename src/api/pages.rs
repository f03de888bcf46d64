//! Server-rendered HTML for the recommendation page
use std::fmt::Write;

use crate::models::Recommendation;

const STYLE: &str = r#"
    body { background-color: #0b1d3a; color: #e6e6e6; font-family: sans-serif; margin: 2rem; }
    h1 { color: #ffffff; font-weight: 700; }
    select { color: black; padding: 0.4rem; min-width: 20rem; }
    button { background-color: #1f3c88; color: white; border-radius: 8px; border: none; padding: 0.5rem 1rem; cursor: pointer; }
    .columns { display: grid; gap: 1rem; margin-top: 1.5rem; }
    .column p { margin: 0 0 0.5rem 0; }
    .column img { width: 100%; border-radius: 4px; }
    .error { color: #ff8a80; }
"#;

/// What to show below the selection form
#[derive(Debug)]
pub enum Outcome {
    /// Nothing selected yet
    Idle,
    Recommendations(Vec<Recommendation>),
    Error(String),
}

/// Escapes text for use in HTML content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders the full page
///
/// `columns` fixes how many recommendations sit side by side.
pub fn render_index<'a>(
    titles: impl Iterator<Item = &'a str>,
    selected: Option<&str>,
    outcome: &Outcome,
    columns: usize,
) -> String {
    let mut html = String::new();

    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Movie Recommendation System</title>\n<style>{}</style>\n</head>\n<body>\n\
         <h1>🎬 Movie Recommendation System</h1>\n",
        STYLE
    );

    html.push_str("<form method=\"get\" action=\"/\">\n<label for=\"movie\">Select a movie</label><br>\n");
    html.push_str("<select id=\"movie\" name=\"movie\">\n");
    for title in titles {
        let marker = if Some(title) == selected { " selected" } else { "" };
        let escaped = escape(title);
        let _ = writeln!(html, "<option value=\"{0}\"{1}>{0}</option>", escaped, marker);
    }
    html.push_str("</select>\n<button type=\"submit\">Recommend</button>\n</form>\n");

    if let Some(title) = selected {
        let _ = writeln!(html, "<p>You selected: {}</p>", escape(title));
    }

    match outcome {
        Outcome::Idle => {}
        Outcome::Error(message) => {
            let _ = writeln!(html, "<p class=\"error\">{}</p>", escape(message));
        }
        Outcome::Recommendations(recommendations) if recommendations.is_empty() => {
            html.push_str("<p>No similar movies found.</p>\n");
        }
        Outcome::Recommendations(recommendations) => {
            let _ = writeln!(
                html,
                "<div class=\"columns\" style=\"grid-template-columns: repeat({}, 1fr);\">",
                columns.max(1)
            );
            for rec in recommendations {
                let title = escape(&rec.title);
                let _ = writeln!(
                    html,
                    "<div class=\"column\"><p>{0}</p><img src=\"{1}\" alt=\"{0}\"></div>",
                    title,
                    escape(&rec.poster_url)
                );
            }
            html.push_str("</div>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}
