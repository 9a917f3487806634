//! Source document fetching and HTML-to-text extraction.
//!
//! The FAQ page is fetched once at startup with a bounded timeout and
//! reduced to plain text before chunking. Script, style, and head
//! content is dropped; block elements become line breaks so the
//! question/answer line structure of the page survives extraction.

use anyhow::Result;
use scraper::{Html, Node};

/// Fetch the raw body of the source page. Non-2xx statuses are errors.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    Ok(body)
}

/// Elements whose text never belongs in the index.
fn is_skipped(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "noscript" | "head" | "template")
}

/// Elements that imply a line break in the extracted text.
fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "section"
            | "article"
            | "li"
            | "ul"
            | "ol"
            | "br"
            | "tr"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
    )
}

/// Reduce an HTML page to whitespace-normalized plain text.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();

    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Text(text) => {
                let in_skipped = node.ancestors().any(|a| match a.value() {
                    Node::Element(el) => is_skipped(el.name()),
                    _ => false,
                });
                if !in_skipped {
                    raw.push_str(text);
                }
            }
            Node::Element(el) if is_block(el.name()) => raw.push('\n'),
            _ => {}
        }
    }

    // Collapse intra-line whitespace and drop blank lines.
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
