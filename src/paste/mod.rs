//! Smart paste for Marknote
//!
//! Clipboard content is turned into a Markdown snippet before it reaches the
//! document:
//!
//! - `classify.rs` - ordered heuristics assigning a [`ContentType`]
//! - `transform.rs` - per-type Markdown formatting (links, fences, tables)
//! - `html.rs` - HTML clipboard content degraded to Markdown
//!
//! The snippet is always appended to the end of the document, separated by
//! blank lines, rather than spliced at the cursor.

mod classify;
mod html;
mod transform;

pub use classify::{classify, ContentType};
pub use html::html_to_markdown;
pub use transform::format_content;

use log::debug;

/// Turn clipboard content into the Markdown snippet to insert.
///
/// An HTML representation containing at least one `<` takes priority over
/// the plain text; otherwise the plain text is classified and formatted.
pub fn handle_paste(raw_text: &str, raw_html: Option<&str>) -> String {
    if let Some(html) = raw_html.filter(|html| html.contains('<')) {
        debug!("Pasting HTML content ({} bytes)", html.len());
        return html_to_markdown(html);
    }

    let content_type = classify(raw_text);
    debug!("Pasted content classified as {}", content_type);
    format_content(raw_text, content_type)
}

/// Append a pasted snippet to the document with a blank line on each side.
///
/// An empty snippet leaves the document unchanged.
pub fn append_snippet(document: &str, snippet: &str) -> String {
    if snippet.is_empty() {
        return document.to_string();
    }
    format!("{}\n\n{}\n\n", document, snippet)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
