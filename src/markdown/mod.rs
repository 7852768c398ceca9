//! Markdown rendering and formatting for Marknote
//!
//! Rendering goes through comrak (CommonMark + GitHub Flavored Markdown).
//! The HTML renderer is treated as an opaque pure function by the rest of
//! the application.
//!
//! - `formatting.rs` - selection-aware formatting operations
//! - `preview.rs` - comrak AST to egui preview pane

mod formatting;
mod preview;

pub use formatting::{apply_format, MarkdownFormat};
pub use preview::MarkdownPreview;

use comrak::{markdown_to_html, Options};

/// Parser and renderer options shared by the preview and HTML output.
pub(crate) fn comrak_options() -> Options {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());

    // Pasted embeds (YouTube thumbnails, raw HTML) must survive rendering
    options.render.unsafe_ = true;

    options
}

/// Render Markdown to an HTML fragment.
pub fn render_html(markdown: &str) -> String {
    markdown_to_html(markdown, &comrak_options())
}
