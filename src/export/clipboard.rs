//! Clipboard access through arboard.

use arboard::Clipboard;
use log::{debug, info};

use crate::error::Result;
use crate::markdown::render_html;

/// Copy the rendered document to the clipboard.
///
/// The HTML flavor goes to apps that accept rich paste; the Markdown source
/// is the plain-text fallback.
pub fn copy_html_to_clipboard(markdown: &str) -> Result<()> {
    let html = render_html(markdown);
    let mut clipboard = Clipboard::new()?;
    clipboard.set_html(html.as_str(), Some(markdown))?;
    info!("Copied {} bytes of HTML to clipboard", html.len());
    Ok(())
}

/// The HTML flavor of the clipboard, if it carries one.
///
/// egui paste events only deliver plain text, so rich content is read back
/// from the system clipboard when a paste is intercepted.
pub fn read_clipboard_html() -> Option<String> {
    clipboard_html(Clipboard::new().and_then(|mut clipboard| clipboard.get().html()))
}

fn clipboard_html(read: std::result::Result<String, arboard::Error>) -> Option<String> {
    match read {
        Ok(html) if !html.trim().is_empty() => Some(html),
        Ok(_) => None,
        Err(e) => {
            debug!("No HTML on clipboard: {}", e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
