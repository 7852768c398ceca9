//! Document export for Marknote
//!
//! - `html.rs` - standalone HTML page generation
//! - `dialogs.rs` - native save dialogs for Markdown and HTML export
//! - `clipboard.rs` - "Copy as HTML" and reading rich clipboard content

mod clipboard;
mod dialogs;
mod html;

pub use clipboard::{copy_html_to_clipboard, read_clipboard_html};
pub use dialogs::{export_html_dialog, export_markdown_dialog};
