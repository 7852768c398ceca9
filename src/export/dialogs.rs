//! Save-as dialogs for exporting the document
//!
//! Both functions return `Ok(None)` when the user cancels the dialog.

use log::info;
use rfd::FileDialog;
use std::fs;
use std::path::{Path, PathBuf};

use super::html::{document_title, generate_html_document};
use crate::error::{Error, Result};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Ask where to save the Markdown source and write it there.
pub fn export_markdown_dialog(markdown: &str) -> Result<Option<PathBuf>> {
    let dialog = FileDialog::new()
        .set_title("Export as Markdown")
        .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
        .set_file_name(suggested_file_name(markdown, "md"));

    match dialog.save_file() {
        Some(path) => {
            write_export(&path, markdown)?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

/// Ask where to save the rendered page and write it there.
pub fn export_html_dialog(markdown: &str) -> Result<Option<PathBuf>> {
    let dialog = FileDialog::new()
        .set_title("Export as HTML")
        .add_filter("HTML Files", HTML_EXTENSIONS)
        .set_file_name(suggested_file_name(markdown, "html"));

    match dialog.save_file() {
        Some(path) => {
            write_export(&path, &generate_html_document(markdown, None))?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

fn write_export(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Exported {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// File name derived from the first heading, e.g. `Release Notes` → `release-notes.md`.
fn suggested_file_name(markdown: &str, extension: &str) -> String {
    let stem: String = document_title(markdown)
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let stem = stem
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if stem.is_empty() {
        format!("document.{}", extension)
    } else {
        format!("{}.{}", stem, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_suggested_file_name() {
        assert_eq!(
            suggested_file_name("# Release Notes: v2!\n", "md"),
            "release-notes-v2.md"
        );
        assert_eq!(suggested_file_name("no heading", "html"), "document.html");
    }

    #[test]
    fn test_write_export() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("out.md");
        write_export(&path, "# Hi").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Hi");
    }

    #[test]
    fn test_write_export_error_names_path() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("missing").join("out.md");
        let err = write_export(&path, "x").unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
        assert!(err.to_string().contains("out.md"));
    }
}
