//! Markdown formatting operations for the editor
//!
//! Each operation takes the document, the current selection as a byte range,
//! and returns the new document plus the range to select afterwards. With no
//! selection, inline formats insert a placeholder at the cursor and select it
//! so the user can type over it.
//!
//! ```ignore
//! use crate::markdown::{apply_format, MarkdownFormat};
//!
//! let result = apply_format("Hello world", Some((0, 5)), MarkdownFormat::Bold);
//! assert_eq!(result.text, "**Hello** world");
//! ```

use crate::string_utils::floor_char_boundary;

// ─────────────────────────────────────────────────────────────────────────────
// Format Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting operations reachable from the command palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownFormat {
    /// **text**
    Bold,
    /// *text*
    Italic,
    /// `#` to `######` line prefix
    Heading(u8),
    /// Fenced code block around the selected lines
    CodeBlock,
    /// [text](url)
    Link,
    /// Two-column table template
    Table,
}

/// Placeholder text inserted when nothing is selected.
const BOLD_PLACEHOLDER: &str = "bold text";
const ITALIC_PLACEHOLDER: &str = "italic text";
const LINK_PLACEHOLDER: &str = "link text";
const CODE_PLACEHOLDER: &str = "code";
const URL_PLACEHOLDER: &str = "url";

const TABLE_TEMPLATE: &str = "| Column 1 | Column 2 |\n| --- | --- |\n|  |  |";

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying a formatting operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The new document text
    pub text: String,
    /// Byte range to select afterwards (start == end for a plain cursor)
    pub selection: (usize, usize),
    /// `false` when the operation removed existing formatting
    pub applied: bool,
}

impl FormatResult {
    fn selecting(text: String, start: usize, end: usize) -> Self {
        Self {
            text,
            selection: (start, end),
            applied: true,
        }
    }

    fn cursor(text: String, at: usize) -> Self {
        Self::selecting(text, at, at)
    }

    fn toggled_off(mut self) -> Self {
        self.applied = false;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point
// ─────────────────────────────────────────────────────────────────────────────

/// Apply `format` to `text` at `selection` (byte offsets, either order).
///
/// `None` means the cursor is at the end of the document.
pub fn apply_format(
    text: &str,
    selection: Option<(usize, usize)>,
    format: MarkdownFormat,
) -> FormatResult {
    let (start, end) = normalize_selection(text, selection);

    match format {
        MarkdownFormat::Bold => wrap_inline(text, start, end, "**", BOLD_PLACEHOLDER),
        MarkdownFormat::Italic => wrap_inline(text, start, end, "*", ITALIC_PLACEHOLDER),
        MarkdownFormat::Heading(level) => set_heading(text, start, level),
        MarkdownFormat::CodeBlock => fence_lines(text, start, end),
        MarkdownFormat::Link => make_link(text, start, end),
        MarkdownFormat::Table => insert_block(text, end, TABLE_TEMPLATE, Some("Column 1")),
    }
}

fn normalize_selection(text: &str, selection: Option<(usize, usize)>) -> (usize, usize) {
    let (a, b) = selection.unwrap_or((text.len(), text.len()));
    let a = floor_char_boundary(text, a.min(text.len()));
    let b = floor_char_boundary(text, b.min(text.len()));
    (a.min(b), a.max(b))
}

/// Byte range of the lines touched by `start..end`, without the final newline.
fn line_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[end..]
        .find('\n')
        .map(|i| end + i)
        .unwrap_or(text.len());
    (line_start, line_end)
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Formats
// ─────────────────────────────────────────────────────────────────────────────

fn wrap_inline(
    text: &str,
    start: usize,
    end: usize,
    marker: &str,
    placeholder: &str,
) -> FormatResult {
    let selected = &text[start..end];

    if start == end {
        let new_text = format!(
            "{}{marker}{placeholder}{marker}{}",
            &text[..start],
            &text[end..]
        );
        let inner = start + marker.len();
        return FormatResult::selecting(new_text, inner, inner + placeholder.len());
    }

    // Selection already includes the markers
    if selected.len() >= marker.len() * 2
        && selected.starts_with(marker)
        && selected.ends_with(marker)
    {
        let inner = &selected[marker.len()..selected.len() - marker.len()];
        let new_text = format!("{}{}{}", &text[..start], inner, &text[end..]);
        return FormatResult::selecting(new_text, start, start + inner.len()).toggled_off();
    }

    // Markers sit just outside the selection
    if start >= marker.len()
        && text[..start].ends_with(marker)
        && text[end..].starts_with(marker)
    {
        let outer = start - marker.len();
        let new_text = format!(
            "{}{}{}",
            &text[..outer],
            selected,
            &text[end + marker.len()..]
        );
        return FormatResult::selecting(new_text, outer, outer + selected.len()).toggled_off();
    }

    let new_text = format!(
        "{}{marker}{selected}{marker}{}",
        &text[..start],
        &text[end..]
    );
    let inner = start + marker.len();
    FormatResult::selecting(new_text, inner, inner + selected.len())
}

fn make_link(text: &str, start: usize, end: usize) -> FormatResult {
    let label = if start == end {
        LINK_PLACEHOLDER
    } else {
        &text[start..end]
    };

    let new_text = format!(
        "{}[{label}]({URL_PLACEHOLDER}){}",
        &text[..start],
        &text[end..]
    );

    if start == end {
        // Select the label so it can be typed over
        FormatResult::selecting(new_text, start + 1, start + 1 + label.len())
    } else {
        let url_start = start + label.len() + 3;
        FormatResult::selecting(new_text, url_start, url_start + URL_PLACEHOLDER.len())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Formats
// ─────────────────────────────────────────────────────────────────────────────

fn set_heading(text: &str, at: usize, level: u8) -> FormatResult {
    let level = level.clamp(1, 6) as usize;
    let (line_start, line_end) = line_span(text, at, at);
    let line = &text[line_start..line_end];

    let trimmed = line.trim_start();
    let existing = trimmed.chars().take_while(|&c| c == '#').count();
    let content = if existing > 0 {
        trimmed[existing..].trim_start()
    } else {
        trimmed
    };

    if existing == level {
        let new_text = format!("{}{}{}", &text[..line_start], content, &text[line_end..]);
        return FormatResult::cursor(new_text, line_start + content.len()).toggled_off();
    }

    let new_line = format!("{} {}", "#".repeat(level), content);
    let new_text = format!("{}{}{}", &text[..line_start], new_line, &text[line_end..]);
    FormatResult::cursor(new_text, line_start + new_line.len())
}

fn fence_lines(text: &str, start: usize, end: usize) -> FormatResult {
    if start == end && text[line_span(text, start, end).0..start].trim().is_empty() {
        let block = format!("```\n{CODE_PLACEHOLDER}\n```");
        return insert_block(text, start, &block, Some(CODE_PLACEHOLDER));
    }

    let (line_start, line_end) = line_span(text, start, end);
    let lines = &text[line_start..line_end];

    let line_list: Vec<&str> = lines.lines().collect();
    if line_list.len() >= 2
        && line_list[0].trim_start().starts_with("```")
        && line_list[line_list.len() - 1].trim() == "```"
    {
        let inner = line_list[1..line_list.len() - 1].join("\n");
        let new_text = format!("{}{}{}", &text[..line_start], inner, &text[line_end..]);
        return FormatResult::cursor(new_text, line_start).toggled_off();
    }

    let new_text = format!(
        "{}```\n{}\n```{}",
        &text[..line_start],
        lines,
        &text[line_end..]
    );
    // Cursor after the opening fence, ready for a language tag
    FormatResult::cursor(new_text, line_start + 3)
}

/// Insert `block` on its own lines at `at`, optionally selecting `select`
/// inside it.
fn insert_block(text: &str, at: usize, block: &str, select: Option<&str>) -> FormatResult {
    let before = &text[..at];
    let after = &text[at..];

    let lead = if before.is_empty() || before.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    let trail = if after.is_empty() || after.starts_with('\n') {
        ""
    } else {
        "\n"
    };

    let new_text = format!("{before}{lead}{block}{trail}{after}");
    let block_start = at + lead.len();

    match select.and_then(|s| block.find(s).map(|i| (i, s.len()))) {
        Some((offset, len)) => {
            FormatResult::selecting(new_text, block_start + offset, block_start + offset + len)
        }
        None => FormatResult::cursor(new_text, block_start + block.len()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
