//! Markdown formatting for classified clipboard content
//!
//! Maps a `(text, ContentType)` pair to the Markdown snippet that gets
//! inserted into the document. Every input produces a string; malformed
//! JSON or ragged CSV degrade instead of failing.

use regex::Regex;
use serde_json::{Number, Value};
use std::sync::OnceLock;

use super::classify::ContentType;

/// Format `text` as Markdown according to its content type.
pub fn format_content(text: &str, content_type: ContentType) -> String {
    match content_type {
        ContentType::Youtube => format_youtube(text.trim()),
        ContentType::Github => markdown_link("GitHub Repository", text.trim()),
        ContentType::Figma => markdown_link("Figma Design", text.trim()),
        ContentType::Url => markdown_link("Link", text.trim()),
        ContentType::Javascript | ContentType::Python | ContentType::Sql => {
            code_fence(content_type.as_str(), text)
        }
        ContentType::Json => format_json(text),
        ContentType::Csv => csv_to_table(text),
        ContentType::Email => {
            let address = text.trim();
            format!("[{}](mailto:{})", address, address)
        }
        ContentType::Text => text.to_string(),
    }
}

fn markdown_link(label: &str, url: &str) -> String {
    format!("[{}]({})", label, url)
}

fn code_fence(language: &str, body: &str) -> String {
    format!("```{}\n{}\n```", language, body)
}

// ─────────────────────────────────────────────────────────────────────────────
// YouTube
// ─────────────────────────────────────────────────────────────────────────────

fn youtube_id_regex() -> &'static Regex {
    static YOUTUBE_ID: OnceLock<Regex> = OnceLock::new();
    YOUTUBE_ID.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([^&\n?#]+)")
            .expect("youtube id pattern is valid")
    })
}

/// Extract the video id from a `watch?v=` or `youtu.be/` URL.
pub fn extract_youtube_id(url: &str) -> Option<&str> {
    youtube_id_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn format_youtube(url: &str) -> String {
    match extract_youtube_id(url) {
        Some(id) => format!(
            "[![YouTube Video](https://img.youtube.com/vi/{}/0.jpg)]({})",
            id, url
        ),
        None => markdown_link("YouTube Video", url),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON
// ─────────────────────────────────────────────────────────────────────────────

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn format_json(text: &str) -> String {
    let body = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|mut value| {
            normalize_numbers(&mut value);
            serde_json::to_string_pretty(&value).ok()
        })
        .unwrap_or_else(|| text.to_string());
    code_fence("json", &body)
}

/// Print integral floats without a fraction (`1.0` becomes `1`).
fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(number) if number.is_f64() => {
            if let Some(float) = number.as_f64() {
                if float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER {
                    *number = Number::from(float as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSV
// ─────────────────────────────────────────────────────────────────────────────

fn table_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<&str> = cells.map(str::trim).collect();
    format!("| {} |", cells.join(" | "))
}

/// Convert comma-separated lines to a Markdown table.
///
/// The first line is the header. Rows keep exactly the cells they have;
/// ragged rows are not padded or truncated.
pub fn csv_to_table(text: &str) -> String {
    let mut lines = text.trim().lines();
    let Some(header_line) = lines.next() else {
        return String::new();
    };

    let header = table_row(header_line.split(','));
    let column_count = header_line.split(',').count();
    let separator = table_row(std::iter::repeat("---").take(column_count));

    let mut rows = vec![header, separator];
    rows.extend(lines.map(|line| table_row(line.split(','))));
    rows.join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_watch_url() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42";
        assert_eq!(
            format_content(url, ContentType::Youtube),
            "[![YouTube Video](https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg)](https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42)"
        );
    }

    #[test]
    fn test_youtube_short_url() {
        assert_eq!(extract_youtube_id("https://youtu.be/abc123?si=x"), Some("abc123"));
    }

    #[test]
    fn test_youtube_without_id_falls_back_to_link() {
        let url = "https://www.youtube.com/channel/xyz";
        assert_eq!(
            format_content(url, ContentType::Youtube),
            "[YouTube Video](https://www.youtube.com/channel/xyz)"
        );
    }

    #[test]
    fn test_labeled_links() {
        assert_eq!(
            format_content("https://github.com/a/b", ContentType::Github),
            "[GitHub Repository](https://github.com/a/b)"
        );
        assert_eq!(
            format_content("https://figma.com/file/1", ContentType::Figma),
            "[Figma Design](https://figma.com/file/1)"
        );
        assert_eq!(
            format_content(" https://example.com\n", ContentType::Url),
            "[Link](https://example.com)"
        );
    }

    #[test]
    fn test_code_fences() {
        assert_eq!(
            format_content("const x = 1;", ContentType::Javascript),
            "```javascript\nconst x = 1;\n```"
        );
        assert_eq!(
            format_content("def f(): pass", ContentType::Python),
            "```python\ndef f(): pass\n```"
        );
        assert_eq!(
            format_content("SELECT 1", ContentType::Sql),
            "```sql\nSELECT 1\n```"
        );
    }

    #[test]
    fn test_json_is_reindented() {
        assert_eq!(
            format_content(r#"{"x":1}"#, ContentType::Json),
            "```json\n{\n  \"x\": 1\n}\n```"
        );
    }

    #[test]
    fn test_json_integral_floats_lose_fraction() {
        assert_eq!(
            format_content(r#"{"x":1.0,"y":[2.50,-3.0],"z":1e3}"#, ContentType::Json),
            "```json\n{\n  \"x\": 1,\n  \"y\": [\n    2.5,\n    -3\n  ],\n  \"z\": 1000\n}\n```"
        );
    }

    #[test]
    fn test_json_keeps_key_order() {
        let out = format_content(r#"{"b":1,"a":2}"#, ContentType::Json);
        assert!(out.find("\"b\"").unwrap() < out.find("\"a\"").unwrap());
    }

    #[test]
    fn test_malformed_json_falls_back_to_raw_block() {
        assert_eq!(
            format_content(r#"{"x":"#, ContentType::Json),
            "```json\n{\"x\":\n```"
        );
    }

    #[test]
    fn test_csv_table() {
        assert_eq!(
            format_content("a,b\n1,2\n3,4", ContentType::Csv),
            "| a | b |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |"
        );
    }

    #[test]
    fn test_csv_trims_cells_and_keeps_ragged_rows() {
        assert_eq!(
            csv_to_table(" name , age \r\nann, 31, extra\nbob\n"),
            "| name | age |\n| --- | --- |\n| ann | 31 | extra |\n| bob |"
        );
    }

    #[test]
    fn test_csv_empty_input() {
        assert_eq!(csv_to_table("   "), "");
    }

    #[test]
    fn test_email_link() {
        assert_eq!(
            format_content("someone@example.com", ContentType::Email),
            "[someone@example.com](mailto:someone@example.com)"
        );
    }

    #[test]
    fn test_text_passthrough() {
        assert_eq!(format_content("  plain\n", ContentType::Text), "  plain\n");
        assert_eq!(format_content("", ContentType::Text), "");
    }
}
