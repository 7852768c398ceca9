//! HTML to Markdown degrading converter
//!
//! Rich clipboard content (copied from a browser or word processor) arrives
//! as HTML. A fixed subset of tags is rewritten into Markdown by ordered
//! substitution; every tag still left afterwards is stripped.

use regex::Regex;
use std::sync::OnceLock;

/// Substitutions applied in order. Headings first so their inner `<strong>`
/// or `<code>` are still converted by the later rules.
const HTML_RULES: &[(&str, &str)] = &[
    (r"<h1[^>]*>(.*?)</h1>", "# ${1}\n\n"),
    (r"<h2[^>]*>(.*?)</h2>", "## ${1}\n\n"),
    (r"<h3[^>]*>(.*?)</h3>", "### ${1}\n\n"),
    (r"<h4[^>]*>(.*?)</h4>", "#### ${1}\n\n"),
    (r"<h5[^>]*>(.*?)</h5>", "##### ${1}\n\n"),
    (r"<h6[^>]*>(.*?)</h6>", "###### ${1}\n\n"),
    (r"<strong[^>]*>(.*?)</strong>", "**${1}**"),
    (r"<em[^>]*>(.*?)</em>", "*${1}*"),
    (r"<code[^>]*>(.*?)</code>", "`${1}`"),
    (r#"<a\s[^>]*?href="([^"]*)"[^>]*>(.*?)</a>"#, "[${2}](${1})"),
    (r"<br\s*/?>", "\n"),
    (r"</p>", "\n\n"),
    (r"<[^>]*>", ""),
];

fn compiled_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        HTML_RULES
            .iter()
            .map(|(pattern, replacement)| {
                let regex = Regex::new(&format!("(?is){}", pattern))
                    .expect("html conversion patterns are valid");
                (regex, *replacement)
            })
            .collect()
    })
}

/// Convert an HTML fragment to Markdown, trimming surrounding whitespace.
pub fn html_to_markdown(html: &str) -> String {
    let converted = compiled_rules()
        .iter()
        .fold(html.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).into_owned()
        });
    converted.trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings() {
        assert_eq!(html_to_markdown("<h1>Title</h1>"), "# Title");
        assert_eq!(
            html_to_markdown("<h2 class=\"x\">Sub</h2><h6>Tiny</h6>"),
            "## Sub\n\n###### Tiny"
        );
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            html_to_markdown("<p><strong>bold</strong> and <em>it</em> and <code>x()</code></p>"),
            "**bold** and *it* and `x()`"
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            html_to_markdown(r#"<a class="l" href="https://example.com" target="_blank">site</a>"#),
            "[site](https://example.com)"
        );
    }

    #[test]
    fn test_breaks_and_paragraphs() {
        assert_eq!(
            html_to_markdown("<p>one<br>two<br/>three</p><p>four</p>"),
            "one\ntwo\nthree\n\nfour"
        );
    }

    #[test]
    fn test_unknown_tags_are_stripped() {
        assert_eq!(
            html_to_markdown("<div><span style=\"color:red\">red</span></div>"),
            "red"
        );
    }

    #[test]
    fn test_case_insensitive_tags() {
        assert_eq!(html_to_markdown("<STRONG>loud</STRONG>"), "**loud**");
    }

    #[test]
    fn test_nested_heading_content() {
        assert_eq!(
            html_to_markdown("<h3><em>Styled</em> heading</h3>"),
            "### *Styled* heading"
        );
    }

    #[test]
    fn test_multiline_element_content() {
        assert_eq!(html_to_markdown("<strong>a\nb</strong>"), "**a\nb**");
    }
}
