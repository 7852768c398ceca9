//! Clipboard content classification
//!
//! Pasted text is tagged with exactly one [`ContentType`] by running an
//! ordered list of cheap textual heuristics. The first rule that fires wins;
//! anything no rule recognises is plain [`ContentType::Text`].
//!
//! # Rule order
//!
//! 1. `url`: starts with `http://`/`https://`; refined to YouTube, GitHub, Figma
//! 2. `javascript`: contains `function `, `const `, or `import `
//! 3. `python`: contains `def ` or `import `
//! 4. `sql`: contains `SELECT ` or `INSERT `
//! 5. `json`: the whole text parses as JSON
//! 6. `csv`: multiple lines, commas, and a multi-field first line
//! 7. `email`: contains `@` and an address-like token
//!
//! `import ` appears in both the JavaScript and Python rules. JavaScript is
//! checked first, so `import numpy` is tagged `javascript`. This is a known
//! imprecision of the heuristic.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Content Type
// ─────────────────────────────────────────────────────────────────────────────

/// The semantic shape of pasted clipboard content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Youtube,
    Github,
    Figma,
    Url,
    Javascript,
    Python,
    Sql,
    Json,
    Csv,
    Email,
    #[default]
    Text,
}

impl ContentType {
    /// Lowercase tag, also used as the code fence language.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Youtube => "youtube",
            ContentType::Github => "github",
            ContentType::Figma => "figma",
            ContentType::Url => "url",
            ContentType::Javascript => "javascript",
            ContentType::Python => "python",
            ContentType::Sql => "sql",
            ContentType::Json => "json",
            ContentType::Csv => "csv",
            ContentType::Email => "email",
            ContentType::Text => "text",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classifier Rules
// ─────────────────────────────────────────────────────────────────────────────

/// One heuristic in the classifier chain.
pub struct ClassifierRule {
    /// Short name for logging
    pub name: &'static str,
    /// Returns the tag this rule assigns, or `None` to fall through
    pub detect: fn(&str) -> Option<ContentType>,
}

/// The classifier chain, in priority order.
pub const CLASSIFIER_RULES: &[ClassifierRule] = &[
    ClassifierRule {
        name: "url",
        detect: detect_url,
    },
    ClassifierRule {
        name: "javascript",
        detect: detect_javascript,
    },
    ClassifierRule {
        name: "python",
        detect: detect_python,
    },
    ClassifierRule {
        name: "sql",
        detect: detect_sql,
    },
    ClassifierRule {
        name: "json",
        detect: detect_json,
    },
    ClassifierRule {
        name: "csv",
        detect: detect_csv,
    },
    ClassifierRule {
        name: "email",
        detect: detect_email,
    },
];

/// Tag `text` with the first matching rule's content type.
pub fn classify(text: &str) -> ContentType {
    CLASSIFIER_RULES
        .iter()
        .find_map(|rule| (rule.detect)(text))
        .unwrap_or(ContentType::Text)
}

fn contains_any(text: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| text.contains(token))
}

fn detect_url(text: &str) -> Option<ContentType> {
    let trimmed = text.trim();
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return None;
    }

    let content_type = if contains_any(trimmed, &["youtube.com", "youtu.be"]) {
        ContentType::Youtube
    } else if trimmed.contains("github.com") {
        ContentType::Github
    } else if trimmed.contains("figma.com") {
        ContentType::Figma
    } else {
        ContentType::Url
    };
    Some(content_type)
}

fn detect_javascript(text: &str) -> Option<ContentType> {
    contains_any(text, &["function ", "const ", "import "]).then_some(ContentType::Javascript)
}

fn detect_python(text: &str) -> Option<ContentType> {
    contains_any(text, &["def ", "import "]).then_some(ContentType::Python)
}

fn detect_sql(text: &str) -> Option<ContentType> {
    contains_any(text, &["SELECT ", "INSERT "]).then_some(ContentType::Sql)
}

fn detect_json(text: &str) -> Option<ContentType> {
    serde_json::from_str::<serde_json::Value>(text)
        .is_ok()
        .then_some(ContentType::Json)
}

fn detect_csv(text: &str) -> Option<ContentType> {
    if !text.contains(',') || !text.contains('\n') {
        return None;
    }
    let first_line = text.lines().next().unwrap_or("");
    (first_line.split(',').count() > 1).then_some(ContentType::Csv)
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

fn detect_email(text: &str) -> Option<ContentType> {
    (text.contains('@') && email_regex().is_match(text)).then_some(ContentType::Email)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_refinement() {
        assert_eq!(
            classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            ContentType::Youtube
        );
        assert_eq!(classify("https://youtu.be/dQw4w9WgXcQ"), ContentType::Youtube);
        assert_eq!(classify("https://github.com/rust-lang/rust"), ContentType::Github);
        assert_eq!(classify("https://www.figma.com/file/abc"), ContentType::Figma);
        assert_eq!(classify("  http://example.com/page \n"), ContentType::Url);
    }

    #[test]
    fn test_url_must_be_prefix() {
        // Contains a URL but does not start with one
        assert_eq!(classify("see https://example.com"), ContentType::Text);
    }

    #[test]
    fn test_javascript() {
        assert_eq!(classify("const x = 1;"), ContentType::Javascript);
        assert_eq!(classify("function add(a, b) {}"), ContentType::Javascript);
    }

    #[test]
    fn test_python() {
        assert_eq!(classify("def main():\n    pass"), ContentType::Python);
    }

    #[test]
    fn test_import_prefers_javascript() {
        assert_eq!(classify("import numpy as np"), ContentType::Javascript);
    }

    #[test]
    fn test_sql() {
        assert_eq!(classify("SELECT * FROM users"), ContentType::Sql);
        assert_eq!(classify("INSERT INTO t VALUES (1)"), ContentType::Sql);
        assert_eq!(classify("select * from users"), ContentType::Text);
    }

    #[test]
    fn test_json() {
        assert_eq!(classify(r#"{"x":1}"#), ContentType::Json);
        assert_eq!(classify("[1, 2, 3]"), ContentType::Json);
        assert_eq!(classify("42"), ContentType::Json);
        assert_eq!(classify(r#"{"x":1"#), ContentType::Text);
    }

    #[test]
    fn test_csv() {
        assert_eq!(classify("a,b\n1,2\n3,4"), ContentType::Csv);
        // Single line is not CSV
        assert_eq!(classify("a,b,c"), ContentType::Text);
        // Comma only on a later line
        assert_eq!(classify("header\n1,2"), ContentType::Text);
    }

    #[test]
    fn test_email() {
        assert_eq!(classify("someone@example.com"), ContentType::Email);
        assert_eq!(classify("@handle"), ContentType::Text);
    }

    #[test]
    fn test_text_fallback() {
        assert_eq!(classify(""), ContentType::Text);
        assert_eq!(classify("just some words"), ContentType::Text);
    }

    #[test]
    fn test_each_rule_in_isolation() {
        let by_name = |name: &str| {
            CLASSIFIER_RULES
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.detect)
                .unwrap()
        };
        assert_eq!(by_name("python")("import os"), Some(ContentType::Python));
        assert_eq!(by_name("json")("not json"), None);
        assert_eq!(by_name("csv")("x,y\n1,2"), Some(ContentType::Csv));
        assert_eq!(by_name("url")("ftp://host"), None);
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = CLASSIFIER_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["url", "javascript", "python", "sql", "json", "csv", "email"]
        );
    }

    #[test]
    fn test_content_type_serde() {
        assert_eq!(
            serde_json::to_string(&ContentType::Javascript).unwrap(),
            "\"javascript\""
        );
        assert_eq!(ContentType::Csv.to_string(), "csv");
    }
}
