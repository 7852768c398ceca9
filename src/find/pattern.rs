//! Search pattern compilation
//!
//! Turns a raw query string and a [`SearchOptions`] set into a compiled
//! [`Pattern`]. Literal queries, whole-word queries, and case folding all go
//! through the same regex so that what is found is exactly what gets replaced.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::string_utils::next_char_boundary;

// ─────────────────────────────────────────────────────────────────────────────
// Search Options
// ─────────────────────────────────────────────────────────────────────────────

/// Matching semantics for a find query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Whether letter case must match exactly
    pub case_sensitive: bool,
    /// Whether matches must be bounded by non-word characters or text edges
    pub whole_word: bool,
    /// Whether the query is a regular expression rather than literal text
    pub use_regex: bool,
}

/// A partial change to [`SearchOptions`]; `None` fields keep their value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptionsUpdate {
    pub case_sensitive: Option<bool>,
    pub whole_word: Option<bool>,
    pub use_regex: Option<bool>,
}

impl SearchOptionsUpdate {
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = Some(value);
        self
    }

    pub fn whole_word(mut self, value: bool) -> Self {
        self.whole_word = Some(value);
        self
    }

    pub fn use_regex(mut self, value: bool) -> Self {
        self.use_regex = Some(value);
        self
    }
}

impl SearchOptions {
    /// Return a copy with the set fields of `update` applied.
    pub fn merged(self, update: SearchOptionsUpdate) -> Self {
        Self {
            case_sensitive: update.case_sensitive.unwrap_or(self.case_sensitive),
            whole_word: update.whole_word.unwrap_or(self.whole_word),
            use_regex: update.use_regex.unwrap_or(self.use_regex),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Why a query could not be turned into a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The query was empty; there is nothing to search for
    EmptyQuery,
    /// The regex engine rejected the pattern
    InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::EmptyQuery => write!(f, "Empty search query"),
            CompileError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid search pattern '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for CompileError {}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Compiler
// ─────────────────────────────────────────────────────────────────────────────

/// Escape every regex metacharacter in `query` so it matches literally.
pub fn escape_literal(query: &str) -> String {
    regex::escape(query)
}

/// Builds [`Pattern`]s from queries.
pub struct PatternCompiler;

impl PatternCompiler {
    /// Compile `query` under `options`.
    ///
    /// An empty query short-circuits to [`CompileError::EmptyQuery`] without
    /// touching the regex engine.
    pub fn compile(query: &str, options: SearchOptions) -> Result<Pattern, CompileError> {
        if query.is_empty() {
            return Err(CompileError::EmptyQuery);
        }

        let source = if options.use_regex {
            query.to_string()
        } else {
            escape_literal(query)
        };

        // Group so alternations stay inside the boundaries
        let source = if options.whole_word {
            format!(r"\b(?:{})\b", source)
        } else {
            source
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .multi_line(true)
            .build()
            .map_err(|e| CompileError::InvalidPattern {
                pattern: query.to_string(),
                message: e.to_string(),
            })?;

        Ok(Pattern {
            regex,
            expand_captures: options.use_regex,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiled Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// A compiled, ready-to-scan search pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    /// Regex queries expand `$1`/`${name}` in replacements; literal ones don't
    expand_captures: bool,
}

impl Pattern {
    /// Byte spans of every non-overlapping match, in document order.
    ///
    /// A zero-length match advances the scan by one character before the
    /// next attempt so patterns like `a*` or `^` terminate.
    pub fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(m) = self.regex.find_at(text, pos) else {
                break;
            };
            spans.push(m.range());

            pos = if m.is_empty() {
                match next_char_boundary(text, m.end()) {
                    Some(next) => next,
                    None => break,
                }
            } else {
                m.end()
            };
        }

        spans
    }

    /// The text that replaces the match at `span`.
    pub fn replacement_for(&self, text: &str, span: &Range<usize>, replacement: &str) -> String {
        if !self.expand_captures {
            return replacement.to_string();
        }

        match self.regex.captures_at(text, span.start) {
            Some(caps) if caps.get(0).map(|m| m.range()) == Some(span.clone()) => {
                let mut expanded = String::new();
                caps.expand(&brace_group_refs(replacement, caps.len()), &mut expanded);
                expanded
            }
            _ => replacement.to_string(),
        }
    }

    /// The underlying regex source, after escaping and boundary wrapping.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Brace numeric group references so `$1px` reads as group 1 then `px`.
///
/// The longest digit prefix naming an existing group wins (`$12` with one
/// group is group 1 then `2`). A reference to no existing group stays
/// literal. Named references and `$$` pass through untouched.
fn brace_group_refs(replacement: &str, group_count: usize) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut rest = replacement;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push_str("$$");
            rest = tail;
            continue;
        }

        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        let mut len = digits;
        while len > 1 && after[..len].parse::<usize>().map_or(true, |n| n >= group_count) {
            len -= 1;
        }
        let group = &after[..len];
        if group.parse::<usize>().map_or(false, |n| n < group_count) {
            out.push_str("${");
            out.push_str(group);
            out.push('}');
        } else {
            out.push_str("$$");
            out.push_str(group);
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
