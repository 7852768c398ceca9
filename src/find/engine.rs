//! Find and Replace engine for Marknote
//!
//! This module owns the search state machine behind the find panel:
//! - Query and option changes (case, whole word, regex) reset the cursor
//! - Matches are re-derived from the live document text on every call
//! - Next/previous navigation wraps around
//! - Replace and Replace All share the exact pattern used for matching
//!
//! The engine never owns the document. Every operation that needs matches
//! takes the current text, so offsets can never refer to a stale snapshot.

use log::debug;
use std::ops::Range;

use super::pattern::{Pattern, PatternCompiler, SearchOptions, SearchOptionsUpdate};
use crate::string_utils::CharOffsetCursor;

// ─────────────────────────────────────────────────────────────────────────────
// Match
// ─────────────────────────────────────────────────────────────────────────────

/// One located occurrence of the query in a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// 0-based ordinal among all matches
    pub index: usize,
    /// Inclusive character offset
    pub start: usize,
    /// Exclusive character offset
    pub end: usize,
    /// The matched substring
    pub text: String,
    /// Byte span of the match, for slicing the same snapshot
    pub byte_range: Range<usize>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Find Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Search state for the find/replace panel.
#[derive(Debug, Clone, Default)]
pub struct FindEngine {
    query: String,
    options: SearchOptions,
    /// Intended current match; clamped against the live match count on read
    current_index: usize,
}

impl FindEngine {
    /// Create an engine with an empty query and default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine starting from the given options.
    pub fn with_options(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Replace the query and reset the cursor to the first match.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.current_index = 0;
    }

    /// Merge option changes and reset the cursor to the first match.
    pub fn set_options(&mut self, update: SearchOptionsUpdate) {
        self.options = self.options.merged(update);
        self.current_index = 0;
    }

    /// Forget the query and cursor, keeping the options.
    pub fn clear(&mut self) {
        self.query.clear();
        self.current_index = 0;
    }

    /// Compile the current query, treating any failure as "no pattern".
    fn pattern(&self) -> Option<Pattern> {
        match PatternCompiler::compile(&self.query, self.options) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                debug!("No search pattern: {}", e);
                None
            }
        }
    }

    fn spans(&self, text: &str) -> (Option<Pattern>, Vec<Range<usize>>) {
        let pattern = self.pattern();
        let spans = pattern
            .as_ref()
            .map(|p| p.find_spans(text))
            .unwrap_or_default();
        (pattern, spans)
    }

    /// All matches of the current query in `text`.
    pub fn matches(&self, text: &str) -> Vec<Match> {
        let (_, spans) = self.spans(text);
        let mut offsets = CharOffsetCursor::new(text);

        spans
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                let start = offsets.char_index(range.start);
                let end = offsets.char_index(range.end);
                Match {
                    index,
                    start,
                    end,
                    text: text[range.clone()].to_string(),
                    byte_range: range,
                }
            })
            .collect()
    }

    /// Number of matches of the current query in `text`.
    pub fn total_matches(&self, text: &str) -> usize {
        self.spans(text).1.len()
    }

    /// The current index given `count` matches, clamped to the last one.
    pub fn clamped_index(&self, count: usize) -> Option<usize> {
        if count == 0 {
            None
        } else {
            Some(self.current_index.min(count - 1))
        }
    }

    /// The current match index for `text`, or `None` when nothing matches.
    pub fn current_index(&self, text: &str) -> Option<usize> {
        self.clamped_index(self.total_matches(text))
    }

    /// The current match in `text`, if any.
    pub fn current_match(&self, text: &str) -> Option<Match> {
        let matches = self.matches(text);
        let index = self.clamped_index(matches.len())?;
        matches.into_iter().nth(index)
    }

    /// Move to the next match, wrapping to the first.
    ///
    /// Returns the new index, or `None` if there are no matches.
    pub fn go_to_next(&mut self, text: &str) -> Option<usize> {
        let count = self.total_matches(text);
        let current = self.clamped_index(count)?;
        self.current_index = (current + 1) % count;
        Some(self.current_index)
    }

    /// Move to the previous match, wrapping to the last.
    ///
    /// Returns the new index, or `None` if there are no matches.
    pub fn go_to_prev(&mut self, text: &str) -> Option<usize> {
        let count = self.total_matches(text);
        let current = self.clamped_index(count)?;
        self.current_index = (current + count - 1) % count;
        Some(self.current_index)
    }

    /// Jump to match `index`. Out-of-range indices are ignored.
    ///
    /// Returns whether the cursor moved.
    pub fn go_to_match(&mut self, text: &str, index: usize) -> bool {
        if index < self.total_matches(text) {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    /// Replace the current match and return the new document text.
    ///
    /// Returns `text` unchanged when there is nothing to replace.
    pub fn replace(&self, text: &str, replacement: &str) -> String {
        let (pattern, spans) = self.spans(text);
        let (Some(pattern), Some(index)) = (pattern, self.clamped_index(spans.len())) else {
            return text.to_string();
        };

        let span = &spans[index];
        let substitute = pattern.replacement_for(text, span, replacement);

        let mut new_text = String::with_capacity(text.len() + substitute.len());
        new_text.push_str(&text[..span.start]);
        new_text.push_str(&substitute);
        new_text.push_str(&text[span.end..]);

        debug!("Replaced match {} at bytes {:?}", index + 1, span);
        new_text
    }

    /// Replace every match in one pass and return the new document text.
    ///
    /// Uses the same compiled pattern as [`FindEngine::matches`], so exactly
    /// the highlighted occurrences are replaced.
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        let (pattern, spans) = self.spans(text);
        let Some(pattern) = pattern else {
            return text.to_string();
        };
        if spans.is_empty() {
            return text.to_string();
        }

        let mut new_text = String::with_capacity(text.len());
        let mut last_end = 0;

        for span in &spans {
            new_text.push_str(&text[last_end..span.start]);
            new_text.push_str(&pattern.replacement_for(text, span, replacement));
            last_end = span.end;
        }

        new_text.push_str(&text[last_end..]);
        debug!("Replaced all {} matches", spans.len());
        new_text
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(query: &str) -> FindEngine {
        let mut engine = FindEngine::new();
        engine.set_query(query);
        engine
    }

    fn spans_of(matches: &[Match]) -> Vec<(usize, usize)> {
        matches.iter().map(|m| (m.start, m.end)).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Matching
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_engine_is_empty() {
        let engine = FindEngine::new();
        assert!(engine.query().is_empty());
        assert_eq!(engine.options(), SearchOptions::default());
        assert!(engine.matches("anything").is_empty());
        assert_eq!(engine.current_index("anything"), None);
    }

    #[test]
    fn test_match_count_and_offsets() {
        let text = "the cat sat on the mat";
        let matches = engine("at").matches(text);
        assert_eq!(matches.len(), 3);
        assert_eq!(spans_of(&matches), vec![(5, 7), (9, 11), (20, 22)]);
        for (i, m) in matches.iter().enumerate() {
            assert_eq!(m.index, i);
            assert_eq!(m.text, "at");
            assert_eq!(&text[m.byte_range.clone()], "at");
        }
    }

    #[test]
    fn test_whole_word() {
        let mut engine = engine("cat");
        engine.set_options(SearchOptionsUpdate::default().whole_word(true));
        let matches = engine.matches("concatenate cat catalog");
        assert_eq!(spans_of(&matches), vec![(12, 15)]);
    }

    #[test]
    fn test_literal_dot_is_escaped() {
        let matches = engine("a.b").matches("a.b axb");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "a.b");
    }

    #[test]
    fn test_regex_mode() {
        let mut engine = engine(r"\d+");
        engine.set_options(SearchOptionsUpdate::default().use_regex(true));
        let matches = engine.matches("abc123def456ghi");
        assert_eq!(spans_of(&matches), vec![(3, 6), (9, 12)]);
    }

    #[test]
    fn test_invalid_regex_yields_no_matches() {
        let mut engine = engine("[invalid");
        engine.set_options(SearchOptionsUpdate::default().use_regex(true));
        assert!(engine.matches("test [invalid text").is_empty());
        assert_eq!(engine.total_matches("test"), 0);
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let text = "Hei på deg, på ny 🎉 på";
        let matches = engine("på").matches(text);
        assert_eq!(spans_of(&matches), vec![(4, 6), (12, 14), (20, 22)]);
        assert_eq!(matches[2].text, "på");
    }

    #[test]
    fn test_matches_track_live_text() {
        let engine = engine("x");
        assert_eq!(engine.total_matches("x x"), 2);
        assert_eq!(engine.total_matches("x x x x"), 4);
    }

    #[test]
    fn test_non_overlapping_matches() {
        let matches = engine("aa").matches("aaaa");
        assert_eq!(spans_of(&matches), vec![(0, 2), (2, 4)]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_next_wraps_around() {
        let text = "axbxcx";
        let mut engine = engine("x");
        assert_eq!(engine.current_index(text), Some(0));
        assert_eq!(engine.go_to_next(text), Some(1));
        assert_eq!(engine.go_to_next(text), Some(2));
        assert_eq!(engine.go_to_next(text), Some(0));
    }

    #[test]
    fn test_prev_wraps_around() {
        let text = "axbxcx";
        let mut engine = engine("x");
        assert_eq!(engine.go_to_prev(text), Some(2));
        assert_eq!(engine.go_to_prev(text), Some(1));
    }

    #[test]
    fn test_navigation_without_matches_is_noop() {
        let mut engine = engine("zzz");
        assert_eq!(engine.go_to_next("abc"), None);
        assert_eq!(engine.go_to_prev("abc"), None);
        assert_eq!(engine.current_index("abc"), None);
    }

    #[test]
    fn test_go_to_match_bounds() {
        let text = "x x x";
        let mut engine = engine("x");
        assert!(engine.go_to_match(text, 2));
        assert_eq!(engine.current_index(text), Some(2));
        assert!(!engine.go_to_match(text, 3));
        assert_eq!(engine.current_index(text), Some(2));
    }

    #[test]
    fn test_query_and_option_changes_reset_cursor() {
        let text = "x x x";
        let mut engine = engine("x");
        engine.go_to_match(text, 2);
        engine.set_options(SearchOptionsUpdate::default().case_sensitive(true));
        assert_eq!(engine.current_index(text), Some(0));

        engine.go_to_match(text, 1);
        engine.set_query("x ");
        assert_eq!(engine.current_index(text), Some(0));
    }

    #[test]
    fn test_cursor_clamped_after_text_shrinks() {
        let mut engine = engine("x");
        engine.go_to_match("xxxxx", 4);
        assert_eq!(engine.current_index("xx"), Some(1));
        assert_eq!(engine.go_to_next("xx"), Some(0));
    }

    #[test]
    fn test_current_match() {
        let text = "hello world wide world";
        let mut engine = engine("world");
        assert_eq!(engine.current_match(text).map(|m| m.start), Some(6));
        engine.go_to_next(text);
        assert_eq!(engine.current_match(text).map(|m| m.start), Some(17));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replace
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_replace_current() {
        let text = "foo and foo";
        let mut engine = engine("foo");
        assert_eq!(engine.replace(text, "bar"), "bar and foo");
        engine.go_to_next(text);
        assert_eq!(engine.replace(text, "bar"), "foo and bar");
    }

    #[test]
    fn test_replace_without_matches_returns_input() {
        assert_eq!(engine("zzz").replace("hello", "x"), "hello");
        assert_eq!(FindEngine::new().replace("hello", "x"), "hello");
    }

    #[test]
    fn test_replace_all() {
        assert_eq!(engine("a").replace_all("abracadabra", "X"), "XbrXcXdXbrX");
    }

    #[test]
    fn test_replace_all_respects_options() {
        let mut engine = engine("cat");
        engine.set_options(SearchOptionsUpdate::default().whole_word(true));
        assert_eq!(
            engine.replace_all("concatenate cat Cat catalog", "dog"),
            "concatenate dog dog catalog"
        );

        engine.set_options(SearchOptionsUpdate::default().case_sensitive(true));
        assert_eq!(
            engine.replace_all("cat Cat", "dog"),
            "dog Cat"
        );
    }

    #[test]
    fn test_replace_all_is_idempotent() {
        let engine = engine("a.b");
        let once = engine.replace_all("a.b axb a.b", "z");
        assert_eq!(once, "z axb z");
        assert_eq!(engine.replace_all(&once, "z"), once);
    }

    #[test]
    fn test_replace_all_invalid_regex_returns_input() {
        let mut engine = engine("(unclosed");
        engine.set_options(SearchOptionsUpdate::default().use_regex(true));
        assert_eq!(engine.replace_all("(unclosed", "x"), "(unclosed");
    }

    #[test]
    fn test_replace_all_multiline() {
        assert_eq!(engine("\n").replace_all("a\nb\nc", " | "), "a | b | c");
    }

    #[test]
    fn test_regex_replace_expands_groups() {
        let mut engine = engine(r"(\w+)=(\w+)");
        engine.set_options(SearchOptionsUpdate::default().use_regex(true));
        let text = "a=1, b=2";
        assert_eq!(engine.replace(text, "$2=$1"), "1=a, b=2");
        assert_eq!(engine.replace_all(text, "$2=$1"), "1=a, 2=b");
    }

    #[test]
    fn test_regex_replace_group_then_letters() {
        let mut engine = engine(r"(\d+)");
        engine.set_options(SearchOptionsUpdate::default().use_regex(true));
        assert_eq!(engine.replace_all("a 12 b", "$1px"), "a 12px b");
        assert_eq!(engine.replace("a 12 b 3", "$1px"), "a 12px b 3");
    }

    #[test]
    fn test_replace_uses_clamped_cursor_after_text_shrinks() {
        let mut engine = engine("x");
        assert!(engine.go_to_match("x x x x", 3));
        assert_eq!(engine.replace("x x", "y"), "x y");
    }

    #[test]
    fn test_replace_all_with_zero_length_matches_terminates() {
        let mut engine = engine("^");
        engine.set_options(SearchOptionsUpdate::default().use_regex(true));
        assert_eq!(engine.replace_all("a\nb", "> "), "> a\n> b");
    }

    #[test]
    fn test_clear_keeps_options() {
        let mut engine = FindEngine::with_options(SearchOptions {
            whole_word: true,
            ..Default::default()
        });
        engine.set_query("word");
        engine.clear();
        assert!(engine.query().is_empty());
        assert!(engine.options().whole_word);
    }
}
