//! Weighted fuzzy scoring for command search
//!
//! Each searchable field gets a similarity in `0.0..=1.0`, taken as the better
//! of two measures:
//!
//! - a subsequence score from the skim algorithm, normalized against the
//!   query matched with itself (catches abbreviations like `exmd`)
//! - a sliding-window edit distance, normalized by query length (catches
//!   typos like `itlaic`)
//!
//! A field matches when its distance `1 - similarity` is within the threshold.
//! The record score is the product of `distance ^ weight` over matching
//! fields, so lower is better and `0.0` would be a perfect match.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Floor applied to exact-match distances so weights still separate records.
const EXACT_MATCH_EPSILON: f64 = 0.001;

/// How much each command field contributes to the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub name: f64,
    pub description: f64,
    pub category: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 0.7,
            description: 0.2,
            category: 0.1,
        }
    }
}

/// Scores free-text fields against a query.
pub struct FuzzyScorer {
    matcher: SkimMatcherV2,
    weights: FieldWeights,
    /// Maximum accepted field distance: 0.0 is exact only, 1.0 accepts anything
    threshold: f64,
}

impl FuzzyScorer {
    pub fn new(threshold: f64) -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
            weights: FieldWeights::default(),
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> FieldWeights {
        self.weights
    }

    /// Similarity of `field` to `query` in `0.0..=1.0`.
    ///
    /// Both strings are compared case-insensitively. An empty query or field
    /// has similarity `0.0`.
    pub fn similarity(&self, field: &str, query: &str) -> f64 {
        let field = field.to_lowercase();
        let query = query.trim().to_lowercase();
        if field.is_empty() || query.is_empty() {
            return 0.0;
        }

        let subsequence = self.subsequence_similarity(&field, &query);
        let edit = window_edit_similarity(&field, &query);
        subsequence.max(edit)
    }

    /// Score a record given `(field, weight)` pairs.
    ///
    /// Returns `None` when no field is within the threshold. Missing fields
    /// are skipped.
    pub fn score_fields(&self, query: &str, fields: &[(Option<&str>, f64)]) -> Option<f64> {
        let mut total = 1.0;
        let mut matched = false;

        for (field, weight) in fields {
            let Some(field) = field else { continue };
            let distance = 1.0 - self.similarity(field, query);
            if distance <= self.threshold {
                matched = true;
                total *= distance.max(EXACT_MATCH_EPSILON).powf(*weight);
            }
        }

        matched.then_some(total)
    }

    fn subsequence_similarity(&self, field: &str, query: &str) -> f64 {
        let Some(best) = self.matcher.fuzzy_match(query, query) else {
            return 0.0;
        };
        if best <= 0 {
            return 0.0;
        }
        match self.matcher.fuzzy_match(field, query) {
            Some(score) if score > 0 => (score as f64 / best as f64).min(1.0),
            _ => 0.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edit Distance
// ─────────────────────────────────────────────────────────────────────────────

/// Best `1 - distance / len(query)` over windows of `field` whose length is
/// within one character of the query.
fn window_edit_similarity(field: &str, query: &str) -> f64 {
    let query: Vec<char> = query.chars().collect();
    let field: Vec<char> = field.chars().collect();
    let q_len = query.len();
    if q_len == 0 || field.is_empty() {
        return 0.0;
    }

    let min_win = q_len.saturating_sub(1).max(1);
    let max_win = (q_len + 1).min(field.len());

    let best = if field.len() < min_win {
        levenshtein(&query, &field)
    } else {
        (min_win..=max_win)
            .flat_map(|win| field.windows(win))
            .map(|window| levenshtein(&query, window))
            .min()
            .unwrap_or(q_len)
    };

    (1.0 - best as f64 / q_len as f64).max(0.0)
}

/// Classic two-row Levenshtein distance over chars.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
