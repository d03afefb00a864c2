//! Outcome classification for raw result-cell text.
//!
//! The rule set is an ordered association list (category → patterns), so a
//! new outcome phrasing is an additive edit to [`RULES`] rather than a logic
//! change. Classification is a pure function of the cell text: no hidden
//! state, no locale dependence.

use std::sync::LazyLock;

use regex::Regex;

use crate::OutcomeCategory;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));

/// How a pattern matches normalized cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Whole-cell equality after normalization.
    Exact(&'static str),
    /// Substring match anywhere in the normalized text.
    Contains(&'static str),
}

impl Pattern {
    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Exact(p) => text == *p,
            Self::Contains(p) => text.contains(p),
        }
    }
}

/// Ordered classification rules.
///
/// The first category whose pattern set matches wins. Skipped markers are
/// checked before pass/fail so that variants of "n/a" are never claimed by
/// a substring of another category. Short words that would over-match as
/// substrings ("ok", "no", "err") are exact-only.
pub const RULES: &[(OutcomeCategory, &[Pattern])] = &[
    (
        OutcomeCategory::Skipped,
        &[
            Pattern::Contains("n/a"),
            Pattern::Contains("not available"),
            Pattern::Contains("not applicable"),
            Pattern::Contains("skip"),
            Pattern::Contains("pending"),
            Pattern::Exact("na"),
            Pattern::Exact("-"),
        ],
    ),
    (
        OutcomeCategory::Pass,
        &[
            Pattern::Contains("pass"),
            Pattern::Contains("success"),
            Pattern::Contains("\u{2713}"), // ✓
            Pattern::Contains("\u{2714}"), // ✔
            Pattern::Exact("ok"),
            Pattern::Exact("yes"),
            Pattern::Exact("done"),
            Pattern::Exact("valid"),
            Pattern::Exact("completed"),
            Pattern::Exact("accepted"),
            Pattern::Exact("approved"),
        ],
    ),
    (
        OutcomeCategory::Fail,
        &[
            Pattern::Contains("fail"),
            Pattern::Contains("\u{2717}"), // ✗
            Pattern::Contains("\u{2718}"), // ✘
            Pattern::Contains("\u{274c}"), // ❌
            Pattern::Contains("rejected"),
            Pattern::Contains("blocked"),
            Pattern::Exact("no"),
            Pattern::Exact("invalid"),
            Pattern::Exact("incomplete"),
            Pattern::Exact("not done"),
            Pattern::Exact("not started"),
        ],
    ),
    (
        OutcomeCategory::Error,
        &[
            Pattern::Contains("error"),
            Pattern::Contains("exception"),
            Pattern::Exact("err"),
        ],
    ),
];

/// Normalizes cell text for matching: trim, collapse internal whitespace
/// to single spaces, lowercase.
///
/// # Examples
///
/// ```
/// use qa_report_core::classify::normalize;
///
/// assert_eq!(normalize("  PASSED \n with  notes "), "passed with notes");
/// ```
pub fn normalize(raw: &str) -> String {
    WHITESPACE_RE
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// Classifies a raw cell value into exactly one [`OutcomeCategory`].
///
/// Empty (or whitespace-only) text and text matching no rule both map to
/// [`OutcomeCategory::Unknown`]; no input is ever dropped.
///
/// # Examples
///
/// ```
/// use qa_report_core::{OutcomeCategory, classify::classify};
///
/// assert_eq!(classify("Passed"), OutcomeCategory::Pass);
/// assert_eq!(classify("  FAIL  "), OutcomeCategory::Fail);
/// assert_eq!(classify("N/A"), OutcomeCategory::Skipped);
/// assert_eq!(classify("tbd?"), OutcomeCategory::Unknown);
/// assert_eq!(classify(""), OutcomeCategory::Unknown);
/// ```
pub fn classify(raw: &str) -> OutcomeCategory {
    let text = normalize(raw);
    if text.is_empty() {
        return OutcomeCategory::Unknown;
    }
    for (category, patterns) in RULES {
        if patterns.iter().any(|p| p.matches(&text)) {
            return *category;
        }
    }
    OutcomeCategory::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_variants() {
        for text in [
            "pass", "Pass", "PASS", "Passed", " passed ", "pass with comments", "Success",
            "successful", "OK", "ok", "Yes", "Done", "\u{2713}", "Completed",
        ] {
            assert_eq!(classify(text), OutcomeCategory::Pass, "text: {text:?}");
        }
    }

    #[test]
    fn test_fail_variants() {
        for text in [
            "fail", "Fail", "FAILED", "Failure", "failed - see notes", "\u{274c}", "No",
            "Rejected", "Blocked", "invalid", "Not done",
        ] {
            assert_eq!(classify(text), OutcomeCategory::Fail, "text: {text:?}");
        }
    }

    #[test]
    fn test_error_variants() {
        for text in ["error", "Error", "script ERROR", "exception thrown", "err"] {
            assert_eq!(classify(text), OutcomeCategory::Error, "text: {text:?}");
        }
    }

    #[test]
    fn test_skipped_variants() {
        for text in [
            "n/a", "N/A", "NA", "na", "Not Applicable", "not available", "skip", "Skipped",
            "pending", "Pending retest", "-",
        ] {
            assert_eq!(classify(text), OutcomeCategory::Skipped, "text: {text:?}");
        }
    }

    #[test]
    fn test_unknown_fallback() {
        for text in ["", "   ", "\n\t", "tbd?", "see jira", "42", "later maybe"] {
            assert_eq!(classify(text), OutcomeCategory::Unknown, "text: {text:?}");
        }
    }

    #[test]
    fn test_canonical_labels_are_idempotent() {
        for category in OutcomeCategory::ALL {
            if category == OutcomeCategory::Unknown {
                continue; // "unknown" is a fallback, not a pattern
            }
            assert_eq!(classify(category.as_str()), category);
        }
    }

    #[test]
    fn test_short_words_do_not_over_match() {
        // "ok" / "no" / "err" are exact-only; supersets must not match them.
        assert_eq!(classify("broken"), OutcomeCategory::Unknown);
        assert_eq!(classify("note"), OutcomeCategory::Unknown);
        assert_eq!(classify("nope"), OutcomeCategory::Unknown);
    }

    #[test]
    fn test_skipped_wins_over_pass_and_fail() {
        // A "n/a" marker with noise around it stays skipped even though
        // later categories also scan the text.
        assert_eq!(classify("n/a (env down)"), OutcomeCategory::Skipped);
    }

    #[test]
    fn test_whitespace_collapse_before_matching() {
        assert_eq!(classify("not \n  done"), OutcomeCategory::Fail);
        assert_eq!(classify("not\tavailable"), OutcomeCategory::Skipped);
    }

    #[test]
    fn test_classification_is_pure() {
        for _ in 0..3 {
            assert_eq!(classify("Passed"), OutcomeCategory::Pass);
        }
    }
}
