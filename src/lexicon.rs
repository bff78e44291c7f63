//! Canonical phrase sets shared by every classification path.
//!
//! There is exactly one crisis list. The keyword classifier, the model-backed
//! classifier and the safety screen all read from here, so the sets cannot
//! drift apart.
//!
//! All entries are lower-case and matched as substrings of lower-cased text.

// ── Crisis indicators ───────────────────────────────────────────────────

/// Self-harm, suicidal-ideation and hopelessness phrases.
pub const CRISIS_PHRASES: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end it all",
    "end my life",
    "hurt myself",
    "harm myself",
    "self harm",
    "self-harm",
    "want to die",
    "better off dead",
    "no point living",
    "not worth living",
    "can't go on",
    "cant go on",
    "hopeless",
];

// ── Sentiment keywords ──────────────────────────────────────────────────

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "sad",
    "depressed",
    "anxious",
    "worried",
    "stressed",
    "overwhelmed",
    "lonely",
    "tired",
    "exhausted",
    "frustrated",
    "angry",
    "upset",
    "awful",
    "terrible",
    "horrible",
    "bad",
    "worst",
];

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "happy",
    "great",
    "wonderful",
    "amazing",
    "good",
    "better",
    "excited",
    "proud",
    "grateful",
    "thankful",
    "love",
    "excellent",
    "fantastic",
    "awesome",
    "brilliant",
    "perfect",
];

/// Number of distinct phrases in `phrases` that occur in `lower`.
///
/// `lower` must already be lower-cased. Each phrase counts at most once.
pub fn count_matches(lower: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| lower.contains(*p)).count()
}

/// First crisis phrase found in `lower`, if any.
pub fn find_crisis_phrase(lower: &str) -> Option<&'static str> {
    CRISIS_PHRASES.iter().copied().find(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_sets_are_lower_case_and_non_empty() {
        for set in [CRISIS_PHRASES, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS] {
            assert!(!set.is_empty());
            for phrase in set {
                assert!(!phrase.is_empty());
                assert_eq!(*phrase, phrase.to_lowercase(), "{phrase} must be lower-case");
            }
        }
    }

    #[test]
    fn sentiment_sets_do_not_overlap() {
        for neg in NEGATIVE_KEYWORDS {
            assert!(!POSITIVE_KEYWORDS.contains(neg), "{neg} in both sets");
        }
    }

    #[test]
    fn count_matches_counts_each_phrase_once() {
        assert_eq!(count_matches("sad sad sad", NEGATIVE_KEYWORDS), 1);
        assert_eq!(count_matches("sad and tired", NEGATIVE_KEYWORDS), 2);
        assert_eq!(count_matches("the sky is blue", NEGATIVE_KEYWORDS), 0);
    }

    #[test]
    fn find_crisis_phrase_matches_substrings() {
        assert_eq!(find_crisis_phrase("i just want to die"), Some("want to die"));
        assert_eq!(find_crisis_phrase("feeling hopeless today"), Some("hopeless"));
        assert_eq!(find_crisis_phrase("a calm afternoon"), None);
    }
}
