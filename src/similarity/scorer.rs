//! Pairwise lexical similarity
//!
//! Sørensen–Dice coefficient over the multiset of character bigrams, with
//! whitespace removed first, scaled to a 0–100 percentage. Pure and
//! deterministic; no I/O.

use std::collections::HashMap;

/// Score two texts for lexical similarity, in [0, 100]
///
/// An empty input on either side scores 0 (no comparison possible).
/// Identical texts (ignoring whitespace) score 100.
pub fn score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 100.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    // Multiset of bigrams: repeated bigrams count once per occurrence
    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    let total = (a.len() - 1) + (b.len() - 1);
    (2.0 * intersection as f64 / total as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_texts_score_100() {
        assert!(close(score("a", "a"), 100.0));
        assert!(close(
            score("the quick brown fox", "the quick brown fox"),
            100.0
        ));
    }

    #[test]
    fn test_empty_input_scores_0() {
        assert!(close(score("", "anything"), 0.0));
        assert!(close(score("anything", ""), 0.0));
        assert!(close(score("", ""), 0.0));
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("night", "nacht"),
            ("the quick brown fox", "a lazy dog"),
            ("aaaa", "aa"),
            ("résumé", "resume"),
        ];
        for (a, b) in pairs {
            assert!(close(score(a, b), score(b, a)), "asymmetric for {a:?}/{b:?}");
        }
    }

    #[test]
    fn test_known_dice_value() {
        // night/nacht share one bigram ("ht") of 4 + 4: 2*1/8 = 25%
        assert!(close(score("night", "nacht"), 25.0));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert!(close(score("hello world", "helloworld"), 100.0));
        assert!(close(score("a b c d", "abcd"), 100.0));
    }

    #[test]
    fn test_repeated_bigrams_count_as_multiset() {
        // "aaaa" has bigrams {aa, aa, aa}; "aa" has {aa}: 2*1/(3+1) = 50%
        assert!(close(score("aaaa", "aa"), 50.0));
    }

    #[test]
    fn test_single_char_no_overlap() {
        // Too short for bigrams and not identical
        assert!(close(score("a", "b"), 0.0));
    }

    #[test]
    fn test_disjoint_texts_score_0() {
        assert!(close(score("abcdef", "uvwxyz"), 0.0));
    }

    #[test]
    fn test_partial_overlap() {
        // abcdef/abcdex share 4 of 5+5 bigrams: 2*4/10 = 80%
        assert!(close(score("abcdef", "abcdex"), 80.0));
    }
}
