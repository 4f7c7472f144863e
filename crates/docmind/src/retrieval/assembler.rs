//! Context assembly from vector search matches

use crate::types::Match;

/// Separator placed between chunk texts in the assembled context
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Join the texts of matches scoring strictly above `threshold`.
///
/// Order is preserved. Matches without a score, or without stored text, are
/// skipped. Returns an empty string when nothing qualifies.
pub fn assemble_context(matches: &[Match], threshold: f32) -> String {
    qualifying_texts(matches, threshold)
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Number of matches that would enter the context
pub fn count_qualifying(matches: &[Match], threshold: f32) -> usize {
    qualifying_texts(matches, threshold).count()
}

fn qualifying_texts(matches: &[Match], threshold: f32) -> impl Iterator<Item = &str> {
    matches
        .iter()
        .filter(move |m| m.score.is_some_and(|score| score > threshold))
        .filter_map(Match::text)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;
    use proptest::prelude::*;

    #[test]
    fn test_empty_matches() {
        assert_eq!(assemble_context(&[], 0.6), "");
    }

    #[test]
    fn test_low_scores_filtered() {
        let matches = vec![Match::new("a", 0.9, "keep me"), Match::new("b", 0.1, "drop me")];
        assert_eq!(assemble_context(&matches, 0.6), "keep me");
    }

    #[test]
    fn test_join_with_separator() {
        let matches = vec![Match::new("a", 0.8, "A"), Match::new("b", 0.7, "B")];
        assert_eq!(assemble_context(&matches, 0.6), "A\n\n---\n\nB");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let matches = vec![Match::new("a", 0.6, "edge")];
        assert_eq!(assemble_context(&matches, 0.6), "");
    }

    #[test]
    fn test_missing_score_or_text_skipped() {
        let matches = vec![
            Match {
                id: "no-score".to_string(),
                score: None,
                metadata: Some(ChunkMetadata::text("unscored")),
            },
            Match {
                id: "no-text".to_string(),
                score: Some(0.95),
                metadata: None,
            },
            Match::new("empty", 0.9, ""),
            Match::new("ok", 0.9, "only this"),
        ];
        assert_eq!(assemble_context(&matches, 0.6), "only this");
        assert_eq!(count_qualifying(&matches, 0.6), 1);
    }

    proptest! {
        #[test]
        fn prop_context_is_ordered_join_of_qualifying(
            entries in proptest::collection::vec(("[a-z]{1,10}", 0.0f32..1.0), 0..20),
            threshold in 0.0f32..1.0,
        ) {
            let matches: Vec<Match> = entries
                .iter()
                .enumerate()
                .map(|(i, (text, score))| Match::new(format!("id-{}", i), *score, text.clone()))
                .collect();

            let expected: Vec<&str> = entries
                .iter()
                .filter(|(_, score)| *score > threshold)
                .map(|(text, _)| text.as_str())
                .collect();

            let context = assemble_context(&matches, threshold);
            prop_assert_eq!(context.clone(), expected.join(CONTEXT_SEPARATOR));
            if expected.is_empty() {
                prop_assert!(context.is_empty());
            } else {
                prop_assert_eq!(context.split(CONTEXT_SEPARATOR).count(), expected.len());
            }
        }
    }
}
