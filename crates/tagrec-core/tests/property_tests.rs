//! Property-based tests for tag parsing and candidate scoring.

use proptest::prelude::*;

use tagrec_core::dataset::split_tags;
use tagrec_core::recommend::score_candidates;
use tagrec_core::vocab::Vocabulary;
use tagrec_core::TwoTowerModel;

proptest! {
    /// Parsed tokens are never empty, never carry surrounding whitespace,
    /// and never contain a separator character.
    #[test]
    fn prop_split_tags_tokens_are_clean(raw in ".{0,64}") {
        let tags = split_tags(&raw);
        for tag in &tags {
            prop_assert!(!tag.is_empty());
            prop_assert_eq!(tag.trim(), tag.as_str());
            prop_assert!(!tag.contains([',', '|', '/']));
        }
    }

    /// Parsing twice yields the same result, and tokens are distinct.
    #[test]
    fn prop_split_tags_deterministic_and_distinct(raw in ".{0,64}") {
        let first = split_tags(&raw);
        let second = split_tags(&raw);
        prop_assert_eq!(&first, &second);

        let mut deduped = first.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), first.len());
    }

    /// Rejoining parsed tokens parses back to the same token list.
    #[test]
    fn prop_split_tags_stable_under_rejoin(raw in "[a-z ,|/]{0,48}") {
        let tags = split_tags(&raw);
        let rejoined = tags.join(",");
        prop_assert_eq!(split_tags(&rejoined), tags);
    }

    /// Candidate scoring returns every candidate exactly once, sorted by
    /// non-increasing score.
    #[test]
    fn prop_scores_sorted_and_complete(
        n_items in 1usize..40,
        dim in 1usize..16,
        seed in 0u64..1000,
    ) {
        let items: Vec<String> = (0..n_items).map(|i| format!("r{i:03}")).collect();
        let model = TwoTowerModel::new(
            Vocabulary::from_ids(["tag::x"]),
            Vocabulary::from_ids(items),
            dim,
            seed,
        );

        let query: Vec<f32> = model.user_tower().lookup("tag::x").to_vec();
        let ranked = score_candidates(&model, &query);

        prop_assert_eq!(ranked.len(), n_items);
        for window in ranked.windows(2) {
            prop_assert!(window[0].1 >= window[1].1);
        }

        let mut indices: Vec<usize> = ranked.iter().map(|(i, _)| *i).collect();
        indices.sort_unstable();
        let expected: Vec<usize> = (0..n_items).collect();
        prop_assert_eq!(indices, expected);
    }
}
