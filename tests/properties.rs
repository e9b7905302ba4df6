//! Property-based tests for the rule stages
//!
//! These tests check the index arithmetic of the selector grammar and the
//! character selection, and the fixed points of the normalization.

use proptest::prelude::*;

use password_rules::rules::selector::{parse_ordinal_index, parse_selection_count};
use password_rules::rules::{CharacterIndices, CharacterSet, EveryNth, Rule, RuleConfig};

/// Generate a two-letter ordinal suffix
fn suffix_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("st".to_string()),
        Just("nd".to_string()),
        Just("rd".to_string()),
        Just("th".to_string()),
        "[a-zA-Z]{2}",
    ]
}

/// Generate a non-empty token
fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9]{1,20}",
        "[a-zäöüß]{1,12}",
        "\\PC{1,16}",
    ]
}

proptest! {
    #[test]
    fn front_ordinals_are_zero_based(k in 1isize..100_000, suffix in suffix_strategy()) {
        let text = format!("{}{}", k, suffix);
        prop_assert_eq!(parse_ordinal_index(&text).unwrap(), k - 1);
    }

    #[test]
    fn back_ordinals_are_negative(k in 1isize..100_000, suffix in suffix_strategy()) {
        let text = format!("{}{}last", k, suffix);
        prop_assert_eq!(parse_ordinal_index(&text).unwrap(), -k);
    }

    #[test]
    fn non_positive_ordinals_fail(k in -1000isize..=0, suffix in suffix_strategy()) {
        let text = format!("{}{}", k, suffix);
        prop_assert!(parse_ordinal_index(&text).is_err());
    }

    #[test]
    fn selections_count_from_one(k in 1usize..10_000, suffix in suffix_strategy()) {
        let text = format!("every{}{}", k, suffix);
        prop_assert_eq!(parse_selection_count(&text).unwrap(), k);
    }

    #[test]
    fn first_index_selects_first_char(token in token_strategy()) {
        let first = CharacterIndices::new(vec![0], false, false);
        prop_assert_eq!(first.select(&token), token.chars().next().unwrap().to_string());
    }

    #[test]
    fn last_index_selects_last_char(token in token_strategy()) {
        let last = CharacterIndices::new(vec![-1], false, false);
        prop_assert_eq!(last.select(&token), token.chars().last().unwrap().to_string());
    }

    #[test]
    fn round_robin_never_skips(token in token_strategy(), index in -1000isize..1000) {
        let filter = CharacterIndices::new(vec![index], false, true);
        prop_assert_eq!(filter.select(&token).chars().count(), 1);
    }

    #[test]
    fn without_duplicates_output_fits_token(
        token in token_strategy(),
        indices in prop::collection::vec(-30isize..30, 0..10),
    ) {
        let filter = CharacterIndices::new(indices.clone(), false, false);
        let output = filter.select(&token);
        prop_assert!(output.chars().count() <= token.chars().count());
        prop_assert!(output.chars().count() <= indices.len());
    }

    #[test]
    fn ascii_normalization_is_idempotent(text in "\\PC{0,64}") {
        let once = CharacterSet::Ascii.normalize(&text);
        prop_assert!(once.chars().all(|c| c.is_ascii() && !c.is_ascii_control()));
        prop_assert_eq!(CharacterSet::Ascii.normalize(&once), once);
    }

    #[test]
    fn lowercase_letters_stay_in_alphabet(text in "\\PC{0,64}") {
        let normalized = CharacterSet::LowercaseLetters.normalize(&text);
        prop_assert!(normalized.chars().all(|c| c.is_ascii_lowercase() || c == ' ' || c == '\t' || c == '\n'));
    }

    #[test]
    fn every_first_is_identity(tokens in prop::collection::vec("[a-z]{1,8}", 0..20)) {
        let filter = EveryNth::new(1).unwrap();
        prop_assert_eq!(filter.select(tokens.clone()), tokens);
    }

    #[test]
    fn every_nth_keeps_ceiling_share(tokens in prop::collection::vec("[a-z]{1,8}", 0..40), n in 1usize..8) {
        let filter = EveryNth::new(n).unwrap();
        let selected = filter.select(tokens.clone());
        prop_assert_eq!(selected.len(), (tokens.len() + n - 1) / n);
        prop_assert_eq!(selected.first(), tokens.first());
    }

    #[test]
    fn spaced_output_matches_unspaced(text in "[A-Za-z ,.!]{0,60}") {
        let plain = Rule::new(&RuleConfig::parse("ascii", "none", "every", "1st+last", None).unwrap(), None).unwrap();
        let spaced = Rule::new(&RuleConfig::parse("ascii", "none", "every", "1st+last", Some("true")).unwrap(), None).unwrap();

        let plain_output = plain.apply(&text);
        let spaced_output = spaced.apply(&text);
        prop_assert_eq!(spaced_output.replace(' ', ""), plain_output.clone());
        prop_assert_eq!(spaced_output.len(), (plain_output.len() * 2).saturating_sub(1));
    }

    #[test]
    fn steps_end_with_password(text in "\\PC{0,40}") {
        let rule = Rule::new(&RuleConfig::parse("lowercase-letters", "none", "every2nd", "1st+2ndlast", None).unwrap(), None).unwrap();
        let steps = rule.apply_in_steps(&text);
        prop_assert_eq!(steps.len(), 4);
        prop_assert_eq!(&steps[3], &rule.apply(&text));
    }
}
