//! Property tests for claim extraction: indicators are independent,
//! idempotent, and insensitive to other families' keywords.

use proptest::prelude::*;
use review_trends::claims::extract_claims;
use review_trends::Claim;

proptest! {
    #[test]
    fn extraction_is_idempotent(text in ".{0,200}") {
        let first = extract_claims(Some(&text));
        let second = extract_claims(Some(&text));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn other_families_do_not_change_an_indicator(text in "[a-z ]{0,80}") {
        // Appending a Brightening keyword must not flip any other claim.
        let base = extract_claims(Some(&text));
        let extended = extract_claims(Some(&format!("{text} glow")));

        for claim in [
            Claim::NaturalIngredients,
            Claim::Hydrating,
            Claim::AntiAging,
            Claim::LongLasting,
        ] {
            prop_assert_eq!(base.contains(claim), extended.contains(claim));
        }
        prop_assert!(extended.contains(Claim::Brightening));
    }

    #[test]
    fn indicators_depend_only_on_keyword_presence(text in "[a-z ]{0,120}") {
        let signals = extract_claims(Some(&text));
        let expected = ["natural", "organic", "herbal"]
            .iter()
            .any(|kw| text.contains(kw));
        prop_assert_eq!(signals.contains(Claim::NaturalIngredients), expected);
    }
}

#[test]
fn all_five_claims_can_fire_together() {
    let text = "natural, hydrating, anti aging, long lasting, brightening";
    let signals = extract_claims(Some(text));
    for claim in Claim::ALL {
        assert!(signals.contains(claim), "{claim} should be set");
    }
}
