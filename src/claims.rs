//! Claim signal extraction from review text.
//!
//! Each claim is an independent binary indicator backed by a small keyword
//! family. Matching is substring-based, not tokenized: "anti ag" matches
//! "anti aging" and "anti agitation" alike. That is a deliberate
//! simplification carried over from the source heuristics, not a bug.

use crate::models::Claim;

const CLAIM_KEYWORDS: [(Claim, &[&str]); 5] = [
    (Claim::NaturalIngredients, &["natural", "organic", "herbal"]),
    (Claim::Hydrating, &["hydrat", "moistur", "plump"]),
    (Claim::AntiAging, &["anti ag", "wrinkle", "firm"]),
    (Claim::LongLasting, &["long last", "all day", "smudge proof"]),
    (Claim::Brightening, &["brighten", "glow", "even tone"]),
];

/// Binary claim indicators for one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClaimSignals {
    flags: [bool; Claim::ALL.len()],
}

impl ClaimSignals {
    #[must_use]
    pub const fn contains(&self, claim: Claim) -> bool {
        self.flags[claim as usize]
    }

    /// Claims triggered by the review, in fixed declaration order.
    pub fn triggered(&self) -> impl Iterator<Item = Claim> + '_ {
        Claim::ALL.iter().copied().filter(|c| self.contains(*c))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|f| *f)
    }
}

/// Extract claim indicators from review text.
///
/// Absent or empty text is a neutral result (all indicators zero), not an
/// error. Indicators are independent: each claim depends only on its own
/// keyword family.
#[must_use]
pub fn extract_claims(text: Option<&str>) -> ClaimSignals {
    let Some(text) = text else {
        return ClaimSignals::default();
    };
    if text.trim().is_empty() {
        return ClaimSignals::default();
    }

    let lower = text.to_lowercase();
    let mut flags = [false; Claim::ALL.len()];
    for (claim, keywords) in &CLAIM_KEYWORDS {
        flags[*claim as usize] = keywords.iter().any(|kw| lower.contains(kw));
    }
    ClaimSignals { flags }
}
