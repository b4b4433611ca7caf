//! Column discovery for raw review datasets.
//!
//! Source datasets arrive with unknown column names. This module resolves
//! each semantic role (product name, rating, review text, date, brand, tags)
//! against the header row using an ordered rule table: exact known names
//! first, then substring keyword groups. Product and rating are mandatory;
//! every other role degrades to absent.

use crate::error::{PipelineError, Result};
use tracing::{info, warn};

/// Semantic roles a source column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    ProductName,
    Rating,
    ReviewText,
    ReviewDate,
    Brand,
    Tags,
}

impl ColumnRole {
    const fn name(self) -> &'static str {
        match self {
            Self::ProductName => "product name",
            Self::Rating => "rating",
            Self::ReviewText => "review text",
            Self::ReviewDate => "review date",
            Self::Brand => "brand",
            Self::Tags => "tags",
        }
    }
}

/// One resolution rule: exact candidates tried in order, then substring
/// keyword groups tried in order (a group matches when every keyword in it
/// is contained in the lowercased header).
struct ColumnRule {
    role: ColumnRole,
    required: bool,
    exact: &'static [&'static str],
    substrings: &'static [&'static [&'static str]],
}

/// Rules in resolution order. The trailing bare-`product` group is a weak
/// fallback that may pick an ID column, so it is logged as a warning.
const RULES: [ColumnRule; 6] = [
    ColumnRule {
        role: ColumnRole::ProductName,
        required: true,
        exact: &["product_title", "product_name"],
        substrings: &[&["product", "title"], &["product", "name"], &["product"]],
    },
    ColumnRule {
        role: ColumnRole::Rating,
        required: true,
        exact: &["review_rating", "rating"],
        substrings: &[&["rating"]],
    },
    ColumnRule {
        role: ColumnRole::ReviewText,
        required: false,
        exact: &["review_text"],
        substrings: &[&["review", "text"], &["review_title"]],
    },
    ColumnRule {
        role: ColumnRole::ReviewDate,
        required: false,
        exact: &["review_date"],
        substrings: &[&["date"]],
    },
    ColumnRule {
        role: ColumnRole::Brand,
        required: false,
        exact: &["brand_name"],
        substrings: &[&["brand"]],
    },
    ColumnRule {
        role: ColumnRole::Tags,
        required: false,
        exact: &["product_tags"],
        substrings: &[],
    },
];

/// Resolved mapping from semantic roles to column indices in the header row.
#[derive(Debug, Clone)]
pub struct SchemaMap {
    pub product: usize,
    pub rating: usize,
    pub review_text: Option<usize>,
    pub review_date: Option<usize>,
    pub brand: Option<usize>,
    pub tags: Option<usize>,
    /// Header names kept for reporting
    headers: Vec<String>,
}

impl SchemaMap {
    /// Resolve semantic columns against a header row.
    ///
    /// Fails with a `Schema` error when no product or rating column can be
    /// found; the optional roles resolve to `None` instead of failing.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let mut product = None;
        let mut rating = None;
        let mut review_text = None;
        let mut review_date = None;
        let mut brand = None;
        let mut tags = None;

        for rule in &RULES {
            let found = resolve_rule(rule, &lowered);
            match found {
                Some(idx) => {
                    info!(
                        role = rule.role.name(),
                        column = headers[idx].as_str(),
                        "Resolved column"
                    );
                }
                None if rule.required => {
                    return Err(PipelineError::Schema(format!(
                        "no {} column found in {headers:?}",
                        rule.role.name()
                    )));
                }
                None => {
                    info!(role = rule.role.name(), "No column resolved for role");
                }
            }
            match rule.role {
                ColumnRole::ProductName => product = found,
                ColumnRole::Rating => rating = found,
                ColumnRole::ReviewText => review_text = found,
                ColumnRole::ReviewDate => review_date = found,
                ColumnRole::Brand => brand = found,
                ColumnRole::Tags => tags = found,
            }
        }

        let (Some(product), Some(rating)) = (product, rating) else {
            // Unreachable: required rules error out above.
            return Err(PipelineError::Schema("required column missing".to_string()));
        };

        Ok(Self {
            product,
            rating,
            review_text,
            review_date,
            brand,
            tags,
            headers: headers.to_vec(),
        })
    }

    /// Human-readable summary of the resolution choices.
    #[must_use]
    pub fn report(&self) -> String {
        let name = |idx: Option<usize>| {
            idx.map_or_else(|| "<absent>".to_string(), |i| self.headers[i].clone())
        };
        format!(
            "product: {}, rating: {}, review_text: {}, date: {}, brand: {}, tags: {}",
            self.headers[self.product],
            self.headers[self.rating],
            name(self.review_text),
            name(self.review_date),
            name(self.brand),
            name(self.tags),
        )
    }
}

fn resolve_rule(rule: &ColumnRule, lowered: &[String]) -> Option<usize> {
    for candidate in rule.exact {
        if let Some(idx) = lowered.iter().position(|h| h == candidate) {
            return Some(idx);
        }
    }
    for group in rule.substrings {
        let found = lowered
            .iter()
            .position(|h| group.iter().all(|kw| h.contains(kw)));
        if let Some(idx) = found {
            // The bare-keyword product fallback can land on an ID column.
            if rule.role == ColumnRole::ProductName && group.len() == 1 {
                warn!(
                    column = lowered[idx].as_str(),
                    "Using fallback product column (may be an ID, not a name)"
                );
            }
            return Some(idx);
        }
    }
    None
}
