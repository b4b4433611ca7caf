//! Data models for review processing and aggregation
//!
//! This module contains all data structures used throughout the pipeline,
//! including raw review records, category and claim labels, and the
//! aggregate rows consumed by the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category assigned to a review.
///
/// The closed label set of the heuristic labeler. The trained classifier
/// only ever emits labels it saw during training, so in practice its output
/// is the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Skincare,
    Haircare,
    Makeup,
    Fragrance,
    Bodycare,
    Other,
}

impl Category {
    /// All categories in labeler precedence order (`Other` is the fallback
    /// and never matched by keyword).
    pub const ALL: [Category; 6] = [
        Category::Skincare,
        Category::Haircare,
        Category::Makeup,
        Category::Fragrance,
        Category::Bodycare,
        Category::Other,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skincare => "Skincare",
            Self::Haircare => "Haircare",
            Self::Makeup => "Makeup",
            Self::Fragrance => "Fragrance",
            Self::Bodycare => "Bodycare",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim signal extracted from review text.
///
/// Claims are independent binary indicators, not mutually exclusive: one
/// review can trigger several claims or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Claim {
    NaturalIngredients,
    Hydrating,
    AntiAging,
    LongLasting,
    Brightening,
}

impl Claim {
    pub const ALL: [Claim; 5] = [
        Claim::NaturalIngredients,
        Claim::Hydrating,
        Claim::AntiAging,
        Claim::LongLasting,
        Claim::Brightening,
    ];

    /// Display name used in the claim aggregate table.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NaturalIngredients => "Natural Ingredients",
            Self::Hydrating => "Hydrating",
            Self::AntiAging => "Anti-Aging",
            Self::LongLasting => "Long-Lasting",
            Self::Brightening => "Brightening",
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One review record after schema resolution, with semantic fields in place
/// of the source's arbitrary column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReview {
    /// Product name or title
    pub product_name: String,
    /// Numeric rating, bounded by the source's rating scale
    pub rating: f64,
    /// Free-text review body (optional in the source)
    pub review_text: Option<String>,
    /// Raw date cell, parsed later by the aggregator
    pub review_date: Option<String>,
    /// Brand name (optional)
    pub brand: Option<String>,
    /// Tag string used by the heuristic labeler (optional)
    pub tags: Option<String>,
}

/// A review after labeling: final category plus the heuristic label it was
/// derived from.
#[derive(Debug, Clone)]
pub struct LabeledReview {
    pub review: RawReview,
    /// Category produced by keyword rules, used as the training signal
    pub category_heuristic: Category,
    /// Final category label. Equals the classifier prediction when a model
    /// was trained, otherwise the heuristic label.
    pub category: String,
}

/// Aggregate row keyed by (Year, Category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Category")]
    pub category: String,
    /// Review count, used as a sales-volume proxy
    #[serde(rename = "Sales_Volume")]
    pub sales_volume: u64,
    #[serde(rename = "Avg_Rating")]
    pub avg_rating: f64,
    /// Percent change in volume from the prior present year; 0 when there
    /// is no prior year
    #[serde(rename = "YoY_Growth")]
    pub yoy_growth: f64,
}

/// Aggregate row keyed by (Year, Claim).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAggregate {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Claim")]
    pub claim: String,
    #[serde(rename = "Mention_Count")]
    pub mention_count: u64,
    /// Mean rating of the reviews mentioning the claim
    #[serde(rename = "Avg_Claim_Rating")]
    pub avg_claim_rating: f64,
    #[serde(rename = "YoY_Growth")]
    pub yoy_growth: f64,
}

/// Output format for exported aggregate tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
