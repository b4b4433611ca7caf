//! Yearly aggregation of labeled reviews.
//!
//! Groups labeled rows by (Year, Category) and claim mentions by
//! (Year, Claim), computing volume, mean rating, and year-over-year growth.
//! Growth compares against the prior *present* year in the group's series
//! (matching the source system's per-group percent change), and normalizes
//! undefined results to 0. Rows whose date fails to parse are excluded from
//! aggregation and surfaced only as a count.

use chrono::{Datelike, DateTime, Local, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::claims::extract_claims;
use crate::models::{CategoryAggregate, ClaimAggregate, LabeledReview};

/// The two aggregate tables plus the number of rows dropped for
/// unparseable dates.
#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    pub categories: Vec<CategoryAggregate>,
    pub claims: Vec<ClaimAggregate>,
    pub dropped_rows: usize,
}

/// Aggregate labeled reviews into both tables.
///
/// `has_date_column` distinguishes "date column exists but this cell failed
/// to parse" (row dropped) from "no date column at all" (every row falls
/// back to the current processing year).
#[must_use]
pub fn aggregate(rows: &[LabeledReview], has_date_column: bool) -> AggregateReport {
    let fallback_year = Local::now().year();
    if !has_date_column {
        info!(
            year = fallback_year,
            "No date column resolved; assigning the current year to every row"
        );
    }

    // (count, rating sum) keyed by (year, label)
    let mut category_groups: BTreeMap<(i32, String), (u64, f64)> = BTreeMap::new();
    let mut claim_groups: BTreeMap<(i32, String), (u64, f64)> = BTreeMap::new();
    let mut dropped_rows = 0;

    for row in rows {
        let year = if has_date_column {
            match row.review.review_date.as_deref().and_then(parse_year) {
                Some(year) => year,
                None => {
                    dropped_rows += 1;
                    continue;
                }
            }
        } else {
            fallback_year
        };

        let entry = category_groups
            .entry((year, row.category.clone()))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += row.review.rating;

        let signals = extract_claims(row.review.review_text.as_deref());
        for claim in signals.triggered() {
            let entry = claim_groups
                .entry((year, claim.as_str().to_string()))
                .or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += row.review.rating;
        }
    }

    if dropped_rows > 0 {
        debug!(dropped_rows, "Excluded rows with unparseable dates");
    }

    let categories = category_groups
        .iter()
        .map(|(&(year, ref label), &(count, rating_sum))| CategoryAggregate {
            year,
            category: label.clone(),
            sales_volume: count,
            avg_rating: rating_sum / count as f64,
            yoy_growth: 0.0,
        })
        .collect::<Vec<_>>();
    let categories = with_category_growth(categories);

    let claims = claim_groups
        .iter()
        .map(|(&(year, ref label), &(count, rating_sum))| ClaimAggregate {
            year,
            claim: label.clone(),
            mention_count: count,
            avg_claim_rating: rating_sum / count as f64,
            yoy_growth: 0.0,
        })
        .collect::<Vec<_>>();
    let claims = with_claim_growth(claims);

    AggregateReport {
        categories,
        claims,
        dropped_rows,
    }
}

/// Parse a year out of a raw date cell, trying the formats the source
/// datasets actually use.
#[must_use]
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.year());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.year());
        }
    }
    for format in ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y", "%d %b %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.year());
        }
    }
    None
}

/// Percent change against the previous value; undefined results become 0.
fn pct_change(previous: Option<u64>, current: u64) -> f64 {
    match previous {
        Some(prev) if prev > 0 => {
            let growth = (current as f64 - prev as f64) / prev as f64 * 100.0;
            if growth.is_finite() {
                growth
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn with_category_growth(mut rows: Vec<CategoryAggregate>) -> Vec<CategoryAggregate> {
    // Rows arrive sorted by (year, label) from the BTreeMap; growth walks
    // each label's year series in order.
    let mut previous: BTreeMap<String, u64> = BTreeMap::new();
    rows.sort_by(|a, b| (a.year, &a.category).cmp(&(b.year, &b.category)));
    for row in &mut rows {
        row.yoy_growth = pct_change(previous.get(&row.category).copied(), row.sales_volume);
        previous.insert(row.category.clone(), row.sales_volume);
    }
    rows
}

fn with_claim_growth(mut rows: Vec<ClaimAggregate>) -> Vec<ClaimAggregate> {
    let mut previous: BTreeMap<String, u64> = BTreeMap::new();
    rows.sort_by(|a, b| (a.year, &a.claim).cmp(&(b.year, &b.claim)));
    for row in &mut rows {
        row.yoy_growth = pct_change(previous.get(&row.claim).copied(), row.mention_count);
        previous.insert(row.claim.clone(), row.mention_count);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RawReview};

    fn labeled(
        product: &str,
        rating: f64,
        text: Option<&str>,
        date: Option<&str>,
        category: Category,
    ) -> LabeledReview {
        LabeledReview {
            review: RawReview {
                product_name: product.to_string(),
                rating,
                review_text: text.map(ToString::to_string),
                review_date: date.map(ToString::to_string),
                brand: None,
                tags: None,
            },
            category_heuristic: category,
            category: category.as_str().to_string(),
        }
    }

    fn find<'a>(rows: &'a [CategoryAggregate], year: i32, label: &str) -> &'a CategoryAggregate {
        rows.iter()
            .find(|r| r.year == year && r.category == label)
            .unwrap_or_else(|| panic!("missing aggregate row ({year}, {label})"))
    }

    #[test]
    fn yoy_growth_matches_percent_change() {
        // Skincare: 2 reviews in 2020, 3 in 2021 -> +50%
        let mut rows = Vec::new();
        for _ in 0..2 {
            rows.push(labeled("Serum", 5.0, None, Some("2020-03-01"), Category::Skincare));
        }
        for _ in 0..3 {
            rows.push(labeled("Serum", 4.0, None, Some("2021-03-01"), Category::Skincare));
        }

        let report = aggregate(&rows, true);
        assert_eq!(find(&report.categories, 2020, "Skincare").yoy_growth, 0.0);
        let growth = find(&report.categories, 2021, "Skincare").yoy_growth;
        assert!((growth - 50.0).abs() < 1e-9);
    }

    #[test]
    fn growth_baseline_is_the_prior_present_year() {
        // 2019 and 2022 only; 2022 compares against 2019.
        let rows = vec![
            labeled("Serum", 5.0, None, Some("2019-01-01"), Category::Skincare),
            labeled("Serum", 5.0, None, Some("2022-01-01"), Category::Skincare),
            labeled("Serum", 5.0, None, Some("2022-02-01"), Category::Skincare),
        ];
        let report = aggregate(&rows, true);
        let growth = find(&report.categories, 2022, "Skincare").yoy_growth;
        assert!((growth - 100.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_category_three_reviews() {
        let rows = vec![
            labeled(
                "Hydrating Face Serum",
                5.0,
                Some("very hydrating, feels natural"),
                Some("2020-01-01"),
                Category::Skincare,
            ),
            labeled(
                "Matte Lipstick",
                3.0,
                Some("long lasting color"),
                Some("2020-06-01"),
                Category::Makeup,
            ),
            labeled(
                "Hydrating Face Serum",
                4.0,
                Some("good"),
                Some("2021-01-01"),
                Category::Skincare,
            ),
        ];

        let report = aggregate(&rows, true);
        assert_eq!(report.dropped_rows, 0);

        let skincare_2020 = find(&report.categories, 2020, "Skincare");
        assert_eq!(skincare_2020.sales_volume, 1);
        assert!((skincare_2020.avg_rating - 5.0).abs() < 1e-9);
        assert_eq!(skincare_2020.yoy_growth, 0.0);

        let makeup_2020 = find(&report.categories, 2020, "Makeup");
        assert_eq!(makeup_2020.sales_volume, 1);
        assert!((makeup_2020.avg_rating - 3.0).abs() < 1e-9);

        let skincare_2021 = find(&report.categories, 2021, "Skincare");
        assert_eq!(skincare_2021.sales_volume, 1);
        assert!((skincare_2021.avg_rating - 4.0).abs() < 1e-9);
        // Prior year volume was also 1, so growth is 0.
        assert_eq!(skincare_2021.yoy_growth, 0.0);

        let claim = |year: i32, label: &str| {
            report
                .claims
                .iter()
                .find(|r| r.year == year && r.claim == label)
                .unwrap_or_else(|| panic!("missing claim row ({year}, {label})"))
        };
        let hydrating = claim(2020, "Hydrating");
        assert_eq!(hydrating.mention_count, 1);
        assert!((hydrating.avg_claim_rating - 5.0).abs() < 1e-9);

        let natural = claim(2020, "Natural Ingredients");
        assert_eq!(natural.mention_count, 1);
        assert!((natural.avg_claim_rating - 5.0).abs() < 1e-9);

        let long_lasting = claim(2020, "Long-Lasting");
        assert_eq!(long_lasting.mention_count, 1);
        assert!((long_lasting.avg_claim_rating - 3.0).abs() < 1e-9);
    }

    #[test]
    fn unparseable_dates_drop_rows_and_are_counted() {
        let rows = vec![
            labeled("Serum", 5.0, None, Some("2020-01-01"), Category::Skincare),
            labeled("Serum", 1.0, None, Some("not a date"), Category::Skincare),
            labeled("Serum", 1.0, None, None, Category::Skincare),
        ];
        let report = aggregate(&rows, true);
        assert_eq!(report.dropped_rows, 2);
        let row = find(&report.categories, 2020, "Skincare");
        assert_eq!(row.sales_volume, 1);
        assert!((row.avg_rating - 5.0).abs() < 1e-9);
    }

    #[test]
    fn missing_date_column_assigns_current_year() {
        let rows = vec![labeled("Serum", 5.0, None, None, Category::Skincare)];
        let report = aggregate(&rows, false);
        assert_eq!(report.dropped_rows, 0);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].year, Local::now().year());
    }

    #[test]
    fn aggregate_keys_are_unique() {
        let rows = vec![
            labeled("Serum", 5.0, None, Some("2020-01-01"), Category::Skincare),
            labeled("Serum", 3.0, None, Some("2020-05-01"), Category::Skincare),
        ];
        let report = aggregate(&rows, true);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].sales_volume, 2);
        assert!((report.categories[0].avg_rating - 4.0).abs() < 1e-9);
    }

    #[test]
    fn parse_year_accepts_common_formats() {
        assert_eq!(parse_year("2020-01-31"), Some(2020));
        assert_eq!(parse_year("2020-01-31 10:30:00"), Some(2020));
        assert_eq!(parse_year("2021-07-01T09:00:00+00:00"), Some(2021));
        assert_eq!(parse_year("31-01-2019"), Some(2019));
        assert_eq!(parse_year("01/31/2022"), Some(2022));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("soon"), None);
    }
}
