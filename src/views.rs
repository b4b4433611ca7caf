//! Pure per-request views over the aggregate tables.
//!
//! Interactive consumers re-filter on every parameter change, so these are
//! cheap, allocation-only functions with no side effects.

use crate::models::{CategoryAggregate, ClaimAggregate};

/// Category rows for one year, restricted to a category set and a minimum
/// average rating.
#[must_use]
pub fn filter_categories(
    rows: &[CategoryAggregate],
    year: i32,
    categories: &[String],
    min_rating: f64,
) -> Vec<CategoryAggregate> {
    rows.iter()
        .filter(|r| r.year == year)
        .filter(|r| categories.contains(&r.category))
        .filter(|r| r.avg_rating >= min_rating)
        .cloned()
        .collect()
}

/// Claim rows for one year.
#[must_use]
pub fn filter_claims(rows: &[ClaimAggregate], year: i32) -> Vec<ClaimAggregate> {
    rows.iter().filter(|r| r.year == year).cloned().collect()
}

/// Distinct years present in the category table, ascending.
#[must_use]
pub fn distinct_years(rows: &[CategoryAggregate]) -> Vec<i32> {
    let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Distinct category labels, in first-seen order.
#[must_use]
pub fn distinct_categories(rows: &[CategoryAggregate]) -> Vec<String> {
    let mut seen = Vec::new();
    for row in rows {
        if !seen.contains(&row.category) {
            seen.push(row.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, category: &str, volume: u64, rating: f64) -> CategoryAggregate {
        CategoryAggregate {
            year,
            category: category.to_string(),
            sales_volume: volume,
            avg_rating: rating,
            yoy_growth: 0.0,
        }
    }

    fn table() -> Vec<CategoryAggregate> {
        vec![
            row(2020, "Skincare", 10, 4.5),
            row(2020, "Makeup", 5, 3.2),
            row(2021, "Skincare", 12, 4.6),
        ]
    }

    #[test]
    fn filters_by_year_category_and_rating() {
        let rows = table();
        let cats = vec!["Skincare".to_string(), "Makeup".to_string()];

        let filtered = filter_categories(&rows, 2020, &cats, 4.0);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, "Skincare");

        let filtered = filter_categories(&rows, 2020, &cats, 1.0);
        assert_eq!(filtered.len(), 2);

        let filtered = filter_categories(&rows, 2020, &["Makeup".to_string()], 1.0);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn distinct_helpers_populate_filter_widgets() {
        let rows = table();
        assert_eq!(distinct_years(&rows), vec![2020, 2021]);
        assert_eq!(
            distinct_categories(&rows),
            vec!["Skincare".to_string(), "Makeup".to_string()]
        );
    }

    #[test]
    fn views_do_not_mutate_inputs() {
        let rows = table();
        let before = rows.clone();
        let _ = filter_categories(&rows, 2021, &["Skincare".to_string()], 0.0);
        assert_eq!(rows, before);
    }
}
