//! Dataset loading: source resolution and CSV materialization.
//!
//! The source is a local delimited file with unknown column names. Headers go
//! through the schema resolver; each record is materialized into a
//! `RawReview`. Rows whose rating cell is not numeric are skipped with a
//! count, mirroring the source system's numeric coercion.

use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::models::RawReview;
use crate::schema::SchemaMap;
use crate::validation::InputValidator;

/// A loaded dataset: resolved schema plus materialized rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub schema: SchemaMap,
    pub rows: Vec<RawReview>,
    /// Rows skipped because the rating cell failed to parse
    pub skipped_rows: usize,
}

/// Resolve the dataset path, failing when no local file exists.
///
/// An external fetch collaborator could slot in here; without one, a missing
/// file is a `SourceUnavailable` error.
pub fn resolve_source(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    if path.is_file() {
        Ok(path)
    } else {
        Err(PipelineError::SourceUnavailable(format!(
            "no local dataset at {}; download the reviews CSV and point dataset.path at it",
            path.display()
        )))
    }
}

/// Load and materialize a reviews CSV.
///
/// Ratings outside the configured scale are kept (the aggregator averages
/// whatever the source reports) but logged, since they usually mean the
/// scale guess is wrong.
pub fn load_dataset(path: &Path, rating_scale_max: f64) -> Result<Dataset> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();
    info!(columns = ?headers, "Loaded dataset header");

    let schema = SchemaMap::resolve(&headers)?;
    info!(schema = schema.report(), "Resolved dataset schema");

    let mut rows = Vec::new();
    let mut skipped_rows = 0;
    for (line, record) in reader.records().enumerate() {
        let record = record?;

        let rating_cell = record.get(schema.rating).unwrap_or("").trim();
        let Ok(rating) = rating_cell.parse::<f64>() else {
            skipped_rows += 1;
            debug!(line = line + 2, cell = rating_cell, "Skipping row with non-numeric rating");
            continue;
        };
        if InputValidator::validate_rating(rating, rating_scale_max).is_err() {
            warn!(line = line + 2, rating, "Rating outside the expected scale");
        }

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        rows.push(RawReview {
            product_name: record.get(schema.product).unwrap_or("").trim().to_string(),
            rating,
            review_text: cell(schema.review_text),
            review_date: cell(schema.review_date),
            brand: cell(schema.brand),
            tags: cell(schema.tags),
        });
    }

    if skipped_rows > 0 {
        warn!(skipped_rows, "Skipped rows with non-numeric ratings");
    }
    info!(rows = rows.len(), "Loaded reviews");

    Ok(Dataset {
        schema,
        rows,
        skipped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn loads_rows_through_the_resolved_schema() {
        let file = write_csv(
            "product_title,review_rating,review_text,review_date,brand_name,product_tags\n\
             Hydrating Face Serum,5,very hydrating,2020-01-01,GlowCo,skin serum\n\
             Matte Lipstick,3,long lasting color,2020-06-01,TintWorks,\n",
        );
        let dataset = load_dataset(file.path(), 5.0).expect("load");
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.skipped_rows, 0);

        let first = &dataset.rows[0];
        assert_eq!(first.product_name, "Hydrating Face Serum");
        assert!((first.rating - 5.0).abs() < 1e-9);
        assert_eq!(first.review_text.as_deref(), Some("very hydrating"));
        assert_eq!(first.tags.as_deref(), Some("skin serum"));

        // Empty cells become absent, not empty strings.
        assert!(dataset.rows[1].tags.is_none());
    }

    #[test]
    fn non_numeric_ratings_skip_the_row() {
        let file = write_csv(
            "product_name,rating\n\
             Serum,5\n\
             Cleanser,not-a-number\n",
        );
        let dataset = load_dataset(file.path(), 5.0).expect("load");
        assert_eq!(dataset.rows.len(), 1);
        assert_eq!(dataset.skipped_rows, 1);
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let file = write_csv("title,stars\nSerum,5\n");
        let err = load_dataset(file.path(), 5.0).expect_err("should fail");
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn missing_source_file_is_source_unavailable() {
        let err = resolve_source("/nonexistent/reviews.csv").expect_err("should fail");
        assert!(matches!(err, PipelineError::SourceUnavailable(_)));
    }
}
