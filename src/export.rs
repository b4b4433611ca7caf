//! Aggregate table export.
//!
//! Writes the two aggregate tables as delimited files (or JSON) for offline
//! inspection. This is a convenience export; nothing downstream depends on
//! the files.

use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::metrics::PipelineMetrics;
use crate::models::{CategoryAggregate, ClaimAggregate, OutputFormat};
use crate::pipeline::PipelineResult;

/// Write both aggregate tables into `output_dir`.
///
/// File names follow the source system: `processed_categories.*` and
/// `processed_claims.*`.
pub fn export_tables(
    result: &PipelineResult,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    create_dir_all(output_dir)?;
    let metrics = PipelineMetrics::default();

    let categories_path =
        output_dir.join(format!("processed_categories.{}", format.extension()));
    let claims_path = output_dir.join(format!("processed_claims.{}", format.extension()));

    match format {
        OutputFormat::Csv => {
            write_category_csv(&result.categories, &categories_path)?;
            write_claim_csv(&result.claims, &claims_path)?;
        }
        OutputFormat::Json => {
            write_json(&result.categories, &categories_path)?;
            write_json(&result.claims, &claims_path)?;
        }
    }

    metrics.record_export("categories", result.categories.len());
    metrics.record_export("claims", result.claims.len());

    Ok(vec![categories_path, claims_path])
}

/// Header: Year, Category, Sales_Volume, Avg_Rating, YoY_Growth
fn write_category_csv(rows: &[CategoryAggregate], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(BufWriter::new(file));
    if rows.is_empty() {
        // Keep the header even for an empty table.
        writer.write_record(["Year", "Category", "Sales_Volume", "Avg_Rating", "YoY_Growth"])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Header: Year, Claim, Mention_Count, Avg_Claim_Rating, YoY_Growth
fn write_claim_csv(rows: &[ClaimAggregate], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(BufWriter::new(file));
    if rows.is_empty() {
        writer.write_record([
            "Year",
            "Claim",
            "Mention_Count",
            "Avg_Claim_Rating",
            "YoY_Growth",
        ])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: serde::Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}
