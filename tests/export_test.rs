//! Tests for aggregate table export.

use review_trends::export::export_tables;
use review_trends::models::{CategoryAggregate, ClaimAggregate, OutputFormat};
use review_trends::pipeline::PipelineResult;

fn sample_result() -> PipelineResult {
    PipelineResult {
        categories: vec![
            CategoryAggregate {
                year: 2020,
                category: "Skincare".to_string(),
                sales_volume: 10,
                avg_rating: 4.5,
                yoy_growth: 0.0,
            },
            CategoryAggregate {
                year: 2021,
                category: "Skincare".to_string(),
                sales_volume: 15,
                avg_rating: 4.2,
                yoy_growth: 50.0,
            },
        ],
        claims: vec![ClaimAggregate {
            year: 2020,
            claim: "Hydrating".to_string(),
            mention_count: 7,
            avg_claim_rating: 4.8,
            yoy_growth: 0.0,
        }],
        dropped_rows: 0,
        skipped_rows: 0,
        classifier: None,
        schema_report: String::new(),
    }
}

#[test]
fn csv_export_writes_both_tables_with_expected_headers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let files =
        export_tables(&sample_result(), dir.path(), OutputFormat::Csv).expect("export");
    assert_eq!(files.len(), 2);

    let categories =
        std::fs::read_to_string(dir.path().join("processed_categories.csv")).expect("read");
    let mut lines = categories.lines();
    assert_eq!(
        lines.next(),
        Some("Year,Category,Sales_Volume,Avg_Rating,YoY_Growth")
    );
    assert_eq!(lines.next(), Some("2020,Skincare,10,4.5,0.0"));
    assert_eq!(lines.next(), Some("2021,Skincare,15,4.2,50.0"));

    let claims = std::fs::read_to_string(dir.path().join("processed_claims.csv")).expect("read");
    assert!(claims.starts_with("Year,Claim,Mention_Count,Avg_Claim_Rating,YoY_Growth"));
    assert!(claims.contains("2020,Hydrating,7,4.8,0.0"));
}

#[test]
fn json_export_round_trips() {
    let dir = tempfile::tempdir().expect("temp dir");
    export_tables(&sample_result(), dir.path(), OutputFormat::Json).expect("export");

    let raw =
        std::fs::read_to_string(dir.path().join("processed_categories.json")).expect("read");
    let rows: Vec<CategoryAggregate> = serde_json::from_str(&raw).expect("parse");
    assert_eq!(rows, sample_result().categories);
}

#[test]
fn empty_tables_still_produce_headers() {
    let empty = PipelineResult {
        categories: Vec::new(),
        claims: Vec::new(),
        dropped_rows: 0,
        skipped_rows: 0,
        classifier: None,
        schema_report: String::new(),
    };

    let dir = tempfile::tempdir().expect("temp dir");
    export_tables(&empty, dir.path(), OutputFormat::Csv).expect("export");

    let categories =
        std::fs::read_to_string(dir.path().join("processed_categories.csv")).expect("read");
    assert_eq!(
        categories.trim(),
        "Year,Category,Sales_Volume,Avg_Rating,YoY_Growth"
    );
    let claims = std::fs::read_to_string(dir.path().join("processed_claims.csv")).expect("read");
    assert_eq!(
        claims.trim(),
        "Year,Claim,Mention_Count,Avg_Claim_Rating,YoY_Growth"
    );
}
