//! Metrics collection for pipeline phases.
//!
//! Emits through the `metrics` facade; the embedding process decides whether
//! to install a recorder. Without one, every call is a no-op.

use metrics::{counter, gauge, histogram};

/// Metric names and recording helpers for one pipeline run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineMetrics;

impl PipelineMetrics {
    /// Record dataset load results.
    pub fn record_rows_loaded(&self, rows: usize, skipped: usize) {
        counter!("review_trends_rows_loaded_total").increment(rows as u64);
        counter!("review_trends_rows_skipped_total").increment(skipped as u64);
    }

    /// Record classifier training duration and whether a model was produced.
    pub fn record_training(&self, duration_ms: u128, trained: bool) {
        histogram!("review_trends_training_duration_ms").record(duration_ms as f64);
        let outcome = if trained { "trained" } else { "skipped" };
        counter!("review_trends_training_runs_total", "outcome" => outcome).increment(1);
    }

    /// Record aggregate table sizes and dropped rows.
    pub fn record_aggregation(&self, category_rows: usize, claim_rows: usize, dropped: usize) {
        gauge!("review_trends_category_aggregate_rows").set(category_rows as f64);
        gauge!("review_trends_claim_aggregate_rows").set(claim_rows as f64);
        counter!("review_trends_rows_dropped_total").increment(dropped as u64);
    }

    /// Record an exported table.
    pub fn record_export(&self, table: &'static str, rows: usize) {
        counter!("review_trends_rows_exported_total", "table" => table).increment(rows as u64);
    }
}
