//! Pipeline orchestration and memoization.
//!
//! The pipeline is a single-shot, single-threaded batch transform:
//! load -> label -> train/classify -> extract claims -> aggregate. The
//! service memoizes one result per dataset fingerprint for the process
//! lifetime so concurrent callers share it, and keeps a persistent layer for
//! the aggregate tables across runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::aggregate::{aggregate, AggregateReport};
use crate::cache::AggregateCache;
use crate::classifier::CategoryModel;
use crate::config::AppConfig;
use crate::dataset::{load_dataset, resolve_source, Dataset};
use crate::error::{PipelineError, Result};
use crate::labeler::heuristic_label;
use crate::logging::OperationTimer;
use crate::metrics::PipelineMetrics;
use crate::models::{CategoryAggregate, ClaimAggregate, LabeledReview};

/// Everything the pipeline hands to downstream consumers.
#[derive(Debug)]
pub struct PipelineResult {
    pub categories: Vec<CategoryAggregate>,
    pub claims: Vec<ClaimAggregate>,
    /// Rows excluded from aggregation for unparseable dates
    pub dropped_rows: usize,
    /// Rows skipped at load time for non-numeric ratings
    pub skipped_rows: usize,
    /// Absent when heuristic labels had insufficient diversity
    pub classifier: Option<CategoryModel>,
    /// Resolved column mapping, for reporting
    pub schema_report: String,
}

/// Run the pipeline once, end to end, with no caching.
pub fn run_once(config: &AppConfig) -> Result<PipelineResult> {
    let path = resolve_source(&config.get_dataset_path())?;
    run_on_dataset(config, load_dataset(&path, config.dataset.rating_scale_max)?, None)
}

fn run_on_dataset(
    config: &AppConfig,
    dataset: Dataset,
    cached_report: Option<AggregateReport>,
) -> Result<PipelineResult> {
    let metrics = PipelineMetrics::default();
    let Dataset {
        schema,
        rows,
        skipped_rows,
    } = dataset;
    metrics.record_rows_loaded(rows.len(), skipped_rows);

    // Train the classifier on heuristic labels, then let it replace every
    // row's final category. When training is skipped the heuristic stands.
    let timer = OperationTimer::new("classifier_training");
    let classifier = CategoryModel::train(&rows, &config.classifier)?;
    metrics.record_training(timer.finish(), classifier.is_some());

    let heuristic: Vec<_> = rows
        .iter()
        .map(|r| heuristic_label(&r.product_name, r.brand.as_deref(), r.tags.as_deref()))
        .collect();

    let final_labels: Vec<String> = match &classifier {
        Some(model) => {
            let names: Vec<String> = rows.iter().map(|r| r.product_name.clone()).collect();
            model.predict_many(&names)?
        }
        None => heuristic.iter().map(|c| c.as_str().to_string()).collect(),
    };

    let labeled: Vec<LabeledReview> = rows
        .into_iter()
        .zip(heuristic)
        .zip(final_labels)
        .map(|((review, category_heuristic), category)| LabeledReview {
            review,
            category_heuristic,
            category,
        })
        .collect();

    let report = match cached_report {
        Some(report) => {
            info!("Serving aggregate tables from the persistent cache");
            report
        }
        None => {
            let timer = OperationTimer::new("aggregation");
            let report = aggregate(&labeled, schema.review_date.is_some());
            timer.finish();
            report
        }
    };
    metrics.record_aggregation(
        report.categories.len(),
        report.claims.len(),
        report.dropped_rows,
    );

    if report.dropped_rows > 0 {
        warn!(
            dropped_rows = report.dropped_rows,
            "Rows excluded from aggregation for unparseable dates"
        );
    }

    Ok(PipelineResult {
        categories: report.categories,
        claims: report.claims,
        dropped_rows: report.dropped_rows,
        skipped_rows,
        classifier,
        schema_report: schema.report(),
    })
}

/// Process-lifetime pipeline front end.
///
/// Holds one computed result per dataset fingerprint behind a mutex;
/// concurrent callers either share the memoized result or serialize the
/// recomputation. There is no fine-grained invalidation beyond
/// `invalidate`/`clear_memo`.
pub struct PipelineService {
    config: AppConfig,
    results: Mutex<HashMap<u64, Arc<PipelineResult>>>,
    cache: Option<AggregateCache>,
}

impl PipelineService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let cache = if config.cache.enabled {
            Some(AggregateCache::open(std::path::Path::new(
                &config.cache.directory,
            ))?)
        } else {
            None
        };
        Ok(Self {
            config,
            results: Mutex::new(HashMap::new()),
            cache,
        })
    }

    /// Run the pipeline, reusing the memoized result when the dataset's
    /// fingerprint is unchanged.
    pub fn process(&self) -> Result<Arc<PipelineResult>> {
        let path = resolve_source(&self.config.get_dataset_path())?;
        let fingerprint = AggregateCache::fingerprint(&path)?;

        {
            let results = self
                .results
                .lock()
                .map_err(|_| PipelineError::Other("pipeline memo lock poisoned".to_string()))?;
            if let Some(result) = results.get(&fingerprint) {
                info!(fingerprint, "Reusing memoized pipeline result");
                return Ok(Arc::clone(result));
            }
        }

        // Aggregate tables may survive across runs in the persistent layer;
        // the classifier is always trained fresh.
        let cached_report = match &self.cache {
            Some(cache) => cache.get(fingerprint)?,
            None => None,
        };
        let had_cached_report = cached_report.is_some();

        let result = Arc::new(run_on_dataset(
            &self.config,
            load_dataset(&path, self.config.dataset.rating_scale_max)?,
            cached_report,
        )?);

        if let (Some(cache), false) = (&self.cache, had_cached_report) {
            cache.put(
                fingerprint,
                &AggregateReport {
                    categories: result.categories.clone(),
                    claims: result.claims.clone(),
                    dropped_rows: result.dropped_rows,
                },
            )?;
        }

        let mut results = self
            .results
            .lock()
            .map_err(|_| PipelineError::Other("pipeline memo lock poisoned".to_string()))?;
        Ok(Arc::clone(
            results.entry(fingerprint).or_insert(result),
        ))
    }

    /// Drop the memoized result for one dataset version.
    pub fn invalidate(&self, fingerprint: u64) -> Result<()> {
        let mut results = self
            .results
            .lock()
            .map_err(|_| PipelineError::Other("pipeline memo lock poisoned".to_string()))?;
        results.remove(&fingerprint);
        Ok(())
    }

    /// Wipe both the in-process memo and the persistent layer.
    pub fn clear(&self) -> Result<()> {
        {
            let mut results = self
                .results
                .lock()
                .map_err(|_| PipelineError::Other("pipeline memo lock poisoned".to_string()))?;
            results.clear();
        }
        if let Some(cache) = &self.cache {
            cache.clear()?;
        }
        Ok(())
    }
}
