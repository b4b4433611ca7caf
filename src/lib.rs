//! Review Trends - Beauty Review Categorization and Trend Aggregation
//!
//! A Rust library for processing tabular datasets of e-commerce product
//! reviews: resolving unknown column schemas, inferring product categories
//! with keyword heuristics refined by a trained text classifier, extracting
//! claim signals from review bodies, and aggregating yearly trends for an
//! interactive dashboard.
//!
//! # Features
//!
//! - Column discovery over unknown CSV schemas
//! - Heuristic + classifier category labeling
//! - Claim signal extraction (Hydrating, Anti-Aging, ...)
//! - Yearly aggregation with year-over-year growth
//! - Memoized pipeline with a persistent aggregate cache
//! - CSV/JSON export for offline inspection

/// Yearly aggregation of labeled reviews
pub mod aggregate;
/// Persistent aggregate cache
pub mod cache;
/// Claim signal extraction
pub mod claims;
/// Category classifier (TF-IDF + multinomial linear model)
pub mod classifier;
/// Configuration management
pub mod config;
/// Dataset loading
pub mod dataset;
/// Error types
pub mod error;
/// Aggregate table export
pub mod export;
/// Heuristic category labeling
pub mod labeler;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Pipeline orchestration and memoization
pub mod pipeline;
/// Column discovery
pub mod schema;
/// Input validation and sanitization
pub mod validation;
/// TF-IDF feature extraction
pub mod vectorizer;
/// Pure per-request views over aggregates
pub mod views;

// Re-export key components for easier access
pub use classifier::CategoryModel;
pub use error::{PipelineError, Result};
pub use models::{Category, CategoryAggregate, Claim, ClaimAggregate, OutputFormat, RawReview};
pub use pipeline::{PipelineResult, PipelineService};
