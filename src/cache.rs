use crate::aggregate::AggregateReport;
use crate::error::Result;
use crate::models::{CategoryAggregate, ClaimAggregate};
use anyhow::Context;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cached aggregate tables for one dataset version.
///
/// The trained classifier is deliberately not cached; model persistence is
/// out of scope, so the handle is rebuilt on every cold computation.
#[derive(Serialize, Deserialize)]
struct CacheEntry {
    fingerprint: u64,
    categories: Vec<CategoryAggregate>,
    claims: Vec<ClaimAggregate>,
    dropped_rows: usize,
    timestamp: DateTime<Local>,
}

/// Persistent cache of aggregate tables keyed by the dataset's content
/// fingerprint. Invalidation is explicit: a changed dataset hashes to a new
/// key, and `clear` wipes everything.
pub struct AggregateCache {
    db: sled::Db,
}

impl AggregateCache {
    pub fn open(directory: &Path) -> Result<Self> {
        std::fs::create_dir_all(directory)?;
        let db = sled::open(directory).context("Failed to open cache database")?;
        Ok(Self { db })
    }

    /// XXH3 fingerprint of the raw dataset bytes, used as the cache key.
    pub fn fingerprint(dataset_path: &Path) -> Result<u64> {
        let bytes = std::fs::read(dataset_path)?;
        Ok(xxhash_rust::xxh3::xxh3_64(&bytes))
    }

    pub fn get(&self, fingerprint: u64) -> Result<Option<AggregateReport>> {
        let Some(data) = self.db.get(fingerprint.to_be_bytes())? else {
            return Ok(None);
        };
        let entry: CacheEntry = bincode::deserialize(&data)?;
        Ok(Some(AggregateReport {
            categories: entry.categories,
            claims: entry.claims,
            dropped_rows: entry.dropped_rows,
        }))
    }

    pub fn put(&self, fingerprint: u64, report: &AggregateReport) -> Result<()> {
        let entry = CacheEntry {
            fingerprint,
            categories: report.categories.clone(),
            claims: report.claims.clone(),
            dropped_rows: report.dropped_rows,
            timestamp: Local::now(),
        };
        let data = bincode::serialize(&entry)?;
        self.db.insert(fingerprint.to_be_bytes(), data)?;
        self.db.flush()?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }
}
