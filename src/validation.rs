use anyhow::{anyhow, Result};
use std::path::Path;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the dataset file path before opening it
    pub fn validate_dataset_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(anyhow!("Dataset path cannot be empty"));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("Dataset path too long (max 4096 characters)"));
        }

        if let Some(ext) = path.extension() {
            if ext != "csv" && ext != "tsv" && ext != "txt" {
                return Err(anyhow!(
                    "Unsupported dataset extension: {ext:?} (expected csv, tsv, or txt)"
                ));
            }
        }

        Ok(())
    }

    /// Validate a rating against the source scale
    pub fn validate_rating(rating: f64, scale_max: f64) -> Result<()> {
        if !rating.is_finite() {
            return Err(anyhow!("Rating must be a finite number"));
        }
        if rating < 0.0 || rating > scale_max {
            return Err(anyhow!(
                "Rating {rating} out of range (expected 0 to {scale_max})"
            ));
        }
        Ok(())
    }

    /// Validate text submitted for ad hoc prediction
    pub fn validate_prediction_input(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(anyhow!("Prediction input cannot be empty"));
        }

        if text.len() > 1000 {
            return Err(anyhow!("Prediction input too long (max 1000 characters)"));
        }

        if text.contains('\0') {
            return Err(anyhow!("Prediction input contains invalid characters"));
        }

        Ok(())
    }

    /// Validate the export output directory
    pub fn validate_output_dir(dir: &str) -> Result<()> {
        if dir.trim().is_empty() {
            return Err(anyhow!("Output directory cannot be empty"));
        }

        // Check for path traversal attempts
        if dir.contains("..") {
            return Err(anyhow!(
                "Output directory contains potentially dangerous characters"
            ));
        }

        Ok(())
    }

    /// Sanitize free-text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
