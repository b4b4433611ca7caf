use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub logging: LoggingConfig,
    pub classifier: ClassifierConfig,
    pub export: ExportConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the local reviews CSV
    pub path: String,
    /// Upper bound of the source rating scale (used for validation)
    pub rating_scale_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Maximum vocabulary size for the bag-of-n-grams features
    pub max_features: usize,
    /// Gradient descent iteration cap
    pub max_iterations: usize,
    /// Held-out fraction of the train/test split
    pub test_fraction: f64,
    /// Seed for the split shuffle, fixed for reproducibility
    pub seed: u64,
    /// Gradient descent learning rate
    pub learning_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub directory: String,
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig {
                path: "cosmetics_reviews.csv".to_string(),
                rating_scale_max: 5.0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            classifier: ClassifierConfig {
                max_features: 1000,
                max_iterations: 200,
                test_fraction: 0.2,
                seed: 42,
                learning_rate: 0.5,
            },
            export: ExportConfig {
                default_format: "csv".to_string(),
                output_directory: "./output".to_string(),
            },
            cache: CacheConfig {
                directory: ".review_cache".to_string(),
                enabled: true,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// defaults, then `config/*` files, then `REVIEW_TRENDS_*` env vars.
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();
        for (key, value) in Self::defaults() {
            builder = builder
                .set_default(&key, value)
                .map_err(|e| anyhow::anyhow!("Failed to set default for {key}: {e}"))?;
        }

        let config = builder
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("REVIEW_TRENDS").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Flatten the default configuration into key-value pairs for the builder
    fn defaults() -> Vec<(String, config::Value)> {
        let d = Self::default();
        vec![
            ("dataset.path".to_string(), d.dataset.path.into()),
            (
                "dataset.rating_scale_max".to_string(),
                d.dataset.rating_scale_max.into(),
            ),
            ("logging.level".to_string(), d.logging.level.into()),
            ("logging.file_path".to_string(), config::Value::from(None::<String>)),
            ("logging.format".to_string(), d.logging.format.into()),
            (
                "classifier.max_features".to_string(),
                (d.classifier.max_features as u64).into(),
            ),
            (
                "classifier.max_iterations".to_string(),
                (d.classifier.max_iterations as u64).into(),
            ),
            (
                "classifier.test_fraction".to_string(),
                d.classifier.test_fraction.into(),
            ),
            ("classifier.seed".to_string(), d.classifier.seed.into()),
            (
                "classifier.learning_rate".to_string(),
                d.classifier.learning_rate.into(),
            ),
            (
                "export.default_format".to_string(),
                d.export.default_format.into(),
            ),
            (
                "export.output_directory".to_string(),
                d.export.output_directory.into(),
            ),
            ("cache.directory".to_string(), d.cache.directory.into()),
            ("cache.enabled".to_string(), d.cache.enabled.into()),
        ]
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate dataset config
        if self.dataset.path.trim().is_empty() {
            return Err(anyhow::anyhow!("dataset.path cannot be empty"));
        }
        if self.dataset.rating_scale_max <= 0.0 {
            return Err(anyhow::anyhow!("rating_scale_max must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate classifier config
        if self.classifier.max_features == 0 {
            return Err(anyhow::anyhow!("max_features must be greater than 0"));
        }
        if self.classifier.max_iterations == 0 {
            return Err(anyhow::anyhow!("max_iterations must be greater than 0"));
        }
        if !(self.classifier.test_fraction > 0.0 && self.classifier.test_fraction < 1.0) {
            return Err(anyhow::anyhow!(
                "test_fraction must be strictly between 0 and 1"
            ));
        }
        if self.classifier.learning_rate <= 0.0 {
            return Err(anyhow::anyhow!("learning_rate must be greater than 0"));
        }

        // Validate export config
        let valid_formats = ["csv", "json"];
        if !valid_formats.contains(&self.export.default_format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid export format: {}. Must be one of: {:?}",
                self.export.default_format,
                valid_formats
            ));
        }
        if self.export.output_directory.trim().is_empty() {
            return Err(anyhow::anyhow!("output_directory cannot be empty"));
        }

        // Validate cache config
        if self.cache.enabled && self.cache.directory.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "cache.directory cannot be empty when caching is enabled"
            ));
        }

        Ok(())
    }

    /// Get dataset path from environment or config
    #[must_use]
    pub fn get_dataset_path(&self) -> String {
        std::env::var("REVIEWS_CSV_PATH").unwrap_or_else(|_| self.dataset.path.clone())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.dataset.path, "cosmetics_reviews.csv");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.classifier.max_features, 1000);
        assert_eq!(config.classifier.max_iterations, 200);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.classifier.test_fraction = 1.5;
        assert!(config.validate().is_err());
    }
}
