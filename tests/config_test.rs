//! Unit tests for the configuration module

use review_trends::config::AppConfig;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.dataset.path, "cosmetics_reviews.csv");
    assert!((config.dataset.rating_scale_max - 5.0).abs() < f64::EPSILON);
    assert_eq!(config.export.default_format, "csv");
    assert_eq!(config.export.output_directory, "./output");
    assert_eq!(config.cache.directory, ".review_cache");
    assert!(config.cache.enabled);
}

#[test]
fn test_default_classifier_config() {
    let config = AppConfig::default();

    assert_eq!(config.classifier.max_features, 1000);
    assert_eq!(config.classifier.max_iterations, 200);
    assert!((config.classifier.test_fraction - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.classifier.seed, 42);
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.classifier.max_features = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.export.default_format = "xml".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.dataset.rating_scale_max = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_default_config_is_valid() {
    assert!(AppConfig::default().validate().is_ok());
}
