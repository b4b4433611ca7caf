//! Category classifier: TF-IDF features into a multinomial linear model.
//!
//! The model trains on heuristic labels and then replaces every row's final
//! category with its own prediction, including the rows it trained on. The
//! heuristic is simultaneously the training signal and the thing being
//! replaced: the model acts as a denoising pass over the keyword rules.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::config::ClassifierConfig;
use crate::error::{PipelineError, Result};
use crate::labeler::heuristic_label;
use crate::models::RawReview;
use crate::vectorizer::TfidfVectorizer;

/// Multinomial logistic regression trained by batch gradient descent.
///
/// Weights are zero-initialized, so training is deterministic for a given
/// feature matrix.
#[derive(Debug, Clone)]
struct SoftmaxRegression {
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    /// (n_features, n_classes)
    weights: Array2<f64>,
    /// (n_classes,)
    bias: Array1<f64>,
    /// Cross-entropy per iteration, for diagnostics
    cost_history: Vec<f64>,
}

impl SoftmaxRegression {
    fn new(learning_rate: f64, max_iter: usize) -> Self {
        Self {
            learning_rate,
            max_iter,
            tolerance: 1e-6,
            weights: Array2::zeros((0, 0)),
            bias: Array1::zeros(0),
            cost_history: Vec::new(),
        }
    }

    /// Row-wise softmax with the max-subtraction trick for stability.
    fn softmax(logits: &Array2<f64>) -> Array2<f64> {
        let mut probs = logits.clone();
        for mut row in probs.rows_mut() {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            row.mapv_inplace(|z| (z - max).exp());
            let sum = row.sum();
            row.mapv_inplace(|p| p / sum);
        }
        probs
    }

    fn cross_entropy(probs: &Array2<f64>, targets: &[usize]) -> f64 {
        let eps = 1e-15;
        let n = targets.len() as f64;
        -targets
            .iter()
            .enumerate()
            .map(|(i, &class)| probs[[i, class]].clamp(eps, 1.0 - eps).ln())
            .sum::<f64>()
            / n
    }

    /// Fit on a feature matrix and class indices.
    fn fit(&mut self, x: &Array2<f64>, targets: &[usize], n_classes: usize) {
        let n_samples = x.nrows() as f64;
        let n_features = x.ncols();

        // One-hot target matrix
        let mut y = Array2::<f64>::zeros((targets.len(), n_classes));
        for (i, &class) in targets.iter().enumerate() {
            y[[i, class]] = 1.0;
        }

        self.weights = Array2::zeros((n_features, n_classes));
        self.bias = Array1::zeros(n_classes);
        self.cost_history.clear();

        for _ in 0..self.max_iter {
            let logits = x.dot(&self.weights) + &self.bias;
            let probs = Self::softmax(&logits);

            let cost = Self::cross_entropy(&probs, targets);
            if let Some(&prev) = self.cost_history.last() {
                if (prev - cost).abs() < self.tolerance {
                    self.cost_history.push(cost);
                    break;
                }
            }
            self.cost_history.push(cost);

            let errors = &probs - &y;
            let grad_w = x.t().dot(&errors) / n_samples;
            let grad_b = errors.sum_axis(Axis(0)) / n_samples;

            self.weights = &self.weights - &(grad_w * self.learning_rate);
            self.bias = &self.bias - &(grad_b * self.learning_rate);
        }
    }

    /// Predicted class index per row (argmax of the logits).
    fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        let logits = x.dot(&self.weights) + &self.bias;
        logits
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map_or(0, |(idx, _)| idx)
            })
            .collect()
    }
}

/// A trained category model: fitted vectorizer plus linear classifier.
/// Immutable once trained.
#[derive(Debug)]
pub struct CategoryModel {
    vectorizer: TfidfVectorizer,
    model: SoftmaxRegression,
    classes: Vec<String>,
    holdout_accuracy: f64,
}

impl CategoryModel {
    /// Train on (product name, heuristic label) pairs.
    ///
    /// Returns `None` when fewer than 2 distinct heuristic labels exist in
    /// the dataset, or when the seeded split leaves a single-class train
    /// partition; the caller falls back to heuristic labels in both cases.
    pub fn train(rows: &[RawReview], config: &ClassifierConfig) -> Result<Option<Self>> {
        let labels: Vec<String> = rows
            .iter()
            .map(|r| {
                heuristic_label(&r.product_name, r.brand.as_deref(), r.tags.as_deref())
                    .as_str()
                    .to_string()
            })
            .collect();

        let distinct: BTreeSet<&String> = labels.iter().collect();
        if distinct.len() < 2 {
            warn!(
                classes = distinct.len(),
                "Insufficient label diversity; skipping classifier training"
            );
            return Ok(None);
        }
        let classes: Vec<String> = distinct.into_iter().cloned().collect();

        // 80/20 split over shuffled indices, seeded for reproducibility.
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        let mut rng = StdRng::seed_from_u64(config.seed);
        indices.shuffle(&mut rng);
        // At least one row on each side; rows.len() >= 2 is guaranteed by
        // the diversity check above.
        let n_test = (((rows.len() as f64) * config.test_fraction).floor() as usize)
            .clamp(1, rows.len() - 1);
        let (train_idx, test_idx) = indices.split_at(rows.len() - n_test);

        let train_classes: BTreeSet<&String> = train_idx.iter().map(|&i| &labels[i]).collect();
        if train_classes.len() < 2 {
            warn!("Train partition collapsed to a single class; skipping classifier training");
            return Ok(None);
        }

        let train_docs: Vec<String> = train_idx.iter().map(|&i| rows[i].product_name.clone()).collect();
        let train_targets: Vec<usize> = train_idx
            .iter()
            .map(|&i| class_index(&classes, &labels[i]))
            .collect();

        let mut vectorizer = TfidfVectorizer::new(config.max_features)?;
        vectorizer.fit(&train_docs);
        let x_train = vectorizer.transform(&train_docs)?;

        let mut model = SoftmaxRegression::new(config.learning_rate, config.max_iterations);
        model.fit(&x_train, &train_targets, classes.len());

        // Held-out accuracy on the test partition
        let test_docs: Vec<String> = test_idx.iter().map(|&i| rows[i].product_name.clone()).collect();
        let holdout_accuracy = if test_docs.is_empty() {
            0.0
        } else {
            let x_test = vectorizer.transform(&test_docs)?;
            let predicted = model.predict(&x_test);
            let mut correct = 0;
            for (p, &i) in predicted.iter().zip(test_idx) {
                if classes[*p] == labels[i] {
                    correct += 1;
                }
            }
            f64::from(correct) / test_docs.len() as f64
        };

        info!(
            classes = classes.len(),
            vocabulary = vectorizer.vocabulary_size(),
            accuracy = format!("{holdout_accuracy:.2}"),
            "Classifier trained"
        );

        Ok(Some(Self {
            vectorizer,
            model,
            classes,
            holdout_accuracy,
        }))
    }

    /// Classify a single ad hoc string.
    ///
    /// Blank input is a clear inference error rather than a silent crash;
    /// otherwise the result is always one of the trained class labels, even
    /// for strings never seen in training.
    pub fn predict_one(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(PipelineError::Inference(
                "cannot classify empty input".to_string(),
            ));
        }
        let row = self
            .vectorizer
            .vectorize(text)
            .insert_axis(ndarray::Axis(0));
        let predicted = self.model.predict(&row);
        let idx = predicted
            .first()
            .copied()
            .ok_or_else(|| PipelineError::Inference("prediction produced no output".to_string()))?;
        Ok(self.classes[idx].clone())
    }

    /// Classify a batch of strings.
    pub fn predict_many(&self, texts: &[String]) -> Result<Vec<String>> {
        let x = self.vectorizer.transform(texts)?;
        Ok(self
            .model
            .predict(&x)
            .into_iter()
            .map(|idx| self.classes[idx].clone())
            .collect())
    }

    /// Accuracy on the held-out 20% partition, reported after training.
    #[must_use]
    pub fn holdout_accuracy(&self) -> f64 {
        self.holdout_accuracy
    }

    /// Trained class labels, sorted.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

fn class_index(classes: &[String], label: &str) -> usize {
    classes
        .iter()
        .position(|c| c == label)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(name: &str) -> RawReview {
        RawReview {
            product_name: name.to_string(),
            rating: 4.0,
            review_text: None,
            review_date: None,
            brand: None,
            tags: None,
        }
    }

    fn config() -> ClassifierConfig {
        ClassifierConfig {
            max_features: 1000,
            max_iterations: 200,
            test_fraction: 0.2,
            seed: 42,
            learning_rate: 0.5,
        }
    }

    fn training_rows() -> Vec<RawReview> {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(review(&format!("Hydrating Face Serum {i}")));
            rows.push(review(&format!("Matte Lipstick Shade {i}")));
        }
        rows
    }

    #[test]
    fn single_class_dataset_skips_training() {
        let rows = vec![review("Hydrating Face Serum"), review("Night Face Cream")];
        let model = CategoryModel::train(&rows, &config()).expect("train should not error");
        assert!(model.is_none());
    }

    #[test]
    fn trained_model_separates_distinct_vocabularies() {
        let rows = training_rows();
        let model = CategoryModel::train(&rows, &config())
            .expect("train should not error")
            .expect("two classes present");

        assert_eq!(
            model.predict_one("Hydrating Face Serum").expect("predict"),
            "Skincare"
        );
        assert_eq!(
            model.predict_one("Matte Lipstick").expect("predict"),
            "Makeup"
        );
    }

    #[test]
    fn unseen_input_still_returns_a_trained_label() {
        let rows = training_rows();
        let model = CategoryModel::train(&rows, &config())
            .expect("train should not error")
            .expect("two classes present");

        let label = model
            .predict_one("entirely novel gadget never trained on")
            .expect("predict");
        assert!(model.classes().contains(&label));
    }

    #[test]
    fn blank_input_is_an_inference_error() {
        let rows = training_rows();
        let model = CategoryModel::train(&rows, &config())
            .expect("train should not error")
            .expect("two classes present");

        let err = model.predict_one("   ").expect_err("should fail");
        assert!(matches!(err, PipelineError::Inference(_)));
    }

    #[test]
    fn predict_many_matches_predict_one() {
        let rows = training_rows();
        let model = CategoryModel::train(&rows, &config())
            .expect("train should not error")
            .expect("two classes present");

        let texts = vec![
            "Hydrating Face Serum".to_string(),
            "Matte Lipstick".to_string(),
        ];
        let batch = model.predict_many(&texts).expect("predict_many");
        assert_eq!(batch[0], model.predict_one(&texts[0]).expect("predict"));
        assert_eq!(batch[1], model.predict_one(&texts[1]).expect("predict"));
    }

    #[test]
    fn training_is_deterministic_for_a_fixed_seed() {
        let rows = training_rows();
        let a = CategoryModel::train(&rows, &config())
            .expect("train")
            .expect("model");
        let b = CategoryModel::train(&rows, &config())
            .expect("train")
            .expect("model");
        assert_eq!(a.holdout_accuracy(), b.holdout_accuracy());
        assert_eq!(a.classes(), b.classes());
    }
}
