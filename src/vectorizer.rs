//! Bag-of-n-grams TF-IDF features for product names.
//!
//! Converts product-name strings into dense TF-IDF matrices: lowercase,
//! strip punctuation, drop English stopwords, emit unigrams and bigrams,
//! cap the vocabulary by corpus frequency, weight with smooth IDF, and
//! L2-normalize each row.

use ndarray::{Array1, Array2};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;

use crate::error::{PipelineError, Result};

/// TF-IDF vectorizer over unigrams and bigrams.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Maximum vocabulary size, kept by corpus term frequency
    max_features: usize,
    special_chars: Regex,
    stopwords: HashSet<String>,
    /// term -> column index
    vocabulary: HashMap<String, usize>,
    /// IDF weight per column
    idf: Vec<f64>,
    fitted: bool,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Result<Self> {
        let special_chars = Regex::new(r"[^\w\s]")
            .map_err(|e| PipelineError::Other(format!("Failed to compile token regex: {e}")))?;

        // The NLTK list holds function words only; broader lists (ISO) also
        // drop nouns like "face" that carry category signal.
        let stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(ToString::to_string)
            .collect();

        Ok(Self {
            max_features,
            special_chars,
            stopwords,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            fitted: false,
        })
    }

    /// Tokenize one document into unigrams and bigrams.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text.nfc().collect();
        let lowered = normalized.to_lowercase();
        let cleaned = self.special_chars.replace_all(&lowered, " ");

        let words: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|w| !self.stopwords.contains(*w))
            .collect();

        let mut terms: Vec<String> = words.iter().map(ToString::to_string).collect();
        for pair in words.windows(2) {
            terms.push(format!("{} {}", pair[0], pair[1]));
        }
        terms
    }

    /// Build the vocabulary and IDF weights from a corpus.
    pub fn fit(&mut self, documents: &[String]) {
        let n_docs = documents.len();
        let mut corpus_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.tokenize(doc);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in &terms {
                *corpus_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Keep the most frequent terms; ties broken alphabetically so the
        // vocabulary is deterministic.
        let mut ranked: Vec<(String, usize)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        self.vocabulary = ranked
            .iter()
            .enumerate()
            .map(|(idx, (term, _))| (term.clone(), idx))
            .collect();

        // Smooth IDF: ln((1 + n) / (1 + df)) + 1
        self.idf = vec![0.0; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            let df = doc_freq.get(term).copied().unwrap_or(0);
            self.idf[idx] = (((1 + n_docs) as f64) / ((1 + df) as f64)).ln() + 1.0;
        }

        self.fitted = true;
    }

    /// Transform documents into an L2-normalized TF-IDF matrix.
    pub fn transform(&self, documents: &[String]) -> Result<Array2<f64>> {
        if !self.fitted {
            return Err(PipelineError::Other(
                "vectorizer has not been fitted".to_string(),
            ));
        }

        let mut matrix = Array2::<f64>::zeros((documents.len(), self.vocabulary.len()));
        for (row, doc) in documents.iter().enumerate() {
            let vector = self.vectorize(doc);
            matrix.row_mut(row).assign(&vector);
        }
        Ok(matrix)
    }

    /// Transform a single document into an L2-normalized TF-IDF row.
    #[must_use]
    pub fn vectorize(&self, document: &str) -> Array1<f64> {
        let mut row = Array1::<f64>::zeros(self.vocabulary.len());
        for term in self.tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                row[idx] += 1.0;
            }
        }
        for (idx, value) in row.iter_mut().enumerate() {
            *value *= self.idf[idx];
        }

        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row /= norm;
        }
        row
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
