use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use log::debug;

use super::error::ClassifierError;
use super::vectorizer::FeatureVector;
use crate::Intent;

/// Multinomial Naive Bayes over term-count vectors.
///
/// Classes are stored in [`Intent`] order. Scores that tie exactly resolve
/// to the class stored first, so prediction is a pure function of the
/// training data and the input vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayes {
    classes: Vec<Intent>,
    class_counts: Vec<usize>,
    class_log_prior: Array1<f64>,
    /// `[n_classes, n_features]` smoothed `log P(term | class)`
    feature_log_prob: Array2<f64>,
    alpha: f64,
}

impl NaiveBayes {
    pub const DEFAULT_ALPHA: f64 = 1.0;

    /// Fits with add-one (Laplace) smoothing.
    pub fn fit(features: &[FeatureVector], labels: &[Intent]) -> Result<Self, ClassifierError> {
        Self::fit_with_alpha(features, labels, Self::DEFAULT_ALPHA)
    }

    /// Fits with additive smoothing `alpha`.
    ///
    /// # Errors
    /// - `BuildError` if there are no training examples
    /// - `ValidationError` if features and labels differ in length, the
    ///   vectors differ in width, the width is zero or `alpha` is not positive
    pub fn fit_with_alpha(
        features: &[FeatureVector],
        labels: &[Intent],
        alpha: f64,
    ) -> Result<Self, ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::BuildError("Cannot fit on an empty training set".into()));
        }
        if features.len() != labels.len() {
            return Err(ClassifierError::ValidationError(format!(
                "Got {} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(ClassifierError::ValidationError(format!(
                "Smoothing alpha must be positive, got {}",
                alpha
            )));
        }
        let n_features = features[0].width();
        if n_features == 0 {
            return Err(ClassifierError::ValidationError("Feature width cannot be zero".into()));
        }
        if let Some(pos) = features.iter().position(|f| f.width() != n_features) {
            return Err(ClassifierError::ValidationError(format!(
                "Feature vector {} has width {}, expected {}",
                pos + 1,
                features[pos].width(),
                n_features
            )));
        }

        let mut classes: Vec<Intent> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let mut class_counts = vec![0usize; classes.len()];
        let mut term_counts = Array2::<f64>::zeros((classes.len(), n_features));
        for (feature, label) in features.iter().zip(labels) {
            // classes was built from labels, so the search always succeeds
            let row = classes.binary_search(label).unwrap_or_default();
            class_counts[row] += 1;
            for (column, count) in feature.iter() {
                term_counts[[row, column]] += count as f64;
            }
        }

        let total = labels.len() as f64;
        let class_log_prior = class_counts.iter().map(|&n| (n as f64 / total).ln()).collect();

        let smoothed = term_counts + alpha;
        let mut feature_log_prob = smoothed.mapv(f64::ln);
        for (mut row, smoothed_row) in feature_log_prob.rows_mut().into_iter().zip(smoothed.rows()) {
            let log_total = smoothed_row.sum().ln();
            row -= log_total;
        }

        debug!(
            "Fitted Naive Bayes: {} classes, {} features, {} examples",
            classes.len(),
            n_features,
            labels.len()
        );

        Ok(Self {
            classes,
            class_counts,
            class_log_prior,
            feature_log_prob,
            alpha,
        })
    }

    /// Classes in tie-break order
    pub fn classes(&self) -> &[Intent] {
        &self.classes
    }

    /// Width of the feature vectors this model accepts
    pub fn n_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of training examples seen for `intent`
    pub fn class_count(&self, intent: Intent) -> usize {
        self.classes
            .binary_search(&intent)
            .map(|row| self.class_counts[row])
            .unwrap_or(0)
    }

    pub fn class_log_prior(&self, intent: Intent) -> Option<f64> {
        let row = self.classes.binary_search(&intent).ok()?;
        Some(self.class_log_prior[row])
    }

    /// Smoothed `log P(term | intent)` for one feature column
    pub fn feature_log_prob(&self, intent: Intent, column: usize) -> Option<f64> {
        let row = self.classes.binary_search(&intent).ok()?;
        self.feature_log_prob.get([row, column]).copied()
    }

    /// Joint log likelihood `log P(c) + Σ count_t · log P(t|c)` per class, in class order.
    pub fn scores(&self, feature: &FeatureVector) -> Result<Vec<(Intent, f64)>, ClassifierError> {
        if feature.width() != self.n_features() {
            return Err(ClassifierError::ValidationError(format!(
                "Feature vector has width {}, model expects {}",
                feature.width(),
                self.n_features()
            )));
        }

        Ok(self
            .classes
            .iter()
            .enumerate()
            .map(|(row, &intent)| {
                let evidence: f64 = feature
                    .iter()
                    .map(|(column, count)| count as f64 * self.feature_log_prob[[row, column]])
                    .sum();
                (intent, self.class_log_prior[row] + evidence)
            })
            .collect())
    }

    /// Returns the highest-scoring intent. An all-zero vector falls back to
    /// the class with the highest prior.
    pub fn predict(&self, feature: &FeatureVector) -> Result<Intent, ClassifierError> {
        let scores = self.scores(feature)?;
        let mut best = scores
            .first()
            .copied()
            .ok_or_else(|| ClassifierError::NotFitted("Model has no classes".into()))?;
        for &(intent, score) in &scores[1..] {
            // strict comparison keeps the earliest class on ties
            if score > best.1 {
                best = (intent, score);
            }
        }
        Ok(best.0)
    }

    /// Checks internal shape consistency, used after deserialization.
    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(ClassifierError::ValidationError("Model has no classes".into()));
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ClassifierError::ValidationError("Model classes are not in class order".into()));
        }
        if self.class_counts.len() != n_classes
            || self.class_log_prior.len() != n_classes
            || self.feature_log_prob.nrows() != n_classes
        {
            return Err(ClassifierError::ValidationError(format!(
                "Model tables disagree on the number of classes (expected {})",
                n_classes
            )));
        }
        Ok(())
    }
}
