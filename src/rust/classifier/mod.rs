use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Intent;

mod error;
mod vectorizer;
mod naive_bayes;
mod classifier;
pub mod builder;
mod utils;

pub use error::ClassifierError;
pub use vectorizer::{CountVectorizer, FeatureVector, VectorizerConfig, Vocabulary};
pub use naive_bayes::NaiveBayes;
pub use classifier::{Classifier, TrainedModel};
pub use builder::{ClassifierBuilder, ClassDefinition};

/// Information about the current state of a trained classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of classes the classifier is trained on
    pub num_classes: usize,
    /// Intents the classifier can emit, in tie-break order
    pub class_labels: Vec<Intent>,
    /// Descriptions of the classes
    pub class_descriptions: Arc<BTreeMap<Intent, String>>,
    /// Number of n-gram terms in the vocabulary
    pub vocabulary_size: usize,
    /// SHA-256 of the vocabulary, shared by the vectorizer and the model
    pub vocabulary_fingerprint: String,
}
