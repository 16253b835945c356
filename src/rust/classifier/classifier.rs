use std::sync::Arc;
use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use log::debug;

use super::error::ClassifierError;
use super::naive_bayes::NaiveBayes;
use super::vectorizer::{CountVectorizer, FeatureVector};
use crate::Intent;

/// The trained model half of an artifact pair, stamped with the vocabulary
/// it was fitted against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    /// Fingerprint of the vocabulary the model's columns refer to
    pub vocabulary_fingerprint: String,
    pub model: NaiveBayes,
    #[serde(default)]
    pub class_descriptions: BTreeMap<Intent, String>,
}

/// A thread-safe intent classifier: a fitted vectorizer and the Naive Bayes
/// model trained on its output.
///
/// The two halves are only meaningful together, so they are constructed and
/// loaded as one unit and checked for agreement.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use profile_router::{Classifier, ClassDefinition, Intent};
///
/// let classifier = Classifier::builder()
///     .add_class(
///         ClassDefinition::new(Intent::Greeting, "Salutations")
///             .with_examples(vec!["hi", "hello"])
///     )?
///     .add_class(
///         ClassDefinition::new(Intent::Thanks, "Gratitude")
///             .with_examples(vec!["thanks", "thank you"])
///     )?
///     .build()?;
///
/// let (intent, _scores) = classifier.predict("thank you so much")?;
/// assert_eq!(intent, Intent::Thanks);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    vectorizer: Arc<CountVectorizer>,
    model: Arc<NaiveBayes>,
    class_descriptions: Arc<BTreeMap<Intent, String>>,
    vocabulary_fingerprint: String,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Pairs a fitted vectorizer with a model, failing if they were not
    /// trained together.
    ///
    /// # Errors
    /// - `NotFitted` if the vectorizer has no vocabulary
    /// - `ArtifactMismatch` if the vocabulary size differs from the model's
    ///   feature width or the fingerprints disagree
    pub fn from_parts(vectorizer: CountVectorizer, trained: TrainedModel) -> Result<Self, ClassifierError> {
        let vocabulary = vectorizer.vocabulary().ok_or_else(|| {
            ClassifierError::NotFitted("Vectorizer has no vocabulary".into())
        })?;
        trained.model.validate()?;
        if vocabulary.len() != trained.model.n_features() {
            return Err(ClassifierError::ArtifactMismatch(format!(
                "Vectorizer vocabulary has {} terms but the model expects {} features",
                vocabulary.len(),
                trained.model.n_features()
            )));
        }
        let fingerprint = vocabulary.fingerprint();
        if fingerprint != trained.vocabulary_fingerprint {
            return Err(ClassifierError::ArtifactMismatch(format!(
                "Model was trained against vocabulary {} but the vectorizer has {}",
                trained.vocabulary_fingerprint, fingerprint
            )));
        }

        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            model: Arc::new(trained.model),
            class_descriptions: Arc::new(trained.class_descriptions),
            vocabulary_fingerprint: fingerprint,
        })
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &NaiveBayes {
        &self.model
    }

    pub fn vocabulary_fingerprint(&self) -> &str {
        &self.vocabulary_fingerprint
    }

    /// The model half in persistable form
    pub fn trained_model(&self) -> TrainedModel {
        TrainedModel {
            vocabulary_fingerprint: self.vocabulary_fingerprint.clone(),
            model: self.model.as_ref().clone(),
            class_descriptions: self.class_descriptions.as_ref().clone(),
        }
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.model.classes().len(),
            class_labels: self.model.classes().to_vec(),
            class_descriptions: Arc::clone(&self.class_descriptions),
            vocabulary_size: self.model.n_features(),
            vocabulary_fingerprint: self.vocabulary_fingerprint.clone(),
        }
    }

    /// Converts text into the feature vector the model consumes
    pub fn featurize(&self, text: &str) -> Result<FeatureVector, ClassifierError> {
        self.vectorizer.transform_one(text)
    }

    /// Predicts the intent of the input text and returns the per-class log
    /// likelihoods.
    ///
    /// Empty text and text made only of unknown words are valid: they carry
    /// no evidence and resolve to the class with the highest prior.
    pub fn predict(&self, text: &str) -> Result<(Intent, HashMap<Intent, f64>), ClassifierError> {
        let features = self.featurize(text)?;
        let scores = self.model.scores(&features)?;
        let intent = self.model.predict(&features)?;
        debug!("Routed {:?} to {} ({} known terms)", text, intent, features.total());
        Ok((intent, scores.into_iter().collect()))
    }

    /// Predicts the intent only
    pub fn predict_intent(&self, text: &str) -> Result<Intent, ClassifierError> {
        let features = self.featurize(text)?;
        self.model.predict(&features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassDefinition;

    fn setup_test_classifier() -> Classifier {
        Classifier::builder()
            .add_class(
                ClassDefinition::new(Intent::Greeting, "Greetings")
                    .with_examples(vec!["hi", "hello", "good morning"])
            )
            .unwrap()
            .add_class(
                ClassDefinition::new(Intent::Thanks, "Gratitude")
                    .with_examples(vec!["thanks", "thank you"])
            )
            .unwrap()
            .build()
            .expect("Failed to create classifier")
    }

    #[test]
    fn test_class_info() {
        let classifier = setup_test_classifier();
        let info = classifier.info();
        assert_eq!(info.num_classes, 2);
        assert_eq!(info.class_labels, vec![Intent::Greeting, Intent::Thanks]);
        assert!(info.class_descriptions.contains_key(&Intent::Thanks));
        assert_eq!(info.vocabulary_size, classifier.model().n_features());
    }

    #[test]
    fn test_predict_returns_all_scores() {
        let classifier = setup_test_classifier();
        let (intent, scores) = classifier.predict("good morning").unwrap();
        assert_eq!(intent, Intent::Greeting);
        assert_eq!(scores.len(), 2);
        assert!(scores[&Intent::Greeting] > scores[&Intent::Thanks]);
    }

    #[test]
    fn test_from_parts_rejects_foreign_model() {
        let a = setup_test_classifier();
        let mut other = CountVectorizer::new();
        other.fit(&["completely", "different words here"]).unwrap();
        let result = Classifier::from_parts(other, a.trained_model());
        assert!(matches!(result, Err(ClassifierError::ArtifactMismatch(_))));
    }

    #[test]
    fn test_from_parts_rejects_same_width_different_terms() {
        let a = setup_test_classifier();
        let width = a.vectorizer().vocabulary().unwrap().len();
        let terms: Vec<String> = (0..width).map(|i| format!("term{:03}", i)).collect();
        let corpus: Vec<&str> = terms.iter().map(String::as_str).collect();
        let mut other = CountVectorizer::new().with_ngram_range(1, 1);
        other.fit(&corpus).unwrap();
        assert_eq!(other.vocabulary().unwrap().len(), width);
        let result = Classifier::from_parts(other, a.trained_model());
        assert!(matches!(result, Err(ClassifierError::ArtifactMismatch(_))));
    }

    #[test]
    fn test_from_parts_accepts_own_halves() {
        let a = setup_test_classifier();
        let rebuilt = Classifier::from_parts(a.vectorizer().clone(), a.trained_model()).unwrap();
        assert_eq!(rebuilt.info().class_descriptions, a.info().class_descriptions);
        assert_eq!(rebuilt.predict_intent("thanks").unwrap(), Intent::Thanks);
    }
}
