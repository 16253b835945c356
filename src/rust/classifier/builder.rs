use std::collections::BTreeMap;
use log::{info, debug};

use super::classifier::{Classifier, TrainedModel};
use super::error::ClassifierError;
use super::naive_bayes::NaiveBayes;
use super::vectorizer::{CountVectorizer, VectorizerConfig};
use crate::Intent;

/// Represents a class definition with required intent, description and
/// training phrases
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The intent this class predicts
    pub label: Intent,
    /// A short description of what this class represents
    pub description: String,
    /// Training phrases that belong to this class
    pub examples: Option<Vec<String>>,
}

impl ClassDefinition {
    /// Creates a new class definition with required intent and description
    ///
    /// # Example
    /// ```
    /// use profile_router::{ClassDefinition, Intent};
    ///
    /// let class = ClassDefinition::new(Intent::Origin, "Where the person comes from");
    /// ```
    pub fn new(label: Intent, description: impl Into<String>) -> Self {
        Self {
            label,
            description: description.into(),
            examples: None,
        }
    }

    /// Adds training phrases to the class definition
    ///
    /// # Example
    /// ```
    /// use profile_router::{ClassDefinition, Intent};
    ///
    /// let class = ClassDefinition::new(Intent::Origin, "Where the person comes from")
    ///     .with_examples(vec!["where are you from", "your birthplace"]);
    /// ```
    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples = Some(examples.into_iter().map(Into::into).collect());
        self
    }
}

/// A builder for training a Classifier with a fluent interface.
///
/// Training is a deterministic function of the added examples: the same
/// classes always produce the same vocabulary and the same model.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    class_examples: BTreeMap<Intent, Vec<String>>,
    class_descriptions: BTreeMap<Intent, String>,
    vectorizer_config: VectorizerConfig,
    alpha: Option<f64>,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use profile_router::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tokenization options for the vectorizer
    pub fn with_vectorizer_config(mut self, config: VectorizerConfig) -> Self {
        self.vectorizer_config = config;
        self
    }

    /// Sets the additive smoothing used by the Naive Bayes model (default 1.0)
    pub fn with_smoothing(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Validates class data according to the following rules:
    /// - Description must not be empty and must not exceed 1000 characters
    /// - Must have at least one example
    /// - No example text can be empty or whitespace
    fn validate_class_data(
        label: Intent,
        description: &str,
        examples: &[impl AsRef<str>],
    ) -> Result<(), ClassifierError> {
        const MAX_DESCRIPTION_LENGTH: usize = 1000;

        if description.trim().is_empty() {
            return Err(ClassifierError::ValidationError(
                format!("Class '{}' description cannot be empty", label)
            ));
        }
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ClassifierError::ValidationError(
                format!("Class description is too long ({} chars, max is {})",
                    description.len(), MAX_DESCRIPTION_LENGTH)
            ));
        }
        if examples.is_empty() {
            return Err(ClassifierError::ValidationError(
                format!("Class '{}' must have at least one example", label)
            ));
        }
        if let Some(pos) = examples.iter().position(|e| e.as_ref().trim().is_empty()) {
            return Err(ClassifierError::ValidationError(
                format!("Example {} of class '{}' cannot be empty", pos + 1, label)
            ));
        }
        Ok(())
    }

    /// Adds a class with its definition
    ///
    /// # Errors
    /// `ValidationError` if the description is empty or too long, no
    /// examples are given, an example is empty, or the intent was already added
    ///
    /// # Example
    /// ```
    /// use profile_router::{ClassifierBuilder, ClassDefinition, Intent};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .add_class(
    ///         ClassDefinition::new(Intent::Thanks, "Gratitude")
    ///             .with_examples(vec!["thanks", "thank you"])
    ///     );
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, ClassifierError> {
        let examples = class.examples.unwrap_or_default();
        Self::validate_class_data(class.label, &class.description, &examples)?;

        if self.class_examples.contains_key(&class.label) {
            return Err(ClassifierError::ValidationError(
                format!("Class '{}' was already added", class.label)
            ));
        }

        self.class_examples.insert(class.label, examples);
        self.class_descriptions.insert(class.label, class.description);
        Ok(self)
    }

    /// Adds (label, phrase) pairs where labels are given as text.
    ///
    /// Every label must name an intent the router can render; an unknown
    /// label is a `ValidationError`. Phrases for an intent that was already
    /// added are appended to that class.
    pub fn add_labeled_examples<L, P>(
        mut self,
        pairs: impl IntoIterator<Item = (L, P)>,
    ) -> Result<Self, ClassifierError>
    where
        L: AsRef<str>,
        P: Into<String>,
    {
        for (label, phrase) in pairs {
            let intent: Intent = label.as_ref().parse().map_err(|_| {
                ClassifierError::ValidationError(format!(
                    "Training label '{}' has no renderer",
                    label.as_ref()
                ))
            })?;
            let phrase = phrase.into();
            if phrase.trim().is_empty() {
                return Err(ClassifierError::ValidationError(
                    format!("Example of class '{}' cannot be empty", intent)
                ));
            }
            self.class_descriptions
                .entry(intent)
                .or_insert_with(|| format!("Phrases labelled '{}'", intent));
            self.class_examples.entry(intent).or_default().push(phrase);
        }
        Ok(self)
    }

    /// Intents that have at least one example so far, in class order
    pub fn classes(&self) -> Vec<Intent> {
        self.class_examples.keys().copied().collect()
    }

    /// Fits the vectorizer on every example, then the Naive Bayes model on
    /// the resulting count vectors.
    ///
    /// # Errors
    /// - `BuildError` if no classes have been added or the examples yield
    ///   an empty vocabulary
    /// - any validation error from fitting
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use profile_router::{ClassifierBuilder, ClassDefinition, Intent};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .add_class(
    ///         ClassDefinition::new(Intent::Greeting, "Salutations")
    ///             .with_examples(vec!["hi", "hello"])
    ///     )?
    ///     .build()?;
    /// assert_eq!(classifier.info().num_classes, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        if self.class_examples.is_empty() {
            return Err(ClassifierError::BuildError("At least one class must be added".to_string()));
        }

        let mut corpus: Vec<&str> = Vec::new();
        let mut labels: Vec<Intent> = Vec::new();
        for (intent, examples) in &self.class_examples {
            debug!("Class '{}': {} examples", intent, examples.len());
            for example in examples {
                corpus.push(example);
                labels.push(*intent);
            }
        }

        let mut vectorizer = CountVectorizer::with_config(self.vectorizer_config.clone());
        let features = vectorizer.fit_transform(&corpus)?;
        let model = NaiveBayes::fit_with_alpha(
            &features,
            &labels,
            self.alpha.unwrap_or(NaiveBayes::DEFAULT_ALPHA),
        )?;

        let vocabulary_fingerprint = vectorizer
            .vocabulary()
            .map(|v| v.fingerprint())
            .ok_or_else(|| ClassifierError::BuildError("Vectorizer was not fitted".into()))?;

        info!(
            "Trained classifier on {} examples across {} classes ({} features)",
            labels.len(),
            model.classes().len(),
            model.n_features()
        );

        Classifier::from_parts(
            vectorizer,
            TrainedModel {
                vocabulary_fingerprint,
                model,
                class_descriptions: self.class_descriptions,
            },
        )
    }
}
