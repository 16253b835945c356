use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use log::{debug, error, info};

use crate::classifier::{Classifier, ClassifierError, ClassDefinition};
use crate::config::TrainingConfig;
use crate::corpus::builtin_classes;
use crate::profile::Profile;
use crate::render::{render, RendererRegistry};
use crate::Intent;

/// The answers half of a trained artifact set: which renderer answers each
/// label, and the profile the renderers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerBundle {
    pub answers_index: BTreeMap<String, Intent>,
    pub profile: Profile,
}

impl AnswerBundle {
    /// Identity label mapping over `profile`
    pub fn new(profile: Profile) -> Self {
        Self {
            answers_index: RendererRegistry::new().answers_index().clone(),
            profile,
        }
    }
}

/// Routes free text to an intent and renders the answer.
///
/// A router is immutable once built. All of its state sits behind `Arc`, so
/// cloning is cheap and a single router can serve any number of threads.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use profile_router::Router;
///
/// let router = Router::builtin()?;
/// assert_eq!(router.answer("thanks"), "You're welcome!");
/// assert_eq!(router.answer("what is your full name"), "My full name is Faruk Hasan.");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    classifier: Classifier,
    registry: Arc<RendererRegistry>,
    profile: Arc<Profile>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Router>();
    }
};

impl Router {
    /// Assembles a router from a trained classifier and its answer bundle.
    ///
    /// # Errors
    /// `BuildError` if any class the classifier can emit has no entry in
    /// the answers index
    pub fn new(classifier: Classifier, bundle: AnswerBundle) -> Result<Self, ClassifierError> {
        let registry = RendererRegistry::from_index(bundle.answers_index);
        let unmapped = registry.unmapped(classifier.model().classes());
        if !unmapped.is_empty() {
            let labels: Vec<&str> = unmapped.iter().map(Intent::as_str).collect();
            return Err(ClassifierError::BuildError(format!(
                "No renderer registered for trained intents: {}",
                labels.join(", ")
            )));
        }

        Ok(Self {
            classifier,
            registry: Arc::new(registry),
            profile: Arc::new(bundle.profile),
        })
    }

    /// Trains a classifier on `classes` and pairs it with `profile`.
    ///
    /// Every intent of the closed set needs at least one training example,
    /// otherwise that intent could never be predicted and its prior is
    /// undefined.
    pub fn train(classes: Vec<ClassDefinition>, profile: Profile) -> Result<Self, ClassifierError> {
        Self::train_with_config(classes, profile, &TrainingConfig::default())
    }

    /// Same as [`Router::train`] with explicit tokenization and smoothing
    pub fn train_with_config(
        classes: Vec<ClassDefinition>,
        profile: Profile,
        config: &TrainingConfig,
    ) -> Result<Self, ClassifierError> {
        let mut builder = Classifier::builder()
            .with_vectorizer_config(config.vectorizer.clone())
            .with_smoothing(config.smoothing);
        for class in classes {
            builder = builder.add_class(class)?;
        }

        let present = builder.classes();
        let missing: Vec<&str> = Intent::ALL
            .iter()
            .filter(|intent| !present.contains(intent))
            .map(Intent::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ClassifierError::BuildError(format!(
                "Intents without training examples: {}",
                missing.join(", ")
            )));
        }

        let classifier = builder.build()?;
        info!(
            "Router trained: {} intents, {} vocabulary terms",
            classifier.model().classes().len(),
            classifier.model().n_features()
        );
        Self::new(classifier, AnswerBundle::new(profile))
    }

    /// A router trained on the built-in corpus and profile
    pub fn builtin() -> Result<Self, ClassifierError> {
        let profile = Profile::builtin().map_err(|e| {
            ClassifierError::BuildError(format!("Built-in profile is invalid: {}", e))
        })?;
        Self::train(builtin_classes(), profile)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The answers half in persistable form
    pub fn bundle(&self) -> AnswerBundle {
        AnswerBundle {
            answers_index: self.registry.answers_index().clone(),
            profile: self.profile.as_ref().clone(),
        }
    }

    /// Predicted intent for `text`. Falls back to help if classification
    /// fails, which only happens with a corrupted model.
    pub fn route(&self, text: &str) -> Intent {
        match self.classifier.predict_intent(text) {
            Ok(intent) => intent,
            Err(e) => {
                error!("Failed to classify {:?}: {}", text, e);
                Intent::Help
            }
        }
    }

    /// Predicted intent with per-class log likelihoods
    pub fn explain(&self, text: &str) -> Result<(Intent, HashMap<Intent, f64>), ClassifierError> {
        self.classifier.predict(text)
    }

    /// Answers a question. Never fails: any input, including the empty
    /// string, produces some text.
    pub fn answer(&self, text: &str) -> String {
        let intent = self.route(text);
        let key = self.registry.resolve(intent.as_str());
        debug!("Answering {:?} as {} (renderer {})", text, intent, key);
        render(key, &self.profile)
    }
}

/// Who said a line of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Transcript of one chat session.
///
/// Each session owns its own conversation; routing does not read the
/// history, so sessions never need to coordinate.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    history: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `message` and records both sides of the exchange
    pub fn ask(&mut self, router: &Router, message: &str) -> &str {
        let reply = router.answer(message);
        self.history.push(Turn { role: Role::User, content: message.to_string() });
        self.history.push(Turn { role: Role::Assistant, content: reply });
        self.history
            .last()
            .map(|turn| turn.content.as_str())
            .unwrap_or_default()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
