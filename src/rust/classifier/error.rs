/// Represents the different types of errors that can occur while training or
/// running the intent classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Error occurred during the build (training) phase
    #[error("Build error: {0}")]
    BuildError(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The vectorizer or model was used before it was fitted
    #[error("Not fitted: {0}")]
    NotFitted(String),
    /// A vectorizer and a model that were not trained together
    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),
}
