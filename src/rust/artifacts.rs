use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::classifier::{Classifier, ClassifierError, CountVectorizer, TrainedModel};
use crate::config::RouterConfig;
use crate::router::{AnswerBundle, Router};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to (de)serialize {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Artifacts do not belong together: {0}")]
    Mismatch(String),
    #[error(transparent)]
    Classifier(ClassifierError),
}

impl From<ClassifierError> for ArtifactError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::ArtifactMismatch(msg) => ArtifactError::Mismatch(msg),
            other => ArtifactError::Classifier(other),
        }
    }
}

/// Saves and loads the three artifacts a router is made of: the fitted
/// vectorizer, the trained model and the answers bundle.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    config: RouterConfig,
}

impl ArtifactManager {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Creates a manager for the locations named by the environment
    pub fn new_default() -> Self {
        Self::new(RouterConfig::from_env())
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        log::info!("Checking for trained artifacts:");
        let mut all = true;
        for path in self.config.artifact_paths() {
            let exists = path.exists();
            log::info!("  {:?} (exists: {})", path, exists);
            all &= exists;
        }
        all
    }

    /// Writes all three artifacts, creating parent directories as needed
    pub fn save(&self, router: &Router) -> Result<(), ArtifactError> {
        let classifier = router.classifier();
        write_json(&self.config.vectorizer_path, classifier.vectorizer())?;
        write_json(&self.config.model_path, &classifier.trained_model())?;
        write_json(&self.config.answers_path, &router.bundle())?;
        log::info!(
            "Saved artifacts (vocabulary {})",
            classifier.vocabulary_fingerprint()
        );
        Ok(())
    }

    /// Loads the three artifacts and assembles a router.
    ///
    /// # Errors
    /// - `NotFound` if any artifact is missing
    /// - `Mismatch` if the vectorizer and model were not trained together
    /// - `Classifier` if the answers index leaves a trained intent unmapped
    pub fn load(&self) -> Result<Router, ArtifactError> {
        let vectorizer: CountVectorizer = read_json(&self.config.vectorizer_path)?;
        let trained: TrainedModel = read_json(&self.config.model_path)?;
        let bundle: AnswerBundle = read_json(&self.config.answers_path)?;

        let classifier = Classifier::from_parts(vectorizer, trained)?;
        let router = Router::new(classifier, bundle)?;
        log::info!(
            "Loaded router with {} intents and {} vocabulary terms",
            router.classifier().model().classes().len(),
            router.classifier().model().n_features()
        );
        Ok(router)
    }

    pub fn remove_artifacts(&self) -> Result<(), ArtifactError> {
        for path in self.config.artifact_paths() {
            if path.exists() {
                log::info!("Removing {:?}", path);
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Loads the router, training and saving it first when any artifact is
    /// missing.
    pub fn ensure_trained<F>(&self, train: F) -> Result<Router, ArtifactError>
    where
        F: FnOnce() -> Result<Router, ClassifierError>,
    {
        if !self.is_trained() {
            log::info!("Artifacts not found, training...");
            let router = train()?;
            self.save(&router)?;
            return Ok(router);
        }
        self.load()
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| ArtifactError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Writing {} bytes to {:?}", json.len(), path);
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ArtifactError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&json).map_err(|source| ArtifactError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}
