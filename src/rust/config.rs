use std::env;
use std::path::{Path, PathBuf};

use crate::classifier::{NaiveBayes, VectorizerConfig};

/// Directory override for all three artifacts
pub const HOME_ENV: &str = "PROFILE_ROUTER_HOME";
/// Per-file overrides
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";
pub const VECTORIZER_PATH_ENV: &str = "VECTORIZER_PATH";
pub const ANSWERS_PATH_ENV: &str = "ANSWERS_PATH";

pub const MODEL_FILE: &str = "model.json";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const ANSWERS_FILE: &str = "answers.json";

/// Options that shape training
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub vectorizer: VectorizerConfig,
    /// Additive smoothing for the Naive Bayes model
    pub smoothing: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerConfig::default(),
            smoothing: NaiveBayes::DEFAULT_ALPHA,
        }
    }
}

/// Where the trained artifacts live.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub answers_path: PathBuf,
    pub training: TrainingConfig,
}

impl RouterConfig {
    /// All three artifacts under `dir` with their standard file names
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model_path: dir.join(MODEL_FILE),
            vectorizer_path: dir.join(VECTORIZER_FILE),
            answers_path: dir.join(ANSWERS_FILE),
            training: TrainingConfig::default(),
        }
    }

    /// Returns the default artifacts directory path
    pub fn default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(HOME_ENV) {
            return PathBuf::from(path).join("artifacts");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("profile-router").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("profile-router").join("artifacts");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("profile-router").join("artifacts")
    }

    /// Default layout, with any of `MODEL_PATH`, `VECTORIZER_PATH` and
    /// `ANSWERS_PATH` replacing the matching file.
    pub fn from_env() -> Self {
        let mut config = Self::in_dir(Self::default_artifacts_dir());
        if let Some(path) = env::var_os(MODEL_PATH_ENV) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(path) = env::var_os(VECTORIZER_PATH_ENV) {
            config.vectorizer_path = PathBuf::from(path);
        }
        if let Some(path) = env::var_os(ANSWERS_PATH_ENV) {
            config.answers_path = PathBuf::from(path);
        }
        config
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    /// The three artifact paths, vectorizer first
    pub fn artifact_paths(&self) -> [&Path; 3] {
        [&self.vectorizer_path, &self.model_path, &self.answers_path]
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::in_dir(Self::default_artifacts_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_layout() {
        let config = RouterConfig::in_dir("/srv/router");
        assert_eq!(config.model_path, PathBuf::from("/srv/router/model.json"));
        assert_eq!(config.vectorizer_path, PathBuf::from("/srv/router/vectorizer.json"));
        assert_eq!(config.answers_path, PathBuf::from("/srv/router/answers.json"));
        assert_eq!(config.training, TrainingConfig::default());
    }

    // Single test touching the environment so parallel tests don't race on it
    #[test]
    fn test_environment_overrides() {
        env::set_var(HOME_ENV, "/tmp/router-home");
        let dir = RouterConfig::default_artifacts_dir();
        assert_eq!(dir, PathBuf::from("/tmp/router-home/artifacts"));

        env::set_var(ANSWERS_PATH_ENV, "/tmp/elsewhere/answers.json");
        let config = RouterConfig::from_env();
        assert_eq!(config.answers_path, PathBuf::from("/tmp/elsewhere/answers.json"));
        assert_eq!(config.model_path, PathBuf::from("/tmp/router-home/artifacts/model.json"));

        env::remove_var(ANSWERS_PATH_ENV);
        env::remove_var(HOME_ENV);
        let dir = RouterConfig::default_artifacts_dir();
        assert!(dir.ends_with("profile-router/artifacts"));
    }
}
