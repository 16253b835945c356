//! A deterministic intent router that answers questions about a personal
//! profile. Text is turned into n-gram counts, a multinomial Naive Bayes
//! model picks one intent of a closed set, and a pure renderer composes the
//! answer from the profile.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use profile_router::{Intent, Router};
//!
//! let router = Router::builtin()?;
//!
//! assert_eq!(router.route("where are you from"), Intent::Origin);
//! println!("{}", router.answer("where are you from"));
//!
//! // Anything at all gets an answer
//! assert!(!router.answer("").is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The router is immutable and can be shared across threads using `Arc`:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use profile_router::Router;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let router = Arc::new(Router::builtin()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let router = Arc::clone(&router);
//!     handles.push(thread::spawn(move || router.answer("thanks")));
//! }
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), "You're welcome!");
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod intent;
pub mod profile;
pub mod render;
pub mod corpus;
pub mod router;
pub mod config;
pub mod artifacts;

pub use classifier::{
    Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, ClassDefinition,
    CountVectorizer, FeatureVector, NaiveBayes, TrainedModel, VectorizerConfig, Vocabulary,
};
pub use intent::Intent;
pub use profile::Profile;
pub use render::{render, renderer_for, Renderer, RendererRegistry};
pub use corpus::{builtin_classes, QUICK_QUESTIONS};
pub use router::{AnswerBundle, Conversation, Role, Router, Turn};
pub use config::{RouterConfig, TrainingConfig};
pub use artifacts::{ArtifactError, ArtifactManager};

pub fn init_logger() {
    env_logger::init();
}
