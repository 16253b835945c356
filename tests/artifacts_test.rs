use profile_router::{
    ArtifactError, ArtifactManager, ClassDefinition, CountVectorizer, Intent, Profile, Router,
    RouterConfig, TrainedModel,
};
use std::fs;
use tempfile::TempDir;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> (TempDir, ArtifactManager) {
    init();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let manager = ArtifactManager::new(RouterConfig::in_dir(dir.path()));
    (dir, manager)
}

#[test]
fn test_save_then_load_answers_the_same() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, manager) = setup();
    let trained = Router::builtin()?;
    manager.save(&trained)?;
    assert!(manager.is_trained());

    let loaded = manager.load()?;
    for text in ["what is your full name", "where are you from", "tools", "", "xyzzy plugh"] {
        assert_eq!(trained.answer(text), loaded.answer(text));
    }
    assert_eq!(
        trained.classifier().vocabulary_fingerprint(),
        loaded.classifier().vocabulary_fingerprint()
    );
    assert_eq!(loaded.profile(), trained.profile());
    Ok(())
}

#[test]
fn test_model_tables_survive_reload_exactly() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, manager) = setup();
    let trained = Router::builtin()?;
    manager.save(&trained)?;
    let loaded = manager.load()?;

    // Bit-for-bit equality, so near-ties break the same way after reload
    assert_eq!(trained.classifier().trained_model(), loaded.classifier().trained_model());
    for intent in Intent::ALL {
        let before = trained.classifier().model().class_log_prior(intent).unwrap();
        let after = loaded.classifier().model().class_log_prior(intent).unwrap();
        assert_eq!(before.to_bits(), after.to_bits(), "prior of {} drifted", intent);
    }
    Ok(())
}

#[test]
fn test_artifacts_are_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let (_a, first) = setup();
    let (_b, second) = setup();
    first.save(&Router::builtin()?)?;
    second.save(&Router::builtin()?)?;

    for (a, b) in first.config().artifact_paths().iter().zip(second.config().artifact_paths()) {
        assert_eq!(fs::read(a)?, fs::read(b)?, "{:?} differs", a.file_name());
    }
    Ok(())
}

#[test]
fn test_mismatched_halves_fail_to_load() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, manager) = setup();
    manager.save(&Router::builtin()?)?;

    // A vectorizer fitted on a different corpus
    let mut foreign = CountVectorizer::new();
    foreign.fit(&["something else entirely", "nothing in common"])?;
    fs::write(&manager.config().vectorizer_path, serde_json::to_string(&foreign)?)?;

    assert!(matches!(manager.load(), Err(ArtifactError::Mismatch(_))));
    Ok(())
}

#[test]
fn test_model_from_another_training_run() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, manager) = setup();
    manager.save(&Router::builtin()?)?;

    // Same intents, one extra phrase: a different vocabulary
    let mut classes = profile_router::builtin_classes();
    classes[0] = ClassDefinition::new(Intent::Greeting, "Salutations")
        .with_examples(vec!["hi", "hello", "hey", "good morning", "good evening", "howdy partner"]);
    let other = Router::train(classes, Profile::default())?;
    let model: TrainedModel = other.classifier().trained_model();
    fs::write(&manager.config().model_path, serde_json::to_string(&model)?)?;

    assert!(matches!(manager.load(), Err(ArtifactError::Mismatch(_))));
    Ok(())
}

#[test]
fn test_profile_with_wrong_types_fails_to_load() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, manager) = setup();
    manager.save(&Router::builtin()?)?;
    fs::write(
        &manager.config().answers_path,
        r#"{"answers_index": {}, "profile": {"education": "none"}}"#,
    )?;
    assert!(matches!(manager.load(), Err(ArtifactError::Serialization { .. })));
    Ok(())
}

#[test]
fn test_missing_file_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, manager) = setup();
    manager.save(&Router::builtin()?)?;
    fs::remove_file(&manager.config().answers_path)?;

    assert!(!manager.is_trained());
    match manager.load() {
        Err(ArtifactError::NotFound(path)) => assert_eq!(path, manager.config().answers_path),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn test_ensure_trained_after_removal() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, manager) = setup();
    manager.save(&Router::builtin()?)?;
    manager.remove_artifacts()?;
    assert!(!manager.is_trained());

    let router = manager.ensure_trained(Router::builtin)?;
    assert!(manager.is_trained());
    assert_eq!(router.answer("thanks"), "You're welcome!");
    Ok(())
}
