use profile_router::{
    builtin_classes, ArtifactManager, Conversation, Profile, Router, RouterConfig, QUICK_QUESTIONS,
};
use anyhow::Context;
use log::{info, warn};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the trained artifacts (overrides the environment)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    /// Profile JSON used when training (defaults to the built-in profile).
    /// Existing artifacts keep the profile they were trained with.
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on the built-in corpus and write the artifacts
    Train {
        /// Remove existing artifacts before training
        #[arg(short, long)]
        fresh: bool,
    },
    /// Answer a single question
    Ask {
        text: Vec<String>,
        /// Print the predicted intent and per-class scores
        #[arg(short, long)]
        verbose: bool,
    },
    /// Interactive session on stdin
    Chat,
}

fn load_profile(path: Option<&PathBuf>) -> anyhow::Result<Profile> {
    match path {
        Some(path) => Profile::from_file(path)
            .with_context(|| format!("Failed to read profile from {}", path.display())),
        None => Profile::builtin().context("Built-in profile is invalid"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.artifacts {
        Some(dir) => RouterConfig::in_dir(dir),
        None => RouterConfig::from_env(),
    };
    let manager = ArtifactManager::new(config);
    let profile_given = args.profile.is_some();
    let profile = load_profile(args.profile.as_ref())?;
    let training = manager.config().training.clone();
    let train = move || {
        let start = Instant::now();
        let router = Router::train_with_config(builtin_classes(), profile, &training);
        info!("Training took {:.2?}", start.elapsed());
        router
    };

    match args.command {
        Command::Train { fresh } => {
            if fresh {
                info!("Fresh training requested - removing any existing artifacts...");
                manager.remove_artifacts()?;
            }
            let router = train()?;
            manager.save(&router)?;
            let info = router.classifier().info();
            println!(
                "Trained {} intents over {} terms (vocabulary {})",
                info.num_classes, info.vocabulary_size, info.vocabulary_fingerprint
            );
        }
        Command::Ask { text, verbose } => {
            warn_if_profile_ignored(&manager, profile_given);
            let router = manager.ensure_trained(train)?;
            let text = text.join(" ");
            if verbose {
                print_scores(&router, &text)?;
            }
            println!("{}", router.answer(&text));
        }
        Command::Chat => {
            warn_if_profile_ignored(&manager, profile_given);
            let router = manager.ensure_trained(train)?;
            chat(&router)?;
        }
    }

    Ok(())
}

fn warn_if_profile_ignored(manager: &ArtifactManager, profile_given: bool) {
    if profile_given && manager.is_trained() {
        warn!("--profile is ignored: answering from the profile stored with the trained artifacts (run `train` to replace it)");
    }
}

fn print_scores(router: &Router, text: &str) -> anyhow::Result<()> {
    let (intent, scores) = router.explain(text)?;
    let mut scores: Vec<_> = scores.into_iter().collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("Predicted intent: {}", intent);
    println!("Log likelihoods (sorted):");
    for (label, score) in scores {
        println!("  {:<20} {:>10.3}", label, score);
    }
    Ok(())
}

fn chat(router: &Router) -> anyhow::Result<()> {
    let mut conversation = Conversation::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", router.answer("hello"));
    println!("Type /topics for suggestions, /clear to reset, /quit to exit.");

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                conversation.clear();
                println!("(history cleared)");
            }
            "/topics" => {
                for (question, _) in QUICK_QUESTIONS {
                    println!("  {}", question);
                }
            }
            message => println!("{}", conversation.ask(router, message)),
        }
    }

    info!("Session ended after {} turns", conversation.history().len());
    Ok(())
}
