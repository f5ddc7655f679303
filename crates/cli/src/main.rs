use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tripmind_core::{EngineConfig, EngineOutcome, KnowledgeCategory};
use tripmind_engine::LocalEngine;
use tripmind_knowledge::KnowledgeStore;
use tripmind_ml::{load_training_corpus, TfidfIntentClassifier, TrainingConfig};
use tripmind_observability::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "tripmind")]
#[command(about = "Tripmind local intelligence engine CLI")]
struct Cli {
    #[arg(long, default_value = "kb")]
    data_root: PathBuf,

    #[arg(long, default_value_t = 0.25)]
    threshold: f32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat against the local engine.
    Chat {
        #[arg(long, default_value = "cli-user")]
        user: String,
    },
    /// One-shot classification with the full probability distribution.
    Classify { text: String },
    /// Knowledge-base lookup by category and topic tags.
    Kb {
        category: String,
        tags: Vec<String>,
    },
}

fn main() -> Result<()> {
    init_tracing("tripmind_cli");
    let cli = Cli::parse();

    let config = EngineConfig {
        confidence_threshold: cli.threshold,
        ..EngineConfig::default()
    };

    match cli.command {
        Command::Chat { user } => {
            let engine = LocalEngine::from_data_dir(&cli.data_root, config)?;
            run_chat(&engine, &user)?;
        }
        Command::Classify { text } => {
            let examples = load_training_corpus(cli.data_root.join("training"))?;
            let classifier = TfidfIntentClassifier::train(&examples, &TrainingConfig::default())
                .context("intent model training failed")?;

            let mut distribution = classifier.distribution(&text);
            distribution.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
            for (intent, probability) in distribution {
                println!("{:<16} {:.4}", intent.as_label(), probability);
            }
        }
        Command::Kb { category, tags } => {
            let category = KnowledgeCategory::parse(&category)
                .with_context(|| format!("unknown knowledge category: {category}"))?;
            let store =
                KnowledgeStore::from_file(cli.data_root.join("knowledge/knowledge_base.json"))?;

            let tags = tags.iter().map(String::as_str).collect::<Vec<_>>();
            let entry = store.lookup(category, &tags)?;
            println!("{}", serde_json::to_string_pretty(entry)?);
        }
    }

    Ok(())
}

fn run_chat(engine: &LocalEngine, user: &str) -> Result<()> {
    println!("Tripmind chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            continue;
        }

        match engine.evaluate(user, message) {
            EngineOutcome::Handled {
                reply,
                intent,
                confidence,
            } => {
                println!("\n{reply}");
                println!("[{} @ {confidence:.2}]\n", intent.as_label());
            }
            EngineOutcome::Deferred { confidence } => {
                println!(
                    "\n(no local answer at confidence {confidence:.2}; this is where the remote fallback takes over)\n"
                );
            }
        }
    }

    let snapshot = engine.metrics().snapshot();
    println!(
        "session: {} queries, {} handled, {} deferred",
        snapshot.queries_total, snapshot.handled_total, snapshot.deferred_total
    );

    Ok(())
}
