//! PII CLI - Command-line interface
//!
//! Usage:
//!   pii analyze "<text>"
//!   pii analyze --file notes.txt
//!   pii train --names data/Names.txt --output name_model.json
//!   pii predict John Delhi --model name_model.json

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pii_core::{NameClassifier, PiiDetector};
use pii_extractor::{NameModel, PiiAnalyzer};

#[derive(Parser)]
#[command(name = "pii")]
#[command(about = "PII detection and classification CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect PII in text (argument, file or stdin)
    Analyze {
        /// Text to analyze
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Names corpus used to train the name model
        #[arg(long, env = "PII_NAMES_PATH", default_value = "data/Names.txt")]
        names: PathBuf,
    },
    /// Train the name model and write its artifact
    Train {
        /// Names corpus, one name per line
        #[arg(long, env = "PII_NAMES_PATH", default_value = "data/Names.txt")]
        names: PathBuf,
        /// Artifact destination
        #[arg(short, long, env = "PII_MODEL_PATH", default_value = "name_model.json")]
        output: PathBuf,
    },
    /// Print the name probability of each word
    Predict {
        /// Words to score
        #[arg(required = true)]
        words: Vec<String>,
        /// Names corpus to train from
        #[arg(long, conflicts_with = "model")]
        names: Option<PathBuf>,
        /// Previously saved model artifact
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { text, file, names } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };

            tracing::info!(names = %names.display(), "Training name model");
            let analyzer = PiiAnalyzer::from_corpus_file(&names)?;
            let findings = analyzer.analyze_pii(&text)?;
            tracing::info!(findings = findings.len(), "Analysis complete");

            let output = serde_json::json!({ "pii_detected": findings });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Train { names, output } => {
            tracing::info!(names = %names.display(), output = %output.display(), "Training name model");
            let model = NameModel::from_corpus_file(&names)?;
            model.save(&output)?;
            println!(
                "Trained on {} names ({} terms), saved to {}",
                model.corpus_size(),
                model.vocabulary_size(),
                output.display()
            );
        }
        Commands::Predict {
            words,
            names,
            model,
        } => {
            let model = match (model, names) {
                (Some(path), _) => NameModel::load(path)?,
                (None, Some(path)) => NameModel::from_corpus_file(path)?,
                (None, None) => NameModel::from_corpus_file("data/Names.txt")?,
            };
            let words: Vec<&str> = words.iter().map(String::as_str).collect();
            for (word, prob) in model.predict(&words) {
                println!("{word}\t{prob:.4}");
            }
        }
    }

    Ok(())
}
