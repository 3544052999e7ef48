//! nbc - classify a text document as ham or spam with a Naive Bayes model.
//!
//! # Overview
//!
//! Each run trains on two labelled corpora and then scores one document:
//! - Every regular file in the ham and spam corpus directories is tokenized on
//!   whitespace and counted into a per-class frequency table
//! - The query document is scored against both tables
//! - The verdict and the intermediate numbers are printed to stdout
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐
//! │  ham corpus dir │   │ spam corpus dir │
//! └────────┬────────┘   └────────┬────────┘
//!          ▼                     ▼
//! ┌──────────────────────────────────────┐
//! │ Corpus accumulator (corpus.rs)       │ ← tokenizer.rs + frequency.rs
//! └──────────────────┬───────────────────┘
//!                    ▼
//! ┌──────────────────────────────────────┐
//! │ Classifier (classifier.rs)           │ ← query document
//! └──────────────────┬───────────────────┘
//!                    ▼
//!              SPAM / NOT spam
//! ```
//!
//! # Configuration
//!
//! Corpus directories, the stopword threshold and the worker count come from
//! the config file (see `config.rs`), never from the command line. Logs go to
//! stderr and honour `RUST_LOG`.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod classifier;
mod config;
mod corpus;
mod error;
mod frequency;
mod tokenizer;

use classifier::Classification;
use config::Config;
use corpus::{DocumentLoader, FsLoader};

#[derive(Parser, Debug)]
#[command(name = "nbc")]
#[command(about = "Naive Bayes ham/spam classifier")]
#[command(version)]
struct Args {
    /// Document to classify
    input: PathBuf,

    /// Config file to use instead of the per-user one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log per-file progress
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "nbc=debug" } else { "nbc=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Render the run summary exactly as printed on stdout.
fn render_report(input: &Path, result: &Classification, ham_docs: u64, spam_docs: u64) -> String {
    format!(
        concat!(
            "ham doc count: {}\n",
            "spam doc count: {}\n",
            "total docs: {}\n",
            "hamP: {:.6} spamP: {:.6}\n",
            "ln P(H|D): {:.6} ln P(S|D): {:.6}\n",
            "{} {}\n",
        ),
        ham_docs,
        spam_docs,
        result.priors.total_docs,
        result.priors.ham,
        result.priors.spam,
        result.ham_score,
        result.spam_score,
        input.display(),
        result.verdict,
    )
}

/// Application entry point.
///
/// # Sequence
/// 1. Parse arguments (a missing input path is a usage error)
/// 2. Load the config and the query document
/// 3. Train both classes
/// 4. Classify and print the report
///
/// # Errors
/// Any I/O failure or degenerate corpus aborts the run before the report is
/// printed.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::load_from(path).map_err(error::NbcError::from)?
        }
        None => Config::load(),
    };
    debug!(?config, "configuration");

    let loader = FsLoader;
    let document = loader.load(&args.input)?;

    let classifier = config.classifier();
    let accumulator = config.accumulator();
    debug!(
        threshold = classifier.threshold(),
        workers = accumulator.workers(),
        "training"
    );

    let (ham, spam) = corpus::train_pair(&config.ham_dir, &config.spam_dir, &accumulator, &loader)?;
    let result = classifier.classify(&document, &ham, &spam)?;
    info!(
        input = %args.input.display(),
        tokens = result.tokens,
        spam = result.verdict.is_spam(),
        "document classified"
    );

    print!("{}", render_report(&args.input, &result, ham.doc_count, spam.doc_count));
    Ok(())
}
