use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use menopause::{
    DEFAULT_DATA_PATH, DEFAULT_N_TREES, DEFAULT_OUTPUT_DIR, DEFAULT_SEED, DEFAULT_TEST_FRACTION,
    TrainingConfig, TrainingOutcome, train,
};

#[derive(Parser)]
#[command(name = "menopause")]
#[command(about = "Train a menopause stage classifier and save its artifacts")]
#[command(version)]
struct Cli {
    /// Path to the clinical CSV file
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Directory the model, scaler and label encoder are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Fraction of each stage held out for evaluation
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Number of trees in the Random Forest
    #[arg(long, default_value_t = DEFAULT_N_TREES)]
    n_trees: usize,

    /// RNG seed for the split and the forest
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Print a JSON run summary instead of plain lines
    #[arg(long)]
    json: bool,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, conflicts_with = "json")]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Text printed to stdout after a successful run, or `None` under `--quiet`.
fn summary(cli: &Cli, outcome: &TrainingOutcome, output_dir: &Path) -> Result<Option<String>> {
    if cli.quiet {
        return Ok(None);
    }
    if cli.json {
        return Ok(Some(serde_json::to_string_pretty(outcome)?));
    }
    let names: Vec<String> = outcome.artifacts.iter().map(|p| file_name(p)).collect();
    Ok(Some(format!(
        "Model Accuracy: {:.2}%\nSaved {} to {}",
        outcome.accuracy * 100.0,
        names.join(", "),
        output_dir.display()
    )))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let config = TrainingConfig::new(&cli.data, &cli.output_dir)
        .with_test_fraction(cli.test_fraction)?
        .with_n_trees(cli.n_trees)?
        .with_seed(cli.seed);

    let outcome = train(&config)
        .with_context(|| format!("training on {} failed", cli.data.display()))?;

    if let Some(text) = summary(&cli, &outcome, config.output_dir())? {
        println!("{text}");
    }

    Ok(())
}
