//! CLI binary for searching the HED documentation sites.
//!
//! Results go to stdout; all tracing output goes to stderr so `--json`
//! output stays clean.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hed_docs::AppConfig;
use hed_docs::output::{JsonReport, format_results, format_sources, format_status};
use hed_search::DocSearch;
use tracing_subscriber::EnvFilter;

/// Search across all HED documentation sites.
#[derive(Parser)]
#[command(name = "hed-docs-search", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log per-query diagnostics from the search core.
    #[arg(long)]
    debug: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Load every source and search it.
    Search {
        /// Query words.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print results and load status as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Load every source and report which ones succeeded.
    Status,

    /// List configured sources without fetching anything.
    Sources,

    /// Write the effective configuration to the default (or `--config`) path.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.debug {
        config.options.enable_debug_log = true;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Command::Search { query, json } => run_search(config, &query.join(" "), json).await,
        Command::Status => run_status(config).await,
        Command::Sources => {
            print!("{}", format_sources(&config.sources));
            Ok(())
        }
        Command::InitConfig { force } => {
            let path = cli.config.unwrap_or_else(AppConfig::default_config_path);
            init_config(&config, path, force)
        }
    }
}

async fn run_search(config: AppConfig, query: &str, json: bool) -> anyhow::Result<()> {
    let search = DocSearch::new(config.search_config())?;
    tracing::info!(sources = search.sources().len(), "loading search indices");
    search.load_indices().await;

    let results = search.search(query);
    if json {
        let status = search.loading_status();
        let report = JsonReport::new(query, &results, &status);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_results(query, &results, &search.load_summary()));
    }
    Ok(())
}

async fn run_status(config: AppConfig) -> anyhow::Result<()> {
    let search = DocSearch::new(config.search_config())?;
    search.load_indices().await;
    print!("{}", format_status(search.sources(), &search.loading_status()));

    let summary = search.load_summary();
    println!(
        "{}/{} documentation source{} loaded",
        summary.loaded,
        summary.total,
        if summary.total == 1 { "" } else { "s" }
    );
    Ok(())
}

fn init_config(config: &AppConfig, path: PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config.save_to_file(&path)?;
    tracing::info!(path = %path.display(), "wrote configuration");
    println!("{}", path.display());
    Ok(())
}
