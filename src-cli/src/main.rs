use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use realty_import::{
    default_database_path, load_config, render_summary, Database, ImportConfig, ImportRunner,
    ProgressEvent, ProgressReporter,
};

/// Imports the Houston market data CSV tree into the local database.
#[derive(Parser, Debug)]
#[command(name = "realty-import", version, about)]
struct Cli {
    /// JSON configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory holding the source folders.
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// SQLite database file.
    #[arg(long)]
    database: Option<PathBuf>,

    /// Re-import only the HAR MLS reports of this month (1-12).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

/// Prints group and category progress to stdout.
struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::GroupStarted { group } => {
                println!();
                println!("=== {} ===", group.display_name());
            }
            ProgressEvent::GroupCompleted {
                group,
                imported,
                failed,
            } => {
                println!(
                    "{} done: {} imported, {} failed",
                    group.display_name(),
                    imported,
                    failed
                );
            }
            ProgressEvent::CategoryStarted { label, .. } => {
                println!("Importing {}...", label);
            }
            ProgressEvent::CategoryCompleted {
                label,
                imported,
                failed,
                ..
            } => {
                println!("  {}: {} imported, {} failed", label, imported, failed);
            }
            ProgressEvent::FileSkipped { path, reason } => {
                println!("  skipped {}: {}", path, reason);
            }
        }
    }
}

fn init_logging() -> Result<()> {
    // Route `log` records from the store layer through tracing.
    tracing_log::LogTracer::init().context("Failed to install log bridge")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ImportConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ImportConfig::default(),
    };

    if let Some(root) = &cli.data_root {
        config.data_root = root.display().to_string();
    }
    if let Some(db) = &cli.database {
        config.database_path = Some(db.display().to_string());
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    let db_path = match &config.database_path {
        Some(path) => PathBuf::from(path),
        None => default_database_path().context("Could not determine home directory")?,
    };
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    tracing::info!(
        data_root = %config.data_root,
        database = %db_path.display(),
        "Starting realty-import v{}",
        env!("CARGO_PKG_VERSION")
    );

    let runner = ImportRunner::new(db.clone(), config);
    let progress = ConsoleProgress;
    let report = match cli.month {
        Some(month) => runner.run_har_month(month, &progress)?,
        None => runner.run_all(&progress)?,
    };

    println!();
    print!("{}", render_summary(&report));

    drop(runner);
    db.close()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging() {
        eprintln!("Warning: {:#}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Import aborted: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
