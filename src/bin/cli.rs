//! econdata CLI
//!
//! Local and cron entry point for every pipeline operation.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use econdata::{
    error::Result,
    models::Config,
    naics::NaicsResolver,
    pipeline::{self, RunSummary},
    services::FetcherId,
    storage::LocalStorage,
};

/// econdata - US economic data pipeline
#[derive(Parser, Debug)]
#[command(
    name = "econdata",
    version,
    about = "Fetch, normalize and index US economic time series"
)]
struct Cli {
    /// Path to the pipeline configuration file
    #[arg(short, long, default_value = "config/pipeline.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every fetcher, then post-processing
    RunAll,

    /// Run only the fetchers whose release is due today
    RunScheduled,

    /// Run a single fetcher
    Fetch {
        /// ces, nipa, m3, qss, construction, wholesale, ip, unemployment or fed-surveys
        source: FetcherId,
    },

    /// Rebuild derived documents from fetched data
    PostProcess,

    /// Build the search index and NAICS name lookup
    BuildIndex,

    /// Refresh the release calendar from agency schedules
    Calendar,

    /// Write the NAICS crosswalk files
    BuildMaps,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn exit_for(summary: &RunSummary) -> ExitCode {
    if summary.success() {
        ExitCode::SUCCESS
    } else {
        log::error!("{} step(s) failed", summary.errors.len());
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load_or_default(&cli.config);
    let config = Arc::new(config);

    match cli.command {
        Command::RunAll => {
            let summary = pipeline::run_all(Arc::clone(&config)).await?;
            return Ok(exit_for(&summary));
        }

        Command::RunScheduled => {
            let summary = pipeline::run_scheduled(Arc::clone(&config)).await?;
            return Ok(exit_for(&summary));
        }

        Command::Fetch { source } => {
            pipeline::run_single(Arc::clone(&config), source).await?;
        }

        Command::PostProcess => {
            let report = pipeline::run_post_process(&config).await?;
            log::info!(
                "Post-processing complete: {} written, {} skipped",
                report.written.len(),
                report.skipped.len()
            );
        }

        Command::BuildIndex => {
            let resolver = NaicsResolver::load(&config.paths.ces_map(), &config.paths.m3_map()).await?;
            let storage = LocalStorage::new(&config.paths.data_dir);
            pipeline::build_search_index(&storage, &resolver).await?;
        }

        Command::Calendar => {
            pipeline::run_calendar(Arc::clone(&config)).await?;
        }

        Command::BuildMaps => {
            let report = pipeline::build_maps(&config).await?;
            log::info!(
                "Crosswalks written: {} M3 codes, CES {}",
                report.m3_entries,
                report
                    .ces_entries
                    .map_or_else(|| "skipped".to_string(), |n| format!("{n} industries"))
            );
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());
            config.validate()?;
            log::info!("✓ Config OK");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
