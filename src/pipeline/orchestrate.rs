//! Full and scheduled pipeline runs.
//!
//! This is the only place step errors are caught: each failed fetcher or
//! post-processing pass is recorded and the run continues.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, ReleaseCalendar};
use crate::services::{FetchContext, FetcherId, fetcher};
use crate::utils::log;

use super::post_process::run_post_process;
use super::schedule::{SchedulePlan, plan, to_eastern};

const POST_PROCESS_STEP: &str = "Post-processing";

/// A step that failed.
#[derive(Debug, Clone)]
pub struct StepError {
    pub step: String,
    pub message: String,
    pub elapsed: Duration,
}

/// Outcome of one orchestrated run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub steps_run: usize,
    pub errors: Vec<StepError>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, step: &str, started: Instant, outcome: Result<String>) {
        self.steps_run += 1;
        let elapsed = started.elapsed();
        match outcome {
            Ok(detail) => log::sub_item(&format!("OK {} ({}, {})", step, detail, log::elapsed(elapsed))),
            Err(e) => {
                ::log::error!("{} failed after {}: {}", step, log::elapsed(elapsed), e);
                self.errors.push(StepError {
                    step: step.to_string(),
                    message: e.to_string(),
                    elapsed,
                });
            }
        }
    }

    fn log(&self) {
        log::separator();
        log::summary(
            "Pipeline run",
            &[
                ("Steps", self.steps_run.to_string()),
                ("Errors", self.errors.len().to_string()),
                ("Elapsed", log::elapsed(self.elapsed)),
            ],
        );
        for error in &self.errors {
            ::log::error!("  {} ({}): {}", error.step, log::elapsed(error.elapsed), error.message);
        }
    }
}

async fn run_steps(config: Arc<Config>, fetchers: &[FetcherId]) -> Result<RunSummary> {
    let started = Instant::now();
    let ctx = FetchContext::new(Arc::clone(&config)).await?;
    let mut summary = RunSummary::default();
    let total = fetchers.len() + 1;

    for (i, id) in fetchers.iter().enumerate() {
        log::step(i + 1, total, id.label());
        let step_started = Instant::now();
        let outcome = fetcher(*id)
            .fetch(&ctx)
            .await
            .map(|report| match report.failures.len() {
                0 => format!("{} series", report.series_written()),
                n => format!("{} series, {} skipped", report.series_written(), n),
            });
        summary.record(id.label(), step_started, outcome);
    }

    log::step(total, total, POST_PROCESS_STEP);
    let step_started = Instant::now();
    let outcome = run_post_process(&config)
        .await
        .map(|report| format!("{} files", report.written.len()));
    summary.record(POST_PROCESS_STEP, step_started, outcome);

    summary.elapsed = started.elapsed();
    summary.log();
    Ok(summary)
}

/// Every fetcher in order, then post-processing.
pub async fn run_all(config: Arc<Config>) -> Result<RunSummary> {
    log::header("Economic data pipeline - full run");
    run_steps(config, &FetcherId::ALL).await
}

/// Run one fetcher without post-processing.
pub async fn run_single(config: Arc<Config>, id: FetcherId) -> Result<()> {
    log::header(id.label());
    let ctx = FetchContext::new(config).await?;
    let started = Instant::now();
    let report = fetcher(id).fetch(&ctx).await?;
    for (file, series) in &report.files {
        log::sub_item(&format!("{}: {} series", file, series));
    }
    for (item, reason) in &report.failures {
        ::log::warn!("  skipped {}: {}", item, reason);
    }
    ::log::info!("Done in {}", log::elapsed(started.elapsed()));
    Ok(())
}

async fn load_calendar(config: &Config) -> Result<Option<ReleaseCalendar>> {
    let path = config.paths.calendar();
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn log_plan(plan: &SchedulePlan) {
    if !plan.waiting.is_empty() {
        ::log::info!("Waiting on {} source(s) (not yet released):", plan.waiting.len());
        for waiting in &plan.waiting {
            log::sub_item(&format!("{} (releases at {})", waiting.fetcher.label(), waiting.release_label));
        }
    }
    if plan.has_work() {
        ::log::info!("{} fetcher(s) to run today:", plan.ready.len());
        for id in &plan.ready {
            log::sub_item(id.label());
        }
    } else if plan.waiting.is_empty() {
        ::log::info!("No data releases scheduled today. Nothing to do.");
        if !plan.upcoming.is_empty() {
            ::log::info!("Next upcoming releases:");
            for (date, key) in &plan.upcoming {
                log::sub_item(&format!("{}: {}", date, key));
            }
        }
    } else {
        ::log::info!("No sources ready yet. Will run on next scheduled trigger.");
    }
}

/// Run whatever the release calendar says is due now.
///
/// Without a calendar file this falls back to [`run_all`]. When nothing
/// is due no step runs, post-processing included.
pub async fn run_scheduled(config: Arc<Config>) -> Result<RunSummary> {
    let Some(calendar) = load_calendar(&config).await? else {
        ::log::warn!(
            "{} not found; running full pipeline as fallback",
            config.paths.calendar().display()
        );
        return run_all(config).await;
    };

    let now = to_eastern(Utc::now());
    let plan = plan(
        &calendar,
        now,
        config.scheduler.fetch_delay_minutes,
        config.scheduler.upcoming_count,
    );

    log::header(&format!("Scheduled update ({})", now.date()));
    ::log::info!("Current time: {} ET", now.format("%I:%M %p"));
    log_plan(&plan);

    if !plan.has_work() {
        return Ok(RunSummary::default());
    }
    run_steps(config, &plan.ready).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_summary_records_errors_and_continues() {
        let mut summary = RunSummary::default();
        summary.record("NIPA", Instant::now(), Err(AppError::MissingCredential("bea".into())));
        summary.record("M3", Instant::now(), Ok("3 series".into()));

        assert_eq!(summary.steps_run, 2);
        assert!(!summary.success());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].step, "NIPA");
        assert_eq!(summary.errors[0].message, "Missing API key 'bea' in api_keys.json");
    }

    #[test]
    fn test_empty_summary_is_success() {
        assert!(RunSummary::default().success());
    }

    #[tokio::test]
    async fn test_bad_key_file_fails_only_keyed_steps() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.config_dir = dir.path().join("config");
        config.paths.data_dir = dir.path().join("json");
        config.paths.raw_dir = dir.path().join("raw");
        std::fs::create_dir_all(&config.paths.config_dir).unwrap();
        std::fs::write(config.paths.api_keys(), "{not json").unwrap();

        let summary = run_steps(Arc::new(config), &[FetcherId::Nipa, FetcherId::M3])
            .await
            .unwrap();

        assert_eq!(summary.steps_run, 3);
        let failed: Vec<_> = summary.errors.iter().map(|e| e.step.as_str()).collect();
        assert_eq!(failed, vec![FetcherId::Nipa.label(), FetcherId::M3.label()]);
        assert!(summary.errors[0].message.contains("api_keys.json"));
    }

    #[tokio::test]
    async fn test_missing_calendar_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.config_dir = dir.path().to_path_buf();
        assert!(load_calendar(&config).await.unwrap().is_none());

        std::fs::write(config.paths.calendar(), br#"{"last_updated": "t", "schedules": {"bls": ["2025-03-07"]}}"#)
            .unwrap();
        let calendar = load_calendar(&config).await.unwrap().unwrap();
        assert_eq!(calendar.total_dates(), 1);
    }
}
