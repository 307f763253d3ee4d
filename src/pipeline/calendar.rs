//! Release calendar refresh.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, ReleaseCalendar};
use crate::services::{CalendarBuilder, FetchContext};
use crate::storage::LocalStorage;
use crate::utils::log;

pub const CALENDAR_FILE: &str = "release_calendar.json";

/// Scrape every agency schedule and overwrite `config/release_calendar.json`.
pub async fn run_calendar(config: Arc<Config>) -> Result<ReleaseCalendar> {
    log::header("Release calendar");
    let ctx = FetchContext::new(Arc::clone(&config)).await?;
    let calendar = CalendarBuilder::new(&ctx).build().await;

    let storage = LocalStorage::new(&config.paths.config_dir);
    storage.write_json_pretty(CALENDAR_FILE, &calendar).await?;

    log::summary(
        "Release calendar",
        &[
            ("Sources", calendar.schedules.len().to_string()),
            ("Release dates", calendar.total_dates().to_string()),
            ("Written to", storage.path(CALENDAR_FILE).display().to_string()),
        ],
    );
    Ok(calendar)
}
