//! Pipeline entry points.
//!
//! - `run_all`: every fetcher, then post-processing
//! - `run_scheduled`: only the fetchers the release calendar says are due
//! - `run_post_process`: derived documents from fetched data
//! - `build_search_index`: search index and NAICS name lookup
//! - `run_calendar`: refresh the release calendar
//! - `build_maps`: write the NAICS crosswalk files

pub mod calendar;
pub mod index;
pub mod maps;
pub mod orchestrate;
pub mod post_process;
pub mod schedule;

pub use calendar::run_calendar;
pub use index::build_search_index;
pub use maps::build_maps;
pub use orchestrate::{RunSummary, StepError, run_all, run_scheduled, run_single};
pub use post_process::run_post_process;
