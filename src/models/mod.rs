// src/models/mod.rs

//! Domain models for the pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod calendar;
mod config;
mod keys;
mod naics;
mod search;
mod series;

// Re-export all public types
pub use calendar::ReleaseCalendar;
pub use config::{
    Config, FetchConfig, HttpConfig, PathsConfig, RateLimitConfig, SchedulerConfig,
};
pub use keys::ApiKeys;
pub use naics::{NaicsMap, NaicsMapEntry, load_naics_map};
pub use search::{DataFilePages, PageInfo, SearchIndexEntry};
pub use series::{
    Frequency, MIN_OBSERVATIONS, Metadata, ObservationPoint, Series, SeriesAccumulator,
    TimeSeriesDocument, renumber,
};
