//! Storage for published documents and downloaded flat files.
//!
//! - `LocalStorage`: the JSON tree under `paths.data_dir` (and the config
//!   directory, for the release calendar and crosswalks)
//! - `FileCache`: time-limited cache of raw downloads under `paths.raw_dir`

pub mod cache;
pub mod local;

// Re-export for convenience
pub use cache::FileCache;
pub use local::LocalStorage;
