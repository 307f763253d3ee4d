// src/lib.rs

//! Economic data pipeline library.
//!
//! Fetches agency time series into a common JSON document shape, derives
//! filtered views and builds a NAICS-aware search index over the result.

pub mod error;
pub mod models;
pub mod naics;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
