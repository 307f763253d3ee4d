//! Data fetchers, one per agency series family.
//!
//! - `CesFetcher`: BLS Current Employment Statistics flat files
//! - `NipaFetcher`: BEA NIPA underlying-detail tables
//! - `CensusFetcher`: Census EITS programs (M3, QSS, construction, wholesale)
//! - `FredFetcher`: Federal Reserve G.17 industrial production via FRED
//! - `UnemploymentFetcher`: BLS API v2 unemployment rates by industry
//! - `FedSurveyFetcher`: Philadelphia and New York Fed business surveys
//!
//! Every fetcher writes whole `TimeSeriesDocument` files and never reads
//! another fetcher's output.

mod calendar;
mod census;
mod ces;
mod fed_surveys;
mod fred;
mod ip_series;
mod nipa;
mod unemployment;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{ApiKeys, Config};
use crate::storage::{FileCache, LocalStorage};
use crate::utils::http::HttpClient;

pub use calendar::CalendarBuilder;
pub use census::{CensusFetcher, CensusProgram};
pub use ces::{CesFetcher, ces_crosswalk_from_industry_file};
pub use fed_surveys::FedSurveyFetcher;
pub use fred::FredFetcher;
pub use nipa::NipaFetcher;
pub use unemployment::UnemploymentFetcher;

/// Identifies a fetcher on the command line and in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetcherId {
    Ces,
    Nipa,
    M3,
    Qss,
    Construction,
    Wholesale,
    IndustrialProduction,
    Unemployment,
    FedSurveys,
}

impl FetcherId {
    /// Full-run order.
    pub const ALL: [FetcherId; 9] = [
        FetcherId::Ces,
        FetcherId::Nipa,
        FetcherId::M3,
        FetcherId::Qss,
        FetcherId::Construction,
        FetcherId::Wholesale,
        FetcherId::IndustrialProduction,
        FetcherId::Unemployment,
        FetcherId::FedSurveys,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Ces => "ces",
            Self::Nipa => "nipa",
            Self::M3 => "m3",
            Self::Qss => "qss",
            Self::Construction => "construction",
            Self::Wholesale => "wholesale",
            Self::IndustrialProduction => "ip",
            Self::Unemployment => "unemployment",
            Self::FedSurveys => "fed-surveys",
        }
    }

    /// Human-readable step name for logs and run summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ces => "CES Employment Data (BLS flat files)",
            Self::Nipa => "NIPA Tables (BEA API)",
            Self::M3 => "M3 Survey (Census API)",
            Self::Qss => "Quarterly Services Survey (Census API)",
            Self::Construction => "Construction Spending (Census API)",
            Self::Wholesale => "Monthly Wholesale Trade (Census API)",
            Self::IndustrialProduction => "Industrial Production (FRED API)",
            Self::Unemployment => "Unemployment by Industry (BLS API)",
            Self::FedSurveys => "Regional Fed Surveys (CSV)",
        }
    }
}

impl fmt::Display for FetcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FetcherId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|id| id.key() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|id| id.key()).collect();
                AppError::config(format!(
                    "unknown fetcher '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// What a fetcher wrote.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// `(data file key, series written)`
    pub files: Vec<(String, usize)>,
    /// `(item, reason)` for items skipped without failing the fetcher
    pub failures: Vec<(String, String)>,
}

impl FetchReport {
    pub fn record(&mut self, key: impl Into<String>, series: usize) {
        self.files.push((key.into(), series));
    }

    pub fn fail(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.failures.push((item.into(), reason.into()));
    }

    pub fn series_written(&self) -> usize {
        self.files.iter().map(|(_, n)| n).sum()
    }
}

/// Shared handles every fetcher runs with.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub config: Arc<Config>,
    pub client: HttpClient,
    pub storage: LocalStorage,
    pub cache: FileCache,
    pub keys: ApiKeys,
}

impl FetchContext {
    /// Build the shared handles. A bad key file is not an error here; it
    /// surfaces when a fetcher asks for a key.
    pub async fn new(config: Arc<Config>) -> Result<Self> {
        let client = HttpClient::new(&config.http)?;
        let storage = LocalStorage::new(&config.paths.data_dir);
        let cache = FileCache::new(
            &config.paths.raw_dir,
            Duration::from_secs(config.fetch.cache_max_age_hours * 3600),
        );
        let keys = ApiKeys::load(&config.paths.api_keys()).await;
        Ok(Self {
            config,
            client,
            storage,
            cache,
            keys,
        })
    }
}

/// One data source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    fn id(&self) -> FetcherId;

    /// Download, normalize and write this source's documents.
    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchReport>;
}

/// The fetcher behind an id.
pub fn fetcher(id: FetcherId) -> Box<dyn Fetcher> {
    match id {
        FetcherId::Ces => Box::new(CesFetcher),
        FetcherId::Nipa => Box::new(NipaFetcher),
        FetcherId::M3 => Box::new(CensusFetcher::new(&census::M3)),
        FetcherId::Qss => Box::new(CensusFetcher::new(&census::QSS)),
        FetcherId::Construction => Box::new(CensusFetcher::new(&census::CONSTRUCTION)),
        FetcherId::Wholesale => Box::new(CensusFetcher::new(&census::WHOLESALE)),
        FetcherId::IndustrialProduction => Box::new(FredFetcher),
        FetcherId::Unemployment => Box::new(UnemploymentFetcher),
        FetcherId::FedSurveys => Box::new(FedSurveyFetcher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_id_parse() {
        assert_eq!("m3".parse::<FetcherId>().unwrap(), FetcherId::M3);
        assert_eq!("IP".parse::<FetcherId>().unwrap(), FetcherId::IndustrialProduction);
        assert_eq!(
            "fed_surveys".parse::<FetcherId>().unwrap(),
            FetcherId::FedSurveys
        );
        assert!("gdp".parse::<FetcherId>().is_err());
    }

    #[test]
    fn test_registry_matches_ids() {
        for id in FetcherId::ALL {
            assert_eq!(fetcher(id).id(), id);
        }
    }

    #[test]
    fn test_report_totals() {
        let mut report = FetchReport::default();
        report.record("ces/employees.json", 10);
        report.record("ces/payrolls.json", 4);
        assert_eq!(report.series_written(), 14);
        report.fail("IPG211S", "timeout");
        assert_eq!(report.failures, vec![("IPG211S".to_string(), "timeout".to_string())]);
    }
}
