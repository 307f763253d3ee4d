//! Crosswalk files consumed by the index builder.
//!
//! The M3 table is written from the built-in crosswalk. The CES table is
//! derived from the cached `ce.industry` flat file and is skipped when the
//! CES fetcher has not run yet.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Config, NaicsMap, NaicsMapEntry};
use crate::naics::builtin_m3_map;
use crate::services::ces_crosswalk_from_industry_file;
use crate::storage::LocalStorage;
use crate::utils::log;

const M3_MAP_FILE: &str = "m3_naics_map.json";
const CES_MAP_FILE: &str = "ces_naics_map.json";
const CES_INDUSTRY_FILE: &str = "ce.industry";

/// Entries written per crosswalk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapsReport {
    pub m3_entries: usize,
    /// `None` when `ce.industry` is not cached
    pub ces_entries: Option<usize>,
}

fn sorted(map: NaicsMap) -> BTreeMap<String, NaicsMapEntry> {
    map.into_iter().collect()
}

/// Write both crosswalks into the config directory.
pub async fn build_maps(config: &Config) -> Result<MapsReport> {
    let storage = LocalStorage::new(&config.paths.config_dir);
    let mut report = MapsReport::default();

    let m3 = sorted(builtin_m3_map());
    storage.write_json_pretty(M3_MAP_FILE, &m3).await?;
    report.m3_entries = m3.len();
    log::sub_item(&format!("{}: {} codes", M3_MAP_FILE, m3.len()));

    let industry_path = config.paths.raw_dir.join(CES_INDUSTRY_FILE);
    if tokio::fs::try_exists(&industry_path).await.unwrap_or(false) {
        let ces = sorted(ces_crosswalk_from_industry_file(&industry_path).await?);
        storage.write_json_pretty(CES_MAP_FILE, &ces).await?;
        report.ces_entries = Some(ces.len());
        log::sub_item(&format!("{}: {} industries", CES_MAP_FILE, ces.len()));
    } else {
        ::log::warn!(
            "{} not cached; run `fetch ces` first to build {}",
            industry_path.display(),
            CES_MAP_FILE
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::load_naics_map;
    use crate::naics::NaicsResolver;

    #[tokio::test]
    async fn test_maps_round_trip_through_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.config_dir = dir.path().join("config");
        config.paths.raw_dir = dir.path().join("raw");
        std::fs::create_dir_all(&config.paths.raw_dir).unwrap();
        std::fs::write(
            config.paths.raw_dir.join(CES_INDUSTRY_FILE),
            "industry_code\tnaics_code\tpublishing_status\tdisplay_level\tselectable\tsort_sequence\tindustry_name\n\
             00000000\t-\tB\t0\tT\t1\tTotal nonfarm\n\
             60541500\t5415\tA\t5\tT\t400\tComputer systems design and related services\n",
        )
        .unwrap();

        let report = build_maps(&config).await.unwrap();
        assert_eq!(report.ces_entries, Some(2));
        assert!(report.m3_entries > 100);

        let resolver = NaicsResolver::load(&config.paths.ces_map(), &config.paths.m3_map())
            .await
            .unwrap();
        let resolution = resolver.resolve(crate::naics::SourceFamily::Ces, "CES6054150001");
        assert_eq!(resolution.code(), Some("5415"));
        assert!(load_naics_map(&config.paths.m3_map()).await.unwrap().unwrap().contains_key("11A"));
    }

    #[tokio::test]
    async fn test_ces_map_skipped_without_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.config_dir = dir.path().join("config");
        config.paths.raw_dir = dir.path().join("raw");

        let report = build_maps(&config).await.unwrap();
        assert_eq!(report.ces_entries, None);
        assert!(!config.paths.ces_map().exists());
    }
}
