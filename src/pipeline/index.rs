//! Search index generation.
//!
//! Joins every published series to the chart pages that show it and to a
//! NAICS code where its id encodes one. The site searches the resulting
//! `search/search_index.json` client-side; `search/naics_names.json` turns
//! codes back into industry names.
//!
//! Series are indexed as published. Short-series filtering belongs to the
//! fetchers, so the builder never drops a series for having few points.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::Result;
use crate::models::{DataFilePages, PageInfo, SearchIndexEntry, TimeSeriesDocument};
use crate::naics::{NaicsResolver, SECTORS, SourceFamily};
use crate::storage::LocalStorage;
use crate::utils::log;

pub const SEARCH_INDEX_KEY: &str = "search/search_index.json";
pub const NAICS_NAMES_KEY: &str = "search/naics_names.json";

/// M3 ids with these metric suffixes are not displayed anywhere.
const M3_EXCLUDE: &str = r"_(MPC|IS)";

const fn page(
    page: &'static str,
    page_label: &'static str,
    section: &'static str,
    section_label: &'static str,
) -> PageInfo {
    PageInfo {
        page,
        page_label,
        section,
        section_label,
    }
}

/// Source family implied by a page section.
pub fn family_for_section(section: &str) -> SourceFamily {
    match section {
        "CES" => SourceFamily::Ces,
        "M3" => SourceFamily::M3,
        "Wholesale" => SourceFamily::Wholesale,
        "QSS" => SourceFamily::Qss,
        _ => SourceFamily::Unclassified,
    }
}

fn entry(data_file: &'static str, pages: Vec<PageInfo>) -> DataFilePages {
    let family = pages
        .first()
        .map(|p| family_for_section(p.section))
        .unwrap_or(SourceFamily::Unclassified);
    DataFilePages {
        data_file,
        family,
        pages,
    }
}

fn nipa(data_file: &'static str, html: &'static str, label: &'static str) -> DataFilePages {
    entry(data_file, vec![page(html, label, "NIPA", "NIPA Data")])
}

/// Every published data file and the pages it appears on.
pub fn data_file_pages() -> Vec<DataFilePages> {
    const CES: (&str, &str) = ("CES", "Current Employment Statistics");
    const WHOLESALE: (&str, &str) = ("Wholesale", "Monthly Wholesale Trade");
    const FED: (&str, &str) = ("FedSurveys", "Fed Regional Surveys");

    vec![
        entry(
            "ces/employees.json",
            vec![
                page("ces/employees_yoy.html", "Employees YoY", CES.0, CES.1),
                page("ces/employees_long.html", "Employees (Long)", CES.0, CES.1),
            ],
        ),
        entry(
            "ces/employees_pbs.json",
            vec![page("ces/employees_pbs.html", "Prof. & Business Services", CES.0, CES.1)],
        ),
        entry(
            "ces/payrolls.json",
            vec![page("ces/payrolls.html", "Aggregate Payrolls", CES.0, CES.1)],
        ),
        entry(
            "m3/m3.json",
            vec![page("m3/index.html", "M3 Survey", "M3", "M3 - Shipments, Inventories & Orders")],
        ),
        entry(
            "qss/qss.json",
            vec![page("qss/index.html", "Quarterly Services Survey", "QSS", "Quarterly Services Survey")],
        ),
        entry(
            "wholesale/wholesale_sales.json",
            vec![page("wholesale/sales.html", "Wholesale Sales", WHOLESALE.0, WHOLESALE.1)],
        ),
        entry(
            "wholesale/wholesale_inventory.json",
            vec![page("wholesale/inventory.html", "Wholesale Inventories", WHOLESALE.0, WHOLESALE.1)],
        ),
        entry(
            "wholesale/wholesale_ratio.json",
            vec![page("wholesale/ratio.html", "Wholesale I/S Ratio", WHOLESALE.0, WHOLESALE.1)],
        ),
        entry(
            "construction/construction.json",
            vec![page("construction/index.html", "Construction Spending", "Construction", "Construction Spending")],
        ),
        entry(
            "industrial_production/industrial_production.json",
            vec![page("industrial_production/index.html", "Industrial Production", "IP", "Industrial Production")],
        ),
        entry(
            "unemployment/unemployment.json",
            vec![page("unemployment/index.html", "Unemployment by Industry", "Unemployment", "Unemployment by Industry")],
        ),
        nipa("nipa/1bu.json", "nipa/1bu.html", "1BU - Mfg & Trade Inventories"),
        nipa("nipa/2bu.json", "nipa/2bu.html", "2BU - Mfg & Trade Sales"),
        nipa("nipa/2_4_4u.json", "nipa/2_4_4u.html", "2.4.4U - PCE Deflator"),
        nipa("nipa/2_4_5u.json", "nipa/2_4_5u.html", "2.4.5U - Nominal Spending"),
        nipa("nipa/2_4_6u.json", "nipa/2_4_6u.html", "2.4.6U - Real Spending"),
        nipa("nipa/3bu.json", "nipa/3bu.html", "3BU - Inventory-Sales Ratio"),
        nipa("nipa/3_3.json", "nipa/3_3.html", "3.3 - State & Local Govt"),
        nipa("nipa/4_2_5b.json", "nipa/4_2_5b.html", "4.2.5B - Net Exports"),
        nipa("nipa/4_2_6b.json", "nipa/4_2_6b.html", "4.2.6B - Real Imports"),
        nipa("nipa/5_3_5.json", "nipa/5_3_5.html", "5.3.5 - Nonresidential Investment"),
        nipa("nipa/5_5_5u.json", "nipa/5_5_5u.html", "5.5.5U - Equipment Spending"),
        nipa("nipa/5_7_5bu1.json", "nipa/5_7_5bu1.html", "5.7.5BU1 - Private Inventories"),
        entry(
            "fed_surveys/fed_mfg.json",
            vec![page("fed_surveys/manufacturing.html", "Manufacturing Surveys", FED.0, FED.1)],
        ),
        entry(
            "fed_surveys/fed_svc.json",
            vec![page("fed_surveys/services.html", "Services Surveys", FED.0, FED.1)],
        ),
    ]
}

/// Counters reported after a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub files_processed: usize,
    pub files_missing: Vec<String>,
    pub series: usize,
    pub naics_mapped: usize,
    pub entries: usize,
    pub naics_codes: usize,
}

/// The two search outputs.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    pub entries: Vec<SearchIndexEntry>,
    /// Code to name, sector table first, then first resolved name per code
    pub naics_names: BTreeMap<String, String>,
    pub stats: IndexStats,
}

/// Builder for the search index.
pub struct IndexBuilder<'a> {
    resolver: &'a NaicsResolver,
    m3_exclude: Regex,
    index: SearchIndex,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(resolver: &'a NaicsResolver) -> Result<Self> {
        let naics_names = SECTORS
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        Ok(Self {
            resolver,
            m3_exclude: Regex::new(M3_EXCLUDE)?,
            index: SearchIndex {
                naics_names,
                ..SearchIndex::default()
            },
        })
    }

    /// Note a registered file that has not been produced yet.
    pub fn add_missing(&mut self, data_file: &str) {
        self.index.stats.files_missing.push(data_file.to_string());
    }

    /// Index every series of one data file on each of its pages.
    pub fn add_document(&mut self, file: &DataFilePages, document: &TimeSeriesDocument) {
        self.index.stats.files_processed += 1;

        for series in &document.series {
            if file.family == SourceFamily::M3 && self.m3_exclude.is_match(&series.id) {
                continue;
            }

            let resolution = self.resolver.resolve(file.family, &series.id);
            let naics = resolution.display(&series.name);
            if let Some((code, name)) = &naics {
                self.index.stats.naics_mapped += 1;
                self.index
                    .naics_names
                    .entry(code.clone())
                    .or_insert_with(|| name.clone());
            }

            for page in &file.pages {
                self.index.entries.push(SearchIndexEntry {
                    id: series.id.clone(),
                    name: series.name.clone(),
                    section: page.section.to_string(),
                    section_label: page.section_label.to_string(),
                    page: page.page.to_string(),
                    page_label: page.page_label.to_string(),
                    data_file: file.data_file.to_string(),
                    naics: naics.as_ref().map(|(code, _)| code.clone()),
                    naics_name: naics.as_ref().map(|(_, name)| name.clone()),
                });
            }
            self.index.stats.series += 1;
        }
    }

    pub fn build(mut self) -> SearchIndex {
        self.index.stats.entries = self.index.entries.len();
        self.index.stats.naics_codes = self.index.naics_names.len();
        self.index
    }
}

/// Build the search index from everything currently in `storage` and
/// write both outputs.
pub async fn build_search_index(
    storage: &LocalStorage,
    resolver: &NaicsResolver,
) -> Result<IndexStats> {
    let mut builder = IndexBuilder::new(resolver)?;

    for file in data_file_pages() {
        match storage.load_document(file.data_file).await? {
            Some(document) => builder.add_document(&file, &document),
            None => {
                ::log::warn!("{} not found, skipping", file.data_file);
                builder.add_missing(file.data_file);
            }
        }
    }

    let index = builder.build();
    storage.write_json(SEARCH_INDEX_KEY, &index.entries).await?;
    storage
        .write_json_pretty(NAICS_NAMES_KEY, &index.naics_names)
        .await?;

    let stats = index.stats;
    log::summary(
        "Search index",
        &[
            ("Files processed", stats.files_processed.to_string()),
            ("Files missing", stats.files_missing.len().to_string()),
            ("Unique series", stats.series.to_string()),
            ("NAICS-mapped", stats.naics_mapped.to_string()),
            ("Index entries", stats.entries.to_string()),
            ("NAICS codes in lookup", stats.naics_codes.to_string()),
        ],
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Metadata, ObservationPoint, Series};
    use chrono::NaiveDate;

    fn series(id: &str, name: &str, points: usize) -> Series {
        Series {
            id: id.into(),
            name: name.into(),
            display_order: 0,
            data: (0..points)
                .map(|i| ObservationPoint {
                    date: NaiveDate::from_ymd_opt(2024, i as u32 + 1, 1).unwrap(),
                    value: Some(i as f64),
                })
                .collect(),
        }
    }

    fn document(series: Vec<Series>) -> TimeSeriesDocument {
        TimeSeriesDocument::new(
            Metadata::new("Test", "Test", "Units", Frequency::Monthly),
            series,
        )
    }

    fn registered(data_file: &str) -> DataFilePages {
        data_file_pages()
            .into_iter()
            .find(|f| f.data_file == data_file)
            .unwrap()
    }

    #[test]
    fn test_registry_families() {
        let files = data_file_pages();
        assert_eq!(files.len(), 25);
        assert_eq!(registered("ces/employees.json").pages.len(), 2);
        assert_eq!(registered("ces/employees.json").family, SourceFamily::Ces);
        assert_eq!(registered("wholesale/wholesale_ratio.json").family, SourceFamily::Wholesale);
        assert_eq!(registered("nipa/3bu.json").family, SourceFamily::Unclassified);
        assert!(files.iter().all(|f| !f.pages.is_empty()));
    }

    #[test]
    fn test_one_entry_per_page() {
        let resolver = NaicsResolver::with_builtin();
        let mut builder = IndexBuilder::new(&resolver).unwrap();
        builder.add_document(
            &registered("ces/employees.json"),
            &document(vec![series("CES0000000001", "Total nonfarm", 3)]),
        );
        let index = builder.build();

        assert_eq!(index.stats.series, 1);
        assert_eq!(index.entries.len(), 2);
        let pages: Vec<_> = index.entries.iter().map(|e| e.page.as_str()).collect();
        assert_eq!(pages, vec!["ces/employees_yoy.html", "ces/employees_long.html"]);
        // Empty CES crosswalk: no code.
        assert!(index.entries[0].naics.is_none());
    }

    #[test]
    fn test_m3_exclusions_and_resolution() {
        let resolver = NaicsResolver::with_builtin();
        let mut builder = IndexBuilder::new(&resolver).unwrap();
        builder.add_document(
            &registered("m3/m3.json"),
            &document(vec![
                series("11A_VS", "Grain and oilseed milling: Shipments", 3),
                series("11A_IS", "Grain and oilseed milling: Inventories to shipments", 3),
                series("MTM_MPC", "Total manufacturing: Percent change", 3),
                series("MTM_VS", "Total manufacturing: Shipments", 3),
            ]),
        );
        let index = builder.build();

        let ids: Vec<_> = index.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["11A_VS", "MTM_VS"]);
        assert_eq!(index.entries[0].naics.as_deref(), Some("3112"));
        assert_eq!(index.entries[0].naics_name.as_deref(), Some("Grain and Oilseed Milling"));
        // Composite: known name, no code, so nothing is attached.
        assert!(index.entries[1].naics.is_none());
        assert_eq!(index.stats.naics_mapped, 1);
        assert_eq!(index.naics_names["3112"], "Grain and Oilseed Milling");
    }

    #[test]
    fn test_sector_names_win_over_resolved_names() {
        let resolver = NaicsResolver::with_builtin();
        let mut builder = IndexBuilder::new(&resolver).unwrap();
        builder.add_document(
            &registered("wholesale/wholesale_sales.json"),
            &document(vec![series("42_SM", "Total merchant wholesalers", 3)]),
        );
        let index = builder.build();

        assert_eq!(index.naics_names["42"], "Wholesale Trade");
        assert_eq!(index.stats.naics_codes, SECTORS.len());
    }

    #[test]
    fn test_names_independent_of_file_order() {
        let resolver = NaicsResolver::with_builtin();
        let wholesale = (
            registered("wholesale/wholesale_sales.json"),
            document(vec![series("4231_SM", "Motor vehicles", 3), series("42_SM", "Total", 3)]),
        );
        let qss = (
            registered("qss/qss.json"),
            document(vec![series("5112T_QREV", "Software publishers", 3)]),
        );

        let mut forward = IndexBuilder::new(&resolver).unwrap();
        forward.add_document(&wholesale.0, &wholesale.1);
        forward.add_document(&qss.0, &qss.1);
        let mut reverse = IndexBuilder::new(&resolver).unwrap();
        reverse.add_document(&qss.0, &qss.1);
        reverse.add_document(&wholesale.0, &wholesale.1);

        assert_eq!(forward.build().naics_names, reverse.build().naics_names);
    }

    #[tokio::test]
    async fn test_build_writes_outputs_and_keeps_short_series() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage
            .save_document(
                "m3/m3.json",
                &document(vec![series("11A_VS", "Grain", 1), series("MTM_VS", "Total", 3)]),
            )
            .await
            .unwrap();

        let stats = build_search_index(&storage, &NaicsResolver::with_builtin())
            .await
            .unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_missing.len(), 24);
        assert_eq!(stats.entries, 2);

        let entries: Vec<SearchIndexEntry> =
            storage.read_json(SEARCH_INDEX_KEY).await.unwrap().unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["11A_VS", "MTM_VS"]);

        let raw = std::fs::read_to_string(dir.path().join(NAICS_NAMES_KEY)).unwrap();
        assert!(raw.contains("\n  \"11\""));
        let names: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(names["3112"], "Grain and Oilseed Milling");
    }
}
