//! BLS Current Employment Statistics from the bulk flat files.
//!
//! One download of `ce.data.0.AllCESSeries` replaces hundreds of API calls.
//! Files are tab-separated with padded cells and cached for
//! `fetch.cache_max_age_hours`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Frequency, Metadata, NaicsMap, NaicsMapEntry, SeriesAccumulator, TimeSeriesDocument};
use crate::services::{FetchContext, FetchReport, Fetcher, FetcherId};
use crate::utils::{parse_number, period};

const BLS_FLAT_FILES: &str = "https://download.bls.gov/pub/time.series/ce/";
const SERIES_FILE: &str = "ce.series";
const INDUSTRY_FILE: &str = "ce.industry";
const DATATYPE_FILE: &str = "ce.datatype";
const DATA_FILE: &str = "ce.data.0.AllCESSeries";

const EMPLOYEES: &str = "01";
const PAYROLLS: &str = "11";

const EMPLOYEES_OUTPUT: &str = "ces/employees.json";
const PAYROLLS_OUTPUT: &str = "ces/payrolls.json";

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

#[derive(Debug, Deserialize)]
struct SeriesRow {
    series_id: String,
    industry_code: String,
    data_type_code: String,
    seasonal: String,
}

#[derive(Debug, Deserialize)]
struct IndustryRow {
    industry_code: String,
    #[serde(default)]
    naics_code: String,
    industry_name: String,
}

#[derive(Debug, Deserialize)]
struct DataTypeRow {
    data_type_code: String,
    data_type_text: String,
}

#[derive(Debug, Deserialize)]
struct DataRow {
    series_id: String,
    year: String,
    period: String,
    value: String,
}

/// A series selected for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CesSeries {
    pub industry_code: String,
    pub data_type: String,
}

/// Seasonally adjusted employee and payroll series from `ce.series`.
pub fn select_series<R: Read>(reader: R) -> Result<HashMap<String, CesSeries>> {
    let mut selected = HashMap::new();
    for row in tsv_reader(reader).deserialize::<SeriesRow>() {
        let row = row?;
        let wanted_type = row.data_type_code == EMPLOYEES || row.data_type_code == PAYROLLS;
        if wanted_type && row.seasonal == "S" && row.series_id.starts_with("CES") {
            selected.insert(
                row.series_id,
                CesSeries {
                    industry_code: row.industry_code,
                    data_type: row.data_type_code,
                },
            );
        }
    }
    Ok(selected)
}

/// `industry_code -> (naics_code, industry_name)` from `ce.industry`.
pub fn read_industries<R: Read>(reader: R) -> Result<NaicsMap> {
    let mut industries = NaicsMap::new();
    for row in tsv_reader(reader).deserialize::<IndustryRow>() {
        let row = row?;
        let naics = if row.naics_code.is_empty() {
            "-".to_string()
        } else {
            row.naics_code
        };
        industries.insert(row.industry_code, NaicsMapEntry::new(naics, row.industry_name));
    }
    Ok(industries)
}

fn read_data_types<R: Read>(reader: R) -> Result<HashMap<String, String>> {
    tsv_reader(reader)
        .deserialize::<DataTypeRow>()
        .map(|row| row.map(|r| (r.data_type_code, r.data_type_text)).map_err(AppError::from))
        .collect()
}

/// Employee and payroll series assembled from the data file.
#[derive(Debug)]
pub struct CesSeriesSet {
    pub employees: SeriesAccumulator<(String, String)>,
    pub payrolls: SeriesAccumulator<(String, String)>,
    pub rows_read: usize,
    pub rows_matched: usize,
}

/// Stream the data file, keeping rows of selected series.
///
/// Series are keyed by `(industry_code, series_id)` so output follows the
/// BLS industry hierarchy.
pub fn read_observations<R: Read>(
    reader: R,
    selected: &HashMap<String, CesSeries>,
    industries: &NaicsMap,
) -> Result<CesSeriesSet> {
    let mut set = CesSeriesSet {
        employees: SeriesAccumulator::new(),
        payrolls: SeriesAccumulator::new(),
        rows_read: 0,
        rows_matched: 0,
    };

    for row in tsv_reader(reader).deserialize::<DataRow>() {
        let row = row?;
        set.rows_read += 1;
        let Some(series) = selected.get(&row.series_id) else {
            continue;
        };
        set.rows_matched += 1;
        let Some(date) = period::bls_period(&row.year, &row.period) else {
            continue;
        };

        let name = industries
            .get(&series.industry_code)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| format!("Industry {}", series.industry_code));
        let target = if series.data_type == EMPLOYEES {
            &mut set.employees
        } else {
            &mut set.payrolls
        };
        target.push(
            (series.industry_code.clone(), row.series_id.clone()),
            row.series_id,
            name,
            date,
            parse_number(&row.value),
        );
    }
    Ok(set)
}

/// CES establishment crosswalk built from a cached `ce.industry` file.
pub async fn ces_crosswalk_from_industry_file(path: &Path) -> Result<NaicsMap> {
    let bytes = tokio::fs::read(path).await?;
    read_industries(bytes.as_slice())
}

/// BLS CES fetcher.
pub struct CesFetcher;

impl CesFetcher {
    async fn ensure_file(&self, ctx: &FetchContext, name: &str) -> Result<PathBuf> {
        if let Some(path) = ctx.cache.fresh(name).await {
            log::info!("  Using cached {}", name);
            return Ok(path);
        }
        let url = url::Url::parse(BLS_FLAT_FILES)?.join(name)?;
        log::info!("  Downloading {}...", url);
        let bytes = ctx.client.bytes(ctx.client.get(url.as_str())).await?;
        log::info!("  Saved {} ({:.1} MB)", name, bytes.len() as f64 / (1024.0 * 1024.0));
        ctx.cache.store(name, &bytes).await
    }
}

#[async_trait]
impl Fetcher for CesFetcher {
    fn id(&self) -> FetcherId {
        FetcherId::Ces
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchReport> {
        let series_path = self.ensure_file(ctx, SERIES_FILE).await?;
        let industry_path = self.ensure_file(ctx, INDUSTRY_FILE).await?;
        let datatype_path = self.ensure_file(ctx, DATATYPE_FILE).await?;
        let data_path = self.ensure_file(ctx, DATA_FILE).await?;

        // Parsing the data file is CPU bound; keep it off the async workers.
        let set = tokio::task::spawn_blocking(move || -> Result<CesSeriesSet> {
            let selected = select_series(File::open(&series_path)?)?;
            let industries = read_industries(File::open(&industry_path)?)?;
            let data_types = read_data_types(File::open(&datatype_path)?)?;
            for code in [EMPLOYEES, PAYROLLS] {
                let count = selected.values().filter(|s| s.data_type == code).count();
                let text = data_types.get(code).map(String::as_str).unwrap_or("unknown");
                log::info!("  Type {} ({}): {} SA series", code, text, count);
            }
            read_observations(File::open(&data_path)?, &selected, &industries)
        })
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))??;

        log::info!(
            "  Read {} rows, matched {}",
            set.rows_read,
            set.rows_matched
        );

        let mut report = FetchReport::default();
        let outputs = [
            (EMPLOYEES_OUTPUT, "Employees on nonfarm payrolls", "Thousands", set.employees),
            (PAYROLLS_OUTPUT, "Aggregate weekly payrolls", "Millions of dollars", set.payrolls),
        ];
        for (key, title, unit, acc) in outputs {
            let metadata = Metadata::new(
                title,
                "BLS Current Employment Statistics",
                unit,
                Frequency::Monthly,
            );
            let document = TimeSeriesDocument::new(metadata, acc.finish());
            ctx.storage.save_document(key, &document).await?;
            report.record(key, document.series.len());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERIES: &str = "series_id\tsupersector_code\tindustry_code\tdata_type_code\tseasonal\tseries_title\n\
CES0000000001 \t00\t00000000\t01\tS\tAll employees\n\
CEU0000000001 \t00\t00000000\t01\tU\tAll employees NSA\n\
CES3000000001 \t30\t30000000\t01\tS\tManufacturing\n\
CES3000000011 \t30\t30000000\t11\tS\tManufacturing payrolls\n\
CES3000000003 \t30\t30000000\t03\tS\tHourly earnings\n";

    const INDUSTRY: &str = "industry_code\tnaics_code\tpublishing_status\tdisplay_level\tselectable\tsort_sequence\tindustry_name\n\
00000000\t-\tB\t0\tT\t1\tTotal nonfarm\n\
30000000\t31-33\tA\t2\tT\t2\tManufacturing\n";

    const DATA: &str = "series_id\tyear\tperiod\tvalue\tfootnote_codes\n\
CES0000000001 \t2024\tM02\t  158000\t\n\
CES0000000001 \t2024\tM01\t  157900\t\n\
CES0000000001 \t2024\tM13\t  158100\t\n\
CES3000000001 \t2024\tM01\t  12900\t\n\
CES3000000001 \t2024\tM02\t  12910\t\n\
CES3000000011 \t2024\tM01\t  30000\t\n\
CES3000000003 \t2024\tM01\t  33.1\t\n\
CEU0000000001 \t2024\tM01\t  1\t\n";

    #[test]
    fn test_select_series_filters() {
        let selected = select_series(SERIES.as_bytes()).unwrap();
        let mut ids: Vec<_> = selected.keys().cloned().collect();
        ids.sort();
        assert_eq!(ids, vec!["CES0000000001", "CES3000000001", "CES3000000011"]);
        assert_eq!(selected["CES3000000011"].data_type, "11");
    }

    #[test]
    fn test_observations_split_and_named() {
        let selected = select_series(SERIES.as_bytes()).unwrap();
        let industries = read_industries(INDUSTRY.as_bytes()).unwrap();
        let set = read_observations(DATA.as_bytes(), &selected, &industries).unwrap();

        assert_eq!(set.rows_read, 8);
        assert_eq!(set.rows_matched, 6);

        let employees = set.employees.finish();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].id, "CES0000000001");
        assert_eq!(employees[0].name, "Total nonfarm");
        assert_eq!(employees[0].data.len(), 2);
        assert_eq!(employees[0].data[0].value, Some(157900.0));
        assert_eq!(employees[1].name, "Manufacturing");

        // A single payroll observation is not enough for a series.
        assert!(set.payrolls.finish().is_empty());
    }

    #[test]
    fn test_unknown_industry_gets_placeholder_name() {
        let selected = select_series(SERIES.as_bytes()).unwrap();
        let set = read_observations(DATA.as_bytes(), &selected, &NaicsMap::new()).unwrap();
        let employees = set.employees.finish();
        assert_eq!(employees[0].name, "Industry 00000000");
    }

    #[test]
    fn test_industry_crosswalk() {
        let industries = read_industries(INDUSTRY.as_bytes()).unwrap();
        assert_eq!(industries["00000000"].naics, "-");
        assert_eq!(industries["30000000"].naics, "31-33");
        assert_eq!(industries["30000000"].name, "Manufacturing");
    }
}
