//! BEA National Income and Product Accounts tables.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Frequency, Metadata, SeriesAccumulator, TimeSeriesDocument};
use crate::services::{FetchContext, FetchReport, Fetcher, FetcherId};
use crate::storage::LocalStorage;
use crate::utils::{http, parse_number, period};

const BEA_URL: &str = "https://apps.bea.gov/api/data/";

/// One published NIPA table.
#[derive(Debug, Clone, Copy)]
pub struct NipaTable {
    /// Output file stem under `nipa/`
    pub key: &'static str,
    pub dataset: &'static str,
    pub table: &'static str,
    pub frequency: Frequency,
    pub title: &'static str,
    pub unit: &'static str,
}

impl NipaTable {
    pub fn output(&self) -> String {
        format!("nipa/{}.json", self.key)
    }

    fn frequency_code(&self) -> &'static str {
        match self.frequency {
            Frequency::Monthly => "M",
            Frequency::Quarterly => "Q",
        }
    }
}

const fn table(
    key: &'static str,
    dataset: &'static str,
    table: &'static str,
    frequency: Frequency,
    title: &'static str,
    unit: &'static str,
) -> NipaTable {
    NipaTable {
        key,
        dataset,
        table,
        frequency,
        title,
        unit,
    }
}

const UNDERLYING: &str = "NIUnderlyingDetail";

pub static NIPA_TABLES: &[NipaTable] = &[
    table("1bu", UNDERLYING, "U001B", Frequency::Monthly, "Manufacturing and trade inventories", "Millions of dollars"),
    table("2_4_4u", UNDERLYING, "U20404", Frequency::Monthly, "PCE price indexes (deflator)", "Index"),
    table("2_4_5u", UNDERLYING, "U20405", Frequency::Monthly, "Personal consumption expenditures (nominal)", "Millions of dollars"),
    table("2_4_6u", UNDERLYING, "U20406", Frequency::Monthly, "Personal consumption expenditures (real)", "Millions of chained dollars"),
    table("2bu", UNDERLYING, "U002BU", Frequency::Monthly, "Manufacturing and trade sales", "Millions of dollars"),
    table("3bu", UNDERLYING, "U003BU", Frequency::Monthly, "Manufacturing and trade inventory-sales ratio", "Ratio"),
    table("3_3", "NIPA", "T30300", Frequency::Quarterly, "State and local government current receipts and expenditures", "Billions of dollars"),
    table("4_2_5b", "NIPA", "T40205B", Frequency::Quarterly, "Exports and imports of goods by type (nominal)", "Millions of dollars"),
    table("4_2_6b", "NIPA", "T40206B", Frequency::Quarterly, "Exports and imports of goods by type (real)", "Millions of chained dollars"),
    table("5_3_5", "NIPA", "T50305", Frequency::Quarterly, "Private fixed investment by type", "Billions of dollars"),
    table("5_5_5u", UNDERLYING, "U50505", Frequency::Quarterly, "Private fixed investment in equipment", "Millions of dollars"),
    table("5_7_5bu1", UNDERLYING, "U50705BU1", Frequency::Quarterly, "Change in private inventories", "Millions of dollars"),
];

#[derive(Debug, Deserialize)]
struct BeaEnvelope {
    #[serde(rename = "BEAAPI")]
    api: BeaApi,
}

#[derive(Debug, Deserialize)]
struct BeaApi {
    #[serde(rename = "Results", default)]
    results: Option<BeaResults>,
    #[serde(rename = "Error", default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct BeaResults {
    #[serde(rename = "Data", default)]
    data: Vec<BeaRow>,
    #[serde(rename = "Error", default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BeaRow {
    #[serde(default)]
    line_number: String,
    #[serde(default)]
    line_description: String,
    time_period: String,
    #[serde(default)]
    data_value: String,
}

/// Human-readable text of a BEA error object (or list of them).
fn error_text(error: &Value) -> String {
    let first = match error {
        Value::Array(items) => items.first().unwrap_or(error),
        other => other,
    };
    first
        .get("APIErrorDescription")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| first.to_string())
}

/// Parse a `GetData` response for one table.
///
/// Lines are ordered by numeric line number; non-numeric line numbers sort
/// last. Series ids are `{table}_{line}`.
pub fn parse_table(def: &NipaTable, body: &[u8]) -> Result<TimeSeriesDocument> {
    let envelope: BeaEnvelope = serde_json::from_slice(body)?;
    if let Some(error) = &envelope.api.error {
        return Err(AppError::api("BEA", error_text(error)));
    }
    let results = envelope
        .api
        .results
        .ok_or_else(|| AppError::api("BEA", "response has no Results"))?;
    if let Some(error) = &results.error {
        return Err(AppError::api("BEA", error_text(error)));
    }

    let mut acc: SeriesAccumulator<(u32, String, String)> = SeriesAccumulator::new();
    for row in results.data {
        let date = match def.frequency {
            Frequency::Monthly => period::bea_month(&row.time_period),
            Frequency::Quarterly => period::bea_quarter(&row.time_period),
        };
        let Some(date) = date else {
            continue;
        };
        let line = row.line_number.trim().to_string();
        let description = row.line_description.trim().to_string();
        let order = line.parse().unwrap_or(9999);
        let id = format!("{}_{}", def.table, line);
        acc.push(
            (order, line, description.clone()),
            id,
            description,
            date,
            parse_number(&row.data_value),
        );
    }

    let source = format!("BEA {} Table {}", def.dataset, def.table);
    let metadata = Metadata::new(def.title, source, def.unit, def.frequency);
    Ok(TimeSeriesDocument::new(metadata, acc.finish()))
}

/// BEA NIPA fetcher.
pub struct NipaFetcher;

impl NipaFetcher {
    async fn fetch_table(&self, ctx: &FetchContext, key: &str, def: &NipaTable) -> Result<usize> {
        log::info!("  Fetching {} ({})...", def.key, def.table);
        let request = ctx.client.get(BEA_URL).query(&[
            ("UserID", key),
            ("method", "GetData"),
            ("DataSetName", def.dataset),
            ("TableName", def.table),
            ("Frequency", def.frequency_code()),
            ("Year", "ALL"),
            ("ResultFormat", "JSON"),
        ]);
        let body = ctx.client.bytes(request).await?;
        store_table(&ctx.storage, def, &body).await
    }
}

/// Parse a response and overwrite the table's document.
///
/// A response without series leaves the published file untouched.
async fn store_table(storage: &LocalStorage, def: &NipaTable, body: &[u8]) -> Result<usize> {
    let document = parse_table(def, body)?;
    if document.is_empty() {
        return Err(AppError::api(
            "BEA",
            format!("no data returned for {}; keeping previous file", def.key),
        ));
    }
    storage.save_document(&def.output(), &document).await?;
    Ok(document.series.len())
}

#[async_trait]
impl Fetcher for NipaFetcher {
    fn id(&self) -> FetcherId {
        FetcherId::Nipa
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchReport> {
        let key = ctx.keys.require("bea")?;
        let mut report = FetchReport::default();
        let mut failures = Vec::new();

        for (i, def) in NIPA_TABLES.iter().enumerate() {
            if i > 0 {
                http::pause(ctx.config.rate_limits.bea_ms).await;
            }
            match self.fetch_table(ctx, key, def).await {
                Ok(count) => report.record(def.output(), count),
                Err(e) => {
                    log::warn!("  {} failed: {}", def.key, e);
                    failures.push(def.key);
                }
            }
        }

        if report.files.is_empty() {
            return Err(AppError::api(
                "BEA",
                format!("all {} tables failed", failures.len()),
            ));
        }
        if !failures.is_empty() {
            log::warn!("NIPA tables not updated: {}", failures.join(", "));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly() -> &'static NipaTable {
        &NIPA_TABLES[0]
    }

    #[test]
    fn test_parse_groups_by_line() {
        let body = br#"{"BEAAPI": {"Results": {"Data": [
            {"LineNumber": "10", "LineDescription": "Retail trade ", "TimePeriod": "2024M02", "DataValue": "2,000"},
            {"LineNumber": "2", "LineDescription": "Manufacturing", "TimePeriod": "2024M01", "DataValue": "900"},
            {"LineNumber": "10", "LineDescription": "Retail trade", "TimePeriod": "2024M01", "DataValue": "1,950"},
            {"LineNumber": "2", "LineDescription": "Manufacturing", "TimePeriod": "2024M02", "DataValue": "---"},
            {"LineNumber": "3", "LineDescription": "Only once", "TimePeriod": "2024M02", "DataValue": "1"}
        ]}}}"#;

        let doc = parse_table(monthly(), body).unwrap();
        let ids: Vec<_> = doc.series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["U001B_2", "U001B_10"]);

        let retail = &doc.series[1];
        assert_eq!(retail.name, "Retail trade");
        assert_eq!(retail.data[0].value, Some(1950.0));
        assert_eq!(retail.data[1].value, Some(2000.0));
        assert_eq!(doc.series[0].data[1].value, None);
        assert_eq!(doc.metadata.source, "BEA NIUnderlyingDetail Table U001B");
    }

    #[test]
    fn test_quarterly_periods() {
        let def = NIPA_TABLES.iter().find(|t| t.key == "4_2_5b").unwrap();
        let body = br#"{"BEAAPI": {"Results": {"Data": [
            {"LineNumber": "1", "LineDescription": "Exports", "TimePeriod": "2023Q4", "DataValue": "5"},
            {"LineNumber": "1", "LineDescription": "Exports", "TimePeriod": "2024Q1", "DataValue": "6"}
        ]}}}"#;
        let doc = parse_table(def, body).unwrap();
        assert_eq!(doc.series[0].id, "T40205B_1");
        assert_eq!(doc.metadata.frequency, Frequency::Quarterly);
        assert_eq!(doc.series[0].data[1].date.to_string(), "2024-01-01");
    }

    #[test]
    fn test_api_error_surfaces() {
        let body = br#"{"BEAAPI": {"Results": {"Error": [{"APIErrorCode": "201", "APIErrorDescription": "Invalid TableName"}]}}}"#;
        let err = parse_table(monthly(), body).unwrap_err();
        assert_eq!(err.to_string(), "BEA API error: Invalid TableName");
    }

    #[test]
    fn test_table_outputs() {
        assert_eq!(NIPA_TABLES.len(), 12);
        assert_eq!(monthly().output(), "nipa/1bu.json");
    }

    #[test]
    fn test_every_indexed_nipa_file_is_fetched() {
        let outputs: Vec<String> = NIPA_TABLES.iter().map(NipaTable::output).collect();
        let indexed: Vec<_> = crate::pipeline::index::data_file_pages()
            .into_iter()
            .filter(|f| f.data_file.starts_with("nipa/"))
            .collect();
        assert_eq!(indexed.len(), outputs.len());
        for file in indexed {
            assert!(outputs.iter().any(|o| o == file.data_file), "{}", file.data_file);
        }
    }

    #[tokio::test]
    async fn test_empty_response_keeps_published_table() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let full = br#"{"BEAAPI": {"Results": {"Data": [
            {"LineNumber": "1", "LineDescription": "Total", "TimePeriod": "2024M01", "DataValue": "10"},
            {"LineNumber": "1", "LineDescription": "Total", "TimePeriod": "2024M02", "DataValue": "11"}
        ]}}}"#;
        assert_eq!(store_table(&storage, monthly(), full).await.unwrap(), 1);

        let empty = br#"{"BEAAPI": {"Results": {"Data": []}}}"#;
        assert!(store_table(&storage, monthly(), empty).await.is_err());

        let kept = storage.load_document("nipa/1bu.json").await.unwrap().unwrap();
        assert_eq!(kept.series.len(), 1);
        assert_eq!(kept.series[0].id, "U001B_1");
    }
}
