//! Census Economic Indicators Time Series (EITS) programs.
//!
//! All four programs share one API shape: a JSON array of string rows with
//! a header row first, requested one calendar year at a time.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};

use crate::error::Result;
use crate::models::{Frequency, Metadata, SeriesAccumulator, TimeSeriesDocument};
use crate::services::{FetchContext, FetchReport, Fetcher, FetcherId};
use crate::utils::{http, parse_number, period};

const EITS_BASE: &str = "https://api.census.gov/data/timeseries/eits";
const FIELDS: &str = "cell_value,data_type_code,time_slot_id,category_code,seasonally_adj";

/// Static description of one EITS program.
#[derive(Debug)]
pub struct CensusProgram {
    pub id: FetcherId,
    pub dataset: &'static str,
    pub output: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub unit: &'static str,
    pub frequency: Frequency,
    /// `(category, data type) -> series name`
    pub name: fn(&str, &str) -> String,
}

pub static M3: CensusProgram = CensusProgram {
    id: FetcherId::M3,
    dataset: "m3",
    output: "m3/m3.json",
    title: "Manufacturers' Shipments, Inventories, and Orders",
    source: "Census Bureau M3 Survey",
    unit: "Millions of dollars",
    frequency: Frequency::Monthly,
    name: m3_name,
};

pub static QSS: CensusProgram = CensusProgram {
    id: FetcherId::Qss,
    dataset: "qss",
    output: "qss/qss.json",
    title: "Quarterly Services Survey",
    source: "Census Bureau QSS",
    unit: "Millions of dollars",
    frequency: Frequency::Quarterly,
    name: code_name,
};

pub static CONSTRUCTION: CensusProgram = CensusProgram {
    id: FetcherId::Construction,
    dataset: "vip",
    output: "construction/construction.json",
    title: "Construction Spending",
    source: "Census Bureau Value of Construction Put in Place (VIP)",
    unit: "Millions of dollars",
    frequency: Frequency::Monthly,
    name: code_name,
};

pub static WHOLESALE: CensusProgram = CensusProgram {
    id: FetcherId::Wholesale,
    dataset: "mwts",
    output: "wholesale/wholesale.json",
    title: "Monthly Wholesale Trade",
    source: "Census Bureau Monthly Wholesale Trade Survey",
    unit: "Millions of dollars",
    frequency: Frequency::Monthly,
    name: wholesale_name,
};

fn code_name(category: &str, data_type: &str) -> String {
    format!("{category} - {data_type}")
}

fn m3_name(category: &str, data_type: &str) -> String {
    let category = m3_category_name(category).unwrap_or(category);
    let data_type = m3_data_type_name(data_type).unwrap_or(data_type);
    format!("{category} - {data_type}")
}

fn wholesale_name(category: &str, data_type: &str) -> String {
    let data_type = match data_type {
        "SM" => "Sales",
        "IM" | "EI" => "Inventories",
        "IR" | "SI" => "Inventory/Sales Ratio",
        other => other,
    };
    format!("{category} - {data_type}")
}

fn m3_data_type_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "SM" => "Shipments",
        "NI" | "NO" => "New Orders",
        "UI" | "UO" => "Unfilled Orders",
        "TI" => "Total Inventories",
        "MI" => "Materials Inventories",
        "WI" => "Work-in-Process Inventories",
        "FI" => "Finished Goods Inventories",
        "VS" | "US" => "Value of Shipments",
        "IS" => "Inventory/Shipments Ratio",
        "NS" => "New Orders/Shipments Ratio",
        "MPCNO" => "Monthly % Change New Orders",
        "MPCVS" => "Monthly % Change Value of Shipments",
        "MPCTI" => "Monthly % Change Total Inventories",
        "MPCFI" => "Monthly % Change Finished Goods Inventories",
        "MPCMI" => "Monthly % Change Materials Inventories",
        "MPCWI" => "Monthly % Change Work-in-Process Inventories",
        "MPCUO" => "Monthly % Change Unfilled Orders",
        _ => return None,
    })
}

fn m3_category_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "MTM" => "All Manufacturing",
        "MDM" => "Durable Goods",
        "MNM" => "Nondurable Goods",
        "MXT" => "Manufacturing excl. Transportation",
        "MXD" => "Manufacturing excl. Defense",
        "MTU" => "Manufacturing with Unfilled Orders",
        "DXT" => "Durable Goods excl. Transportation",
        "DXD" => "Durable Goods excl. Defense",
        "TCG" => "Capital Goods",
        "NDE" => "Nondefense Capital Goods",
        "NXA" => "Nondefense Capital Goods excl. Aircraft",
        "DEF" => "Defense Capital Goods",
        "NAP" => "Nondefense Aircraft and Parts",
        "DAP" => "Defense Aircraft and Parts",
        "CDG" => "Consumer Durable Goods",
        "CNG" => "Consumer Nondurable Goods",
        "COG" => "Consumer Goods",
        "ITI" => "Information Technology",
        "MVP" => "Motor Vehicles and Parts",
        "ODG" => "All Other Durable Goods",
        "CRP" => "Computers and Related Products",
        "CMS" => "Communications Equipment",
        "ANM" => "All Manufacturing New Orders",
        "BTP" => "Business-Type Products",
        "TGP" => "Technology Goods Products",
        "11S" => "Food Products",
        "11A" => "Grain and Oilseed Milling",
        "11B" => "Dairy Products",
        "11C" => "Meat, Poultry, and Seafood",
        "12S" => "Beverage and Tobacco Products",
        "12A" => "Beverages",
        "12B" => "Tobacco",
        "13S" => "Textile Mills",
        "14S" => "Textile Products",
        "15S" => "Apparel",
        "16S" => "Leather and Allied Products",
        "21S" => "Wood Products",
        "22S" => "Paper Products",
        "22A" => "Pulp, Paper, and Paperboard Mills",
        "22B" => "Paperboard Containers",
        "23S" => "Printing",
        "24S" => "Petroleum and Coal Products",
        "24A" => "Petroleum Refineries",
        "25S" => "Chemical Products",
        "25A" => "Pesticides, Fertilizers, and Agricultural Chemicals",
        "25B" => "Pharmaceuticals and Medicines",
        "25C" => "Paints, Coatings, and Adhesives",
        "26S" => "Plastics and Rubber Products",
        "27S" => "Nonmetallic Mineral Products",
        "31S" => "Primary Metals",
        "31A" => "Iron and Steel Mills",
        "31C" => "Aluminum and Nonferrous Metals",
        "32S" => "Fabricated Metal Products",
        "33S" => "Machinery",
        "33A" => "Farm Machinery",
        "33C" => "Construction Machinery",
        "33D" => "Mining, Oil, and Gas Field Machinery",
        "33E" => "Industrial Machinery",
        "33G" => "Photographic Equipment",
        "33H" => "HVAC and Refrigeration Equipment",
        "33I" => "Metalworking Machinery",
        "33M" => "Turbines and Power Transmission Equipment",
        "34S" => "Computers and Electronic Products",
        "34A" => "Computers",
        "34B" => "Computer Storage Devices",
        "34C" => "Other Peripheral Equipment",
        "34D" => "Nondefense Communications Equipment",
        "34E" => "Defense Communications Equipment",
        "34F" => "Audio and Video Equipment",
        "34H" => "Electronic Components",
        "34I" => "Nondefense Search and Navigation Equipment",
        "34J" => "Defense Search and Navigation Equipment",
        "34K" => "Electromedical and Control Instruments",
        "34X" => "Computers and Electronic Products Subtotal",
        "35S" => "Electrical Equipment and Components",
        "35A" => "Electric Lighting Equipment",
        "35B" => "Household Appliances",
        "35C" => "Electrical Equipment",
        "35D" => "Batteries",
        "36S" => "Transportation Equipment",
        "36A" => "Automobiles",
        "36B" => "Light Trucks and Utility Vehicles",
        "36C" => "Heavy Duty Trucks",
        "36Z" => "Motor Vehicle Bodies, Parts, and Trailers",
        "37S" => "Furniture and Related Products",
        "39S" => "Miscellaneous Manufacturing",
        _ => return None,
    })
}

/// EITS table rows. Cells may be JSON `null`.
pub type CensusTable = Vec<Vec<Option<String>>>;

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    value: usize,
    data_type: usize,
    category: usize,
    seasonal: usize,
    time: usize,
}

impl Columns {
    fn from_header(header: &[Option<String>]) -> Option<Self> {
        let index: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.as_deref().map(|h| (h, i)))
            .collect();
        Some(Self {
            value: *index.get("cell_value")?,
            data_type: *index.get("data_type_code")?,
            category: *index.get("category_code")?,
            seasonal: *index.get("seasonally_adj")?,
            time: *index.get("time")?,
        })
    }
}

impl CensusProgram {
    fn parse_time(&self, time: &str) -> Option<NaiveDate> {
        match self.frequency {
            Frequency::Monthly => period::census_month(time),
            Frequency::Quarterly => period::census_quarter(time),
        }
    }

    /// Turn a header row plus data rows into a document.
    ///
    /// Keeps seasonally adjusted rows only, drops error-margin data types
    /// (`E_*`), and keys series as `{category}_{data type}`.
    pub fn build_document(&self, header: &[Option<String>], rows: &[Vec<Option<String>>]) -> TimeSeriesDocument {
        let mut acc: SeriesAccumulator<String> = SeriesAccumulator::new();
        let mut skipped = 0usize;

        if let Some(cols) = Columns::from_header(header) {
            let cell = |row: &[Option<String>], i: usize| -> Option<String> {
                row.get(i).cloned().flatten()
            };

            for row in rows {
                if cell(row, cols.seasonal).as_deref() != Some("yes") {
                    continue;
                }
                let category = cell(row, cols.category).unwrap_or_default();
                let data_type = cell(row, cols.data_type).unwrap_or_default();
                if data_type.starts_with("E_") {
                    continue;
                }
                let Some(date) = cell(row, cols.time).and_then(|t| self.parse_time(&t)) else {
                    skipped += 1;
                    continue;
                };
                let value = cell(row, cols.value).and_then(|v| parse_number(&v));
                let key = format!("{category}_{data_type}");
                let name = (self.name)(&category, &data_type);
                acc.push(key.clone(), key, name, date, value);
            }
        } else {
            log::warn!("{}: header row lacks expected columns", self.dataset);
        }

        if skipped > 0 {
            log::debug!("{}: skipped {} rows with unparsable time", self.dataset, skipped);
        }

        let metadata = Metadata::new(self.title, self.source, self.unit, self.frequency);
        TimeSeriesDocument::new(metadata, acc.finish())
    }
}

/// Fetcher for one EITS program.
pub struct CensusFetcher {
    program: &'static CensusProgram,
}

impl CensusFetcher {
    pub fn new(program: &'static CensusProgram) -> Self {
        Self { program }
    }

    async fn fetch_year(&self, ctx: &FetchContext, key: &str, year: i32) -> Result<CensusTable> {
        let url = format!("{}/{}", EITS_BASE, self.program.dataset);
        let year = year.to_string();
        let request = ctx.client.get(&url).query(&[
            ("get", FIELDS),
            ("time", year.as_str()),
            ("for", "us:*"),
            ("key", key),
        ]);
        // The API answers 204 with an empty body for years without data.
        let body = ctx.client.text(request).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Fetcher for CensusFetcher {
    fn id(&self) -> FetcherId {
        self.program.id
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchReport> {
        let key = ctx.keys.require("census")?;
        let first = ctx.config.fetch.start_year;
        let last = Utc::now().year();

        let mut header: Option<Vec<Option<String>>> = None;
        let mut rows = Vec::new();

        for year in first..=last {
            match self.fetch_year(ctx, key, year).await {
                Ok(table) if table.len() >= 2 => {
                    let mut table = table.into_iter();
                    let year_header = table.next().unwrap_or_default();
                    header.get_or_insert(year_header);
                    let before = rows.len();
                    rows.extend(table);
                    log::info!("  {} {}: {} rows", self.program.dataset, year, rows.len() - before);
                }
                Ok(_) => log::info!("  {} {}: no data", self.program.dataset, year),
                Err(e) => log::warn!("  {} {}: {}", self.program.dataset, year, e),
            }
            http::pause(ctx.config.rate_limits.census_ms).await;
        }

        let mut report = FetchReport::default();
        let Some(header) = header else {
            log::warn!("{}: no data fetched", self.program.dataset);
            return Ok(report);
        };

        log::info!("{}: {} rows total", self.program.dataset, rows.len());
        let document = self.program.build_document(&header, &rows);
        ctx.storage.save_document(self.program.output, &document).await?;
        report.record(self.program.output, document.series.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| if *c == "null" { None } else { Some(c.to_string()) })
            .collect()
    }

    fn header() -> Vec<Option<String>> {
        row(&[
            "cell_value",
            "data_type_code",
            "time_slot_id",
            "category_code",
            "seasonally_adj",
            "time",
            "us",
        ])
    }

    #[test]
    fn test_m3_rows_grouped_and_filtered() {
        let rows = vec![
            row(&["1,200", "VS", "0", "11A", "yes", "2024-02", "1"]),
            row(&["1,100", "VS", "0", "11A", "yes", "2024-01", "1"]),
            row(&["900", "VS", "0", "11A", "no", "2024-03", "1"]),
            row(&["5", "E_VS", "0", "11A", "yes", "2024-01", "1"]),
            row(&["(S)", "NO", "0", "MTM", "yes", "2024-01", "1"]),
            row(&["10", "NO", "0", "MTM", "yes", "2024-02", "1"]),
            row(&["7", "TI", "0", "34S", "yes", "2024-01", "1"]),
        ];

        let doc = M3.build_document(&header(), &rows);
        let ids: Vec<_> = doc.series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["11A_VS", "MTM_NO"]);

        let grain = &doc.series[0];
        assert_eq!(grain.name, "Grain and Oilseed Milling - Value of Shipments");
        assert_eq!(grain.data.len(), 2);
        assert_eq!(grain.data[0].value, Some(1100.0));
        assert_eq!(grain.data[1].value, Some(1200.0));

        let total = &doc.series[1];
        assert_eq!(total.data[0].value, None);
        assert_eq!(total.display_order, 1);
        assert_eq!(doc.metadata.frequency, Frequency::Monthly);
    }

    #[test]
    fn test_qss_quarter_dates() {
        let rows = vec![
            row(&["100", "QREV", "0", "2211T", "yes", "2023-Q4", "1"]),
            row(&["110", "QREV", "0", "2211T", "yes", "2024-Q1", "1"]),
        ];
        let doc = QSS.build_document(&header(), &rows);
        assert_eq!(doc.series.len(), 1);
        assert_eq!(doc.series[0].id, "2211T_QREV");
        assert_eq!(
            doc.series[0].data[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_null_cells_are_tolerated() {
        let rows = vec![
            row(&["null", "SM", "0", "4231", "yes", "2024-01", "1"]),
            row(&["12", "SM", "0", "4231", "yes", "2024-02", "1"]),
            row(&["12", "SM", "0", "4231", "null", "2024-03", "1"]),
        ];
        let doc = WHOLESALE.build_document(&header(), &rows);
        assert_eq!(doc.series[0].name, "4231 - Sales");
        assert_eq!(doc.series[0].data.len(), 2);
        assert_eq!(doc.series[0].data[0].value, None);
    }

    #[test]
    fn test_missing_columns_yield_empty_document() {
        let doc = CONSTRUCTION.build_document(&row(&["foo", "bar"]), &[]);
        assert!(doc.is_empty());
        assert_eq!(doc.metadata.title, "Construction Spending");
    }
}
