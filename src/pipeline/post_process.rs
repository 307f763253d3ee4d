//! Derived documents built from fetched data.
//!
//! Each step reads one fetched document and writes filtered or split
//! views of it. A missing input skips that step with a warning.

use crate::error::Result;
use crate::models::{Config, Frequency, Metadata, Series, TimeSeriesDocument, renumber};
use crate::naics::sector_name;
use crate::storage::LocalStorage;
use crate::utils::log;

const QSS_KEY: &str = "qss/qss.json";
const WHOLESALE_KEY: &str = "wholesale/wholesale.json";
const EMPLOYEES_KEY: &str = "ces/employees.json";
const PBS_KEY: &str = "ces/employees_pbs.json";
const ANALYSIS_KEY: &str = "analysis/ai_employment.json";
const CALENDAR_KEY: &str = "calendar/release_calendar.json";

/// QSS revenue series; other data types are dropped.
const QSS_REVENUE: &str = "QREV";

/// NAICS names for QSS industry codes below the sector level.
static QSS_INDUSTRIES: &[(&str, &str)] = &[
    ("2211", "Electric Power Generation, Transmission and Distribution"),
    ("4811", "Scheduled Air Transportation"),
    ("4841", "General Freight Trucking"),
    ("4842", "Specialized Freight Trucking"),
    ("4921", "Couriers and Express Delivery Services"),
    ("4931", "Warehousing and Storage"),
    ("5111", "Newspaper, Periodical, Book, and Directory Publishers"),
    ("5112", "Software Publishers"),
    ("5121", "Motion Picture and Video Industries"),
    ("5122", "Sound Recording Industries"),
    ("5151", "Radio and Television Broadcasting"),
    ("5152", "Cable and Other Subscription Programming"),
    ("5171", "Wired Telecommunications Carriers"),
    ("5172", "Wireless Telecommunications Carriers (except Satellite)"),
    ("5182", "Data Processing, Hosting, and Related Services"),
    ("5191", "Other Information Services"),
    ("5411", "Legal Services"),
    ("5412", "Accounting, Tax Preparation, Bookkeeping, and Payroll Services"),
    ("5413", "Architectural, Engineering, and Related Services"),
    ("5414", "Specialized Design Services"),
    ("5415", "Computer Systems Design and Related Services"),
    ("5416", "Management, Scientific, and Technical Consulting Services"),
    ("5417", "Scientific Research and Development Services"),
    ("5418", "Advertising, Public Relations, and Related Services"),
    ("5419", "Other Professional, Scientific, and Technical Services"),
    ("5611", "Office Administrative Services"),
    ("5613", "Employment Services"),
    ("5614", "Business Support Services"),
    ("5615", "Travel Arrangement and Reservation Services"),
    ("5617", "Services to Buildings and Dwellings"),
    ("5621", "Waste Collection"),
    ("6211", "Offices of Physicians"),
    ("6212", "Offices of Dentists"),
    ("6214", "Outpatient Care Centers"),
    ("6215", "Medical and Diagnostic Laboratories"),
    ("6216", "Home Health Care Services"),
    ("6221", "General Medical and Surgical Hospitals"),
    ("6231", "Nursing Care Facilities (Skilled Nursing Facilities)"),
    ("6241", "Individual and Family Services"),
    ("7111", "Performing Arts Companies"),
    ("7112", "Spectator Sports"),
    ("7131", "Amusement Parks and Arcades"),
    ("7139", "Other Amusement and Recreation Industries"),
    ("8111", "Automotive Repair and Maintenance"),
    ("8121", "Personal Care Services"),
    ("8123", "Drycleaning and Laundry Services"),
];

/// CES series for the AI exposure analysis, in display order.
pub static AI_EXPOSED_SERIES: &[&str] = &[
    "CES0000000001",
    "CES6000000001",
    "CES6054000001",
    "CES6054150001",
    "CES6054151101",
    "CES6054151201",
    "CES6054110001",
    "CES6054120001",
    "CES6054160001",
    "CES6054161001",
    "CES6054130001",
    "CES6054170001",
    "CES5051320001",
    "CES6054140001",
    "CES6054180001",
    "CES5000000001",
];

/// Split an id at its last `_` into `(category, data type)`.
fn split_metric(id: &str) -> Option<(&str, &str)> {
    id.rsplit_once('_')
}

/// Display label for a QSS category code such as `5415T`.
///
/// Falls back to the sector name for two-digit codes and to the raw
/// category code otherwise.
pub fn qss_label(category: &str) -> String {
    let code = category.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    QSS_INDUSTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .or_else(|| (code.len() == 2).then(|| sector_name(code)).flatten())
        .map(str::to_string)
        .unwrap_or_else(|| category.to_string())
}

/// QSS restricted to revenue series, named by industry.
pub fn qss_revenue(document: &TimeSeriesDocument) -> TimeSeriesDocument {
    let series = document
        .series
        .iter()
        .filter_map(|s| {
            let (category, dtype) = split_metric(&s.id)?;
            (dtype == QSS_REVENUE).then(|| Series {
                name: qss_label(category),
                ..s.clone()
            })
        })
        .collect();
    TimeSeriesDocument::new(document.metadata.clone(), renumber(series))
}

/// Wholesale views, one per metric group. Empty groups are omitted.
pub fn split_wholesale(document: &TimeSeriesDocument) -> Vec<(&'static str, TimeSeriesDocument)> {
    let groups: [(&str, &[&str], &str, &str); 3] = [
        ("wholesale/wholesale_sales.json", &["SM"], "Wholesale Trade - Sales", "Millions of dollars"),
        (
            "wholesale/wholesale_inventory.json",
            &["EI", "IM"],
            "Wholesale Trade - Inventories",
            "Millions of dollars",
        ),
        (
            "wholesale/wholesale_ratio.json",
            &["SI", "IR"],
            "Wholesale Trade - Inventory/Sales Ratio",
            "Ratio",
        ),
    ];

    groups
        .into_iter()
        .filter_map(|(key, metrics, title, unit)| {
            let mut metadata = document.metadata.clone();
            metadata.title = title.to_string();
            metadata.unit = unit.to_string();
            let view = document.filtered(metadata, |s| {
                split_metric(&s.id).is_some_and(|(_, m)| metrics.contains(&m))
            });
            (!view.is_empty()).then_some((key, view))
        })
        .collect()
}

/// Professional and business services (`CES60*`) employees.
pub fn ces_pbs(employees: &TimeSeriesDocument) -> TimeSeriesDocument {
    let metadata = employees.metadata.derive(
        "Professional and Business Services - Employees",
        employees.metadata.unit.clone(),
    );
    employees.filtered(metadata, |s| s.id.starts_with("CES60"))
}

/// The AI exposure series, in [`AI_EXPOSED_SERIES`] order.
pub fn ai_employment(employees: &TimeSeriesDocument) -> TimeSeriesDocument {
    let series = AI_EXPOSED_SERIES
        .iter()
        .filter_map(|id| employees.series.iter().find(|s| s.id == *id).cloned())
        .collect();
    let metadata = Metadata {
        title: "AI Impact on Professional Services Employment".into(),
        source: "Bureau of Labor Statistics, Current Employment Statistics".into(),
        unit: "Thousands".into(),
        frequency: Frequency::Monthly,
        last_updated: None,
    };
    TimeSeriesDocument::new(metadata, renumber(series))
}

/// Documents written by one post-processing run.
#[derive(Debug, Default)]
pub struct PostProcessReport {
    pub written: Vec<(String, usize)>,
    pub skipped: Vec<String>,
}

impl PostProcessReport {
    fn skip(&mut self, input: &str) {
        ::log::warn!("{} not found, skipping", input);
        self.skipped.push(input.to_string());
    }
}

async fn write(storage: &LocalStorage, report: &mut PostProcessReport, key: &str, document: &TimeSeriesDocument) -> Result<()> {
    storage.save_document(key, document).await?;
    report.written.push((key.to_string(), document.series.len()));
    Ok(())
}

/// Run every post-processing step against the configured data directory.
pub async fn run_post_process(config: &Config) -> Result<PostProcessReport> {
    let storage = LocalStorage::new(&config.paths.data_dir);
    let mut report = PostProcessReport::default();

    log::sub_item("QSS: revenue series with industry labels");
    match storage.load_document(QSS_KEY).await? {
        Some(qss) => write(&storage, &mut report, QSS_KEY, &qss_revenue(&qss)).await?,
        None => report.skip(QSS_KEY),
    }

    log::sub_item("Wholesale: sales / inventory / ratio");
    match storage.load_document(WHOLESALE_KEY).await? {
        Some(wholesale) => {
            for (key, view) in split_wholesale(&wholesale) {
                write(&storage, &mut report, key, &view).await?;
            }
        }
        None => report.skip(WHOLESALE_KEY),
    }

    log::sub_item("CES: professional and business services, AI analysis");
    match storage.load_document(EMPLOYEES_KEY).await? {
        Some(employees) => {
            write(&storage, &mut report, PBS_KEY, &ces_pbs(&employees)).await?;
            write(&storage, &mut report, ANALYSIS_KEY, &ai_employment(&employees)).await?;
        }
        None => report.skip(EMPLOYEES_KEY),
    }

    log::sub_item("Release calendar");
    let calendar_path = config.paths.calendar();
    match tokio::fs::read(&calendar_path).await {
        Ok(bytes) => {
            storage.write_bytes(CALENDAR_KEY, &bytes).await?;
            ::log::info!("Copied {} to {}", calendar_path.display(), CALENDAR_KEY);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            report.skip(&calendar_path.display().to_string());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObservationPoint;
    use chrono::NaiveDate;

    fn series(id: &str, name: &str) -> Series {
        Series {
            id: id.into(),
            name: name.into(),
            display_order: 7,
            data: vec![
                ObservationPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    value: Some(1.0),
                },
                ObservationPoint {
                    date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                    value: None,
                },
            ],
        }
    }

    fn document(series: Vec<Series>) -> TimeSeriesDocument {
        TimeSeriesDocument::new(
            Metadata::new("Raw", "U.S. Census Bureau", "Millions of dollars", Frequency::Monthly),
            series,
        )
    }

    #[test]
    fn test_qss_labels() {
        assert_eq!(qss_label("5415T"), "Computer Systems Design and Related Services");
        assert_eq!(qss_label("54T"), "Professional, Scientific, and Technical Services");
        assert_eq!(qss_label("4849YT"), "4849YT");
    }

    #[test]
    fn test_qss_keeps_revenue_only() {
        let raw = document(vec![
            series("5415T_QREV", "5415T QREV"),
            series("5415T_QEXP", "5415T QEXP"),
            series("NOUNDERSCORE", "x"),
            series("51T_QREV", "51T QREV"),
        ]);
        let qss = qss_revenue(&raw);

        let ids: Vec<_> = qss.series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["5415T_QREV", "51T_QREV"]);
        assert_eq!(qss.series[1].name, "Information");
        assert_eq!(qss.series[1].display_order, 1);
        assert_eq!(qss.series[0].data[1].value, None);
    }

    #[test]
    fn test_wholesale_split() {
        let raw = document(vec![
            series("4231_SM", "Motor vehicles"),
            series("4231_IM", "Motor vehicles"),
            series("42_SM", "Total"),
            series("4232_EI", "Furniture"),
            series("4232_XX", "Unknown metric"),
        ]);
        let views = split_wholesale(&raw);

        let keys: Vec<_> = views.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["wholesale/wholesale_sales.json", "wholesale/wholesale_inventory.json"]);

        let (_, sales) = &views[0];
        assert_eq!(sales.metadata.title, "Wholesale Trade - Sales");
        assert_eq!(sales.series.len(), 2);
        assert_eq!(sales.series[1].id, "42_SM");
        assert_eq!(sales.series[1].display_order, 1);

        let (_, inventory) = &views[1];
        assert_eq!(inventory.series.len(), 2);
        assert_eq!(inventory.metadata.source, "U.S. Census Bureau");
    }

    #[test]
    fn test_ces_views() {
        let employees = document(vec![
            series("CES0000000001", "Total nonfarm"),
            series("CES5000000001", "Information"),
            series("CES6000000001", "Professional and business services"),
            series("CES6054150001", "Computer systems design"),
        ]);

        let pbs = ces_pbs(&employees);
        assert_eq!(pbs.series.len(), 2);
        assert!(pbs.series.iter().all(|s| s.id.starts_with("CES60")));
        assert_eq!(pbs.metadata.title, "Professional and Business Services - Employees");
        assert!(pbs.metadata.last_updated.is_some());

        let analysis = ai_employment(&employees);
        let ids: Vec<_> = analysis.series.iter().map(|s| s.id.as_str()).collect();
        // Declared order, not input order.
        assert_eq!(ids, vec!["CES0000000001", "CES6000000001", "CES6054150001", "CES5000000001"]);
        assert_eq!(analysis.series[3].display_order, 3);
        assert!(analysis.metadata.last_updated.is_none());
    }

    #[tokio::test]
    async fn test_run_skips_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.data_dir = dir.path().join("json");
        config.paths.config_dir = dir.path().join("config");
        std::fs::create_dir_all(&config.paths.config_dir).unwrap();
        std::fs::write(config.paths.calendar(), br#"{"last_updated": "x", "schedules": {}}"#).unwrap();

        let storage = LocalStorage::new(&config.paths.data_dir);
        storage
            .save_document(
                WHOLESALE_KEY,
                &document(vec![series("4231_SM", "Motor vehicles"), series("4231_IR", "Motor vehicles")]),
            )
            .await
            .unwrap();

        let report = run_post_process(&config).await.unwrap();

        assert_eq!(report.skipped, vec![QSS_KEY.to_string(), EMPLOYEES_KEY.to_string()]);
        assert!(storage.exists("wholesale/wholesale_sales.json").await);
        assert!(storage.exists("wholesale/wholesale_ratio.json").await);
        assert!(!storage.exists("wholesale/wholesale_inventory.json").await);
        assert!(storage.exists(CALENDAR_KEY).await);
    }
}
