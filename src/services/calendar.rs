//! Release calendar scraping.
//!
//! Each agency publishes its schedule differently: BLS as an HTML table,
//! BEA as JSON, Census as an HTML list view and FRED through its API.
//! A failing source leaves an empty date list; it never aborts the build.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, Local, NaiveDate};
use reqwest::header;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::ReleaseCalendar;
use crate::services::FetchContext;

const BLS_SCHEDULE_URL: &str = "https://www.bls.gov/schedule/news_release/empsit.htm";
const BEA_SCHEDULE_URL: &str = "https://apps.bea.gov/API/signup/release_dates.json";
const CENSUS_SCHEDULE_URL: &str = "https://www.census.gov/economic-indicators/calendar-listview.html";
const FRED_RELEASE_DATES_URL: &str = "https://api.stlouisfed.org/fred/release/dates";

/// G.17 Industrial Production and Capacity Utilization.
const FRED_IP_RELEASE_ID: &str = "13";

const BEA_RELEASES: &[&str] = &["Personal Income and Outlays", "Gross Domestic Product", "GDP by Industry"];

/// Census indicator name -> calendar key. Checked in order.
const CENSUS_INDICATORS: &[(&str, &str)] = &[
    ("Manufacturers' Shipments, Inventories and Orders", "census_m3"),
    ("Construction Spending", "census_construction"),
    ("Monthly Wholesale Trade", "census_wholesale"),
    ("Quarterly Services Survey", "census_qss"),
];

// BLS rejects requests that do not look like a browser.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0";

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dates as BLS prints them: `Jan. 10, 2025`, `May 2, 2025`, `Sept. 5, 2025`.
fn parse_bls_date(text: &str) -> Option<NaiveDate> {
    let text = text.replace("Sept.", "Sep.");
    ["%b. %d, %Y", "%B %d, %Y", "%b %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
}

/// Release dates from the Employment Situation schedule page.
pub fn parse_bls_schedule(html: &str) -> Result<BTreeSet<NaiveDate>> {
    let document = Html::parse_document(html);
    let table_sel = parse_selector("table.release-list")?;
    let row_sel = parse_selector("tbody tr")?;
    let cell_sel = parse_selector("td")?;

    let Some(table) = document.select(&table_sel).next() else {
        return Err(AppError::selector("table.release-list", "table not found"));
    };

    Ok(table
        .select(&row_sel)
        .filter_map(|row| {
            let cell = row.select(&cell_sel).nth(1)?;
            parse_bls_date(&cell_text(cell))
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct BeaRelease {
    #[serde(default)]
    release_dates: Vec<String>,
}

/// Dates of NIPA-relevant releases from BEA's schedule JSON.
pub fn parse_bea_schedule(body: &[u8]) -> Result<BTreeSet<NaiveDate>> {
    let releases: HashMap<String, BeaRelease> = serde_json::from_slice(body)?;
    Ok(releases
        .iter()
        .filter(|(name, _)| {
            let name = name.to_lowercase();
            BEA_RELEASES.iter().any(|r| name.contains(&r.to_lowercase()))
        })
        .flat_map(|(_, release)| release.release_dates.iter())
        .filter_map(|stamp| NaiveDate::parse_from_str(stamp.get(..10)?, "%Y-%m-%d").ok())
        .collect())
}

fn census_key(indicator: &str) -> Option<&'static str> {
    let indicator = indicator.to_lowercase();
    CENSUS_INDICATORS.iter().find_map(|(pattern, key)| {
        if !indicator.contains(&pattern.to_lowercase()) {
            return None;
        }
        // Only the full M3 report carries the data we fetch.
        if *key == "census_m3" && indicator.contains("advance") {
            return None;
        }
        Some(*key)
    })
}

/// Dates per calendar key from the Census economic indicator list view.
///
/// Cells with the `hiden` class are layout duplicates and are ignored.
pub fn parse_census_schedule(html: &str) -> Result<BTreeMap<&'static str, BTreeSet<NaiveDate>>> {
    let document = Html::parse_document(html);
    let table_sel = parse_selector("table#calendar")?;
    let row_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("td")?;

    let Some(table) = document.select(&table_sel).next() else {
        return Err(AppError::selector("table#calendar", "table not found"));
    };

    let mut schedules: BTreeMap<&'static str, BTreeSet<NaiveDate>> = CENSUS_INDICATORS
        .iter()
        .map(|(_, key)| (*key, BTreeSet::new()))
        .collect();

    for row in table.select(&row_sel).skip(1) {
        let visible: Vec<String> = row
            .select(&cell_sel)
            .filter(|cell| !cell.value().classes().any(|c| c == "hiden"))
            .map(cell_text)
            .collect();
        let [indicator, date, ..] = visible.as_slice() else {
            continue;
        };
        let Some(key) = census_key(indicator) else {
            continue;
        };
        if let Ok(date) = NaiveDate::parse_from_str(date, "%B %d, %Y") {
            schedules.entry(key).or_default().insert(date);
        }
    }
    Ok(schedules)
}

#[derive(Debug, Deserialize)]
struct FredReleaseDates {
    #[serde(default)]
    release_dates: Vec<FredReleaseDate>,
}

#[derive(Debug, Deserialize)]
struct FredReleaseDate {
    date: String,
}

/// First day of the month before `today`.
fn previous_month_start(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

/// FRED release dates no older than the start of last month.
pub fn parse_fred_schedule(body: &[u8], today: NaiveDate) -> Result<BTreeSet<NaiveDate>> {
    let response: FredReleaseDates = serde_json::from_slice(body)?;
    let cutoff = previous_month_start(today);
    Ok(response
        .release_dates
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(&d.date, "%Y-%m-%d").ok())
        .filter(|d| *d >= cutoff)
        .collect())
}

/// Scrapes every agency schedule into one [`ReleaseCalendar`].
pub struct CalendarBuilder<'a> {
    ctx: &'a FetchContext,
}

impl<'a> CalendarBuilder<'a> {
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }

    /// Build the calendar. Sources that fail are logged and left empty.
    pub async fn build(&self) -> ReleaseCalendar {
        let mut calendar = ReleaseCalendar::new();

        log::info!("  Scraping BLS Employment Situation schedule...");
        let bls = self.bls().await.unwrap_or_else(|e| {
            log::warn!("    BLS schedule unavailable: {}", e);
            BTreeSet::new()
        });
        log::info!("    bls: {} dates", bls.len());
        calendar.set("bls", bls);

        log::info!("  Fetching BEA release schedule...");
        let bea = self.bea().await.unwrap_or_else(|e| {
            log::warn!("    BEA schedule unavailable: {}", e);
            BTreeSet::new()
        });
        log::info!("    bea: {} dates", bea.len());
        calendar.set("bea", bea);

        log::info!("  Scraping Census economic indicators calendar...");
        let census = self.census().await.unwrap_or_else(|e| {
            log::warn!("    Census schedule unavailable: {}", e);
            BTreeMap::new()
        });
        for (_, key) in CENSUS_INDICATORS {
            let dates = census.get(key).cloned().unwrap_or_default();
            log::info!("    {}: {} dates", key, dates.len());
            calendar.set(*key, dates);
        }

        log::info!("  Fetching FRED Industrial Production schedule...");
        let fred = self.fred().await.unwrap_or_else(|e| {
            log::warn!("    FRED schedule unavailable: {}", e);
            BTreeSet::new()
        });
        log::info!("    fred_ip: {} dates", fred.len());
        calendar.set("fred_ip", fred);

        calendar
    }

    async fn bls(&self) -> Result<BTreeSet<NaiveDate>> {
        let request = self
            .ctx
            .client
            .get(BLS_SCHEDULE_URL)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(header::REFERER, "https://www.bls.gov/");
        let html = self.ctx.client.text(request).await?;
        parse_bls_schedule(&html)
    }

    async fn bea(&self) -> Result<BTreeSet<NaiveDate>> {
        let body = self.ctx.client.bytes(self.ctx.client.get(BEA_SCHEDULE_URL)).await?;
        parse_bea_schedule(&body)
    }

    async fn census(&self) -> Result<BTreeMap<&'static str, BTreeSet<NaiveDate>>> {
        let html = self.ctx.client.text(self.ctx.client.get(CENSUS_SCHEDULE_URL)).await?;
        parse_census_schedule(&html)
    }

    async fn fred(&self) -> Result<BTreeSet<NaiveDate>> {
        let Some(key) = self.ctx.keys.get("fred") else {
            return Err(AppError::MissingCredential("fred".into()));
        };
        let request = self.ctx.client.get(FRED_RELEASE_DATES_URL).query(&[
            ("release_id", FRED_IP_RELEASE_ID),
            ("api_key", key),
            ("file_type", "json"),
            ("include_release_dates_with_no_data", "true"),
        ]);
        let body = self.ctx.client.bytes(request).await?;
        parse_fred_schedule(&body, Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bls_schedule() {
        let html = r#"<html><body>
            <table class="release-list">
              <thead><tr><th>Reference Month</th><th>Release Date</th><th>Time</th></tr></thead>
              <tbody>
                <tr><td>December 2024</td><td>Jan. 10, 2025</td><td>08:30 AM</td></tr>
                <tr><td>April 2025</td><td> May 2, 2025 </td><td>08:30 AM</td></tr>
                <tr><td>August 2025</td><td>Sept. 5, 2025</td><td>08:30 AM</td></tr>
                <tr><td>TBD</td><td>To be announced</td></tr>
                <tr><td>only one cell</td></tr>
              </tbody>
            </table></body></html>"#;

        let dates = parse_bls_schedule(html).unwrap();
        let dates: Vec<_> = dates.into_iter().collect();
        assert_eq!(dates, vec![date(2025, 1, 10), date(2025, 5, 2), date(2025, 9, 5)]);
    }

    #[test]
    fn test_bls_schedule_without_table() {
        let err = parse_bls_schedule("<html><body><p>Access denied</p></body></html>").unwrap_err();
        assert!(matches!(err, AppError::Selector { .. }));
    }

    #[test]
    fn test_bea_schedule_keeps_relevant_releases() {
        let body = br#"{
            "Personal Income and Outlays, December 2024": {"release_dates": ["2025-01-31T08:30:00-05:00"]},
            "GDP (Advance Estimate), Gross Domestic Product, 4th Quarter": {"release_dates": ["2025-01-30T08:30:00-05:00", "2025-01-31T08:30:00-05:00"]},
            "U.S. International Trade in Goods and Services": {"release_dates": ["2025-02-05T08:30:00-05:00"]},
            "GDP by Industry": {"release_dates": ["garbage"]}
        }"#;
        let dates: Vec<_> = parse_bea_schedule(body).unwrap().into_iter().collect();
        assert_eq!(dates, vec![date(2025, 1, 30), date(2025, 1, 31)]);
    }

    #[test]
    fn test_census_schedule() {
        let html = r#"<table id="calendar">
            <tr><th>Indicator</th><th>Date</th></tr>
            <tr><td class="hiden">ignored</td><td>Construction Spending</td><td>February 3, 2025</td></tr>
            <tr><td>Advance Report on Durable Goods - Manufacturers' Shipments, Inventories and Orders</td><td>January 28, 2025</td></tr>
            <tr><td>Full Report on Manufacturers' Shipments, Inventories and Orders</td><td>February 4, 2025</td></tr>
            <tr><td>Monthly Wholesale Trade: Sales and Inventories</td><td>February 10, 2025</td></tr>
            <tr><td>Quarterly Services Survey</td><td>March 11, 2025</td></tr>
            <tr><td>New Residential Sales</td><td>February 26, 2025</td></tr>
            <tr><td>Quarterly Services Survey</td><td>TBD</td></tr>
        </table>"#;

        let schedules = parse_census_schedule(html).unwrap();
        assert_eq!(schedules.len(), 4);
        assert!(schedules["census_construction"].contains(&date(2025, 2, 3)));
        assert_eq!(schedules["census_m3"].len(), 1);
        assert!(schedules["census_m3"].contains(&date(2025, 2, 4)));
        assert!(schedules["census_wholesale"].contains(&date(2025, 2, 10)));
        assert_eq!(schedules["census_qss"].len(), 1);
    }

    #[test]
    fn test_fred_schedule_cutoff() {
        let body = br#"{"release_dates": [
            {"release_id": 13, "date": "2024-11-15"},
            {"release_id": 13, "date": "2024-12-17"},
            {"release_id": 13, "date": "2025-01-17"},
            {"release_id": 13, "date": "2025-02-14"}
        ]}"#;
        let dates: Vec<_> = parse_fred_schedule(body, date(2025, 1, 20)).unwrap().into_iter().collect();
        assert_eq!(dates, vec![date(2024, 12, 17), date(2025, 1, 17), date(2025, 2, 14)]);
    }

    #[test]
    fn test_previous_month_start_wraps_year() {
        assert_eq!(previous_month_start(date(2025, 1, 20)), date(2024, 12, 1));
        assert_eq!(previous_month_start(date(2025, 3, 31)), date(2025, 2, 1));
    }
}
