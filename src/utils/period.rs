//! Agency period codes to month/quarter-start dates.
//!
//! All functions return `None` for codes that do not denote a calendar
//! month or quarter (BLS annual averages `M13`, malformed strings).

use chrono::NaiveDate;

fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn quarter_start(year: i32, quarter: u32) -> Option<NaiveDate> {
    if (1..=4).contains(&quarter) {
        month_start(year, (quarter - 1) * 3 + 1)
    } else {
        None
    }
}

/// BLS `year` + `M01`..`M12`.
pub fn bls_period(year: &str, period: &str) -> Option<NaiveDate> {
    let month = period.strip_prefix('M')?.parse().ok()?;
    month_start(year.trim().parse().ok()?, month)
}

/// Census monthly `YYYY-MM`.
pub fn census_month(time: &str) -> Option<NaiveDate> {
    let (year, month) = time.trim().split_once('-')?;
    month_start(year.parse().ok()?, month.parse().ok()?)
}

/// Census quarterly `YYYY-Qn`, also accepting `YYYYQn`.
pub fn census_quarter(time: &str) -> Option<NaiveDate> {
    bea_quarter(&time.replace('-', ""))
}

/// BEA quarterly `YYYYQn`.
pub fn bea_quarter(time: &str) -> Option<NaiveDate> {
    let (year, quarter) = time.trim().split_once('Q')?;
    quarter_start(year.parse().ok()?, quarter.parse().ok()?)
}

/// BEA monthly `YYYYMnn`.
pub fn bea_month(time: &str) -> Option<NaiveDate> {
    let (year, month) = time.trim().split_once('M')?;
    month_start(year.parse().ok()?, month.parse().ok()?)
}

/// ISO `YYYY-MM-DD`, truncated to the first of the month.
pub fn iso_month(date: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    month_start(chrono::Datelike::year(&parsed), chrono::Datelike::month(&parsed))
}

/// Spreadsheet-style `Mon-YY` (`Jan-25`); two-digit years below 50 are 20xx.
pub fn month_abbrev(date: &str) -> Option<NaiveDate> {
    let (mon, yy) = date.trim().split_once('-')?;
    let month = match mon.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    let yy: i32 = yy.parse().ok()?;
    let year = match yy {
        0..=49 => 2000 + yy,
        50..=99 => 1900 + yy,
        _ => yy,
    };
    month_start(year, month)
}
