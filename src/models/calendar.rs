//! Release calendar shared by the calendar builder and the scheduler.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Release dates per source key (`bls`, `bea`, `census_m3`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseCalendar {
    pub last_updated: String,
    #[serde(default)]
    pub schedules: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl ReleaseCalendar {
    /// Empty calendar stamped now.
    pub fn new() -> Self {
        Self {
            last_updated: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            schedules: BTreeMap::new(),
        }
    }

    /// Replace the dates for one source.
    pub fn set(&mut self, key: impl Into<String>, dates: impl IntoIterator<Item = NaiveDate>) {
        self.schedules.insert(key.into(), dates.into_iter().collect());
    }

    /// Whether `key` publishes on `date`.
    pub fn releases_on(&self, key: &str, date: NaiveDate) -> bool {
        self.schedules
            .get(key)
            .is_some_and(|dates| dates.contains(&date))
    }

    /// Releases strictly after `date`, soonest first.
    pub fn upcoming_after(&self, date: NaiveDate) -> Vec<(NaiveDate, &str)> {
        let mut upcoming: Vec<(NaiveDate, &str)> = self
            .schedules
            .iter()
            .flat_map(|(key, dates)| {
                dates
                    .iter()
                    .filter(move |d| **d > date)
                    .map(move |d| (*d, key.as_str()))
            })
            .collect();
        upcoming.sort();
        upcoming
    }

    pub fn total_dates(&self) -> usize {
        self.schedules.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parses_calendar_file() {
        let json = r#"{
            "last_updated": "2025-01-02T00:00:00Z",
            "schedules": {
                "bls": ["2025-01-10", "2025-02-07"],
                "census_m3": ["2025-01-06"]
            }
        }"#;
        let cal: ReleaseCalendar = serde_json::from_str(json).unwrap();
        assert!(cal.releases_on("bls", d("2025-02-07")));
        assert!(!cal.releases_on("bls", d("2025-01-06")));
        assert!(!cal.releases_on("bea", d("2025-01-10")));
        assert_eq!(cal.total_dates(), 3);
    }

    #[test]
    fn test_upcoming_sorted_across_sources() {
        let mut cal = ReleaseCalendar::new();
        cal.set("bls", [d("2025-01-10"), d("2025-02-07")]);
        cal.set("bea", [d("2025-01-05"), d("2025-01-30")]);

        let upcoming = cal.upcoming_after(d("2025-01-05"));
        assert_eq!(
            upcoming,
            vec![
                (d("2025-01-10"), "bls"),
                (d("2025-01-30"), "bea"),
                (d("2025-02-07"), "bls"),
            ]
        );
    }
}
