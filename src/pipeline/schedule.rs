//! Release-calendar driven scheduling.
//!
//! A source is due on days its calendar lists, once Eastern time passes
//! its official release time plus the configured delay. Nothing is
//! remembered between runs: a source due today is fetched on every
//! trigger after its release.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};

use crate::models::ReleaseCalendar;
use crate::services::FetcherId;

/// A calendar key and what it triggers.
#[derive(Debug)]
pub struct ReleaseSource {
    pub key: &'static str,
    /// Official release time, US Eastern
    pub hour: u32,
    pub minute: u32,
    pub fetchers: &'static [FetcherId],
}

impl ReleaseSource {
    pub fn release_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// `8:30 AM ET` style label.
    pub fn release_label(&self) -> String {
        format!("{}", self.release_time().format("%-I:%M %p ET"))
    }
}

pub static RELEASE_SOURCES: &[ReleaseSource] = &[
    ReleaseSource {
        key: "bls",
        hour: 8,
        minute: 30,
        fetchers: &[FetcherId::Ces, FetcherId::Unemployment],
    },
    ReleaseSource {
        key: "bea",
        hour: 8,
        minute: 30,
        fetchers: &[FetcherId::Nipa],
    },
    ReleaseSource {
        key: "census_m3",
        hour: 10,
        minute: 0,
        fetchers: &[FetcherId::M3],
    },
    ReleaseSource {
        key: "census_construction",
        hour: 10,
        minute: 0,
        fetchers: &[FetcherId::Construction],
    },
    ReleaseSource {
        key: "census_wholesale",
        hour: 10,
        minute: 0,
        fetchers: &[FetcherId::Wholesale],
    },
    ReleaseSource {
        key: "census_qss",
        hour: 10,
        minute: 0,
        fetchers: &[FetcherId::Qss],
    },
    ReleaseSource {
        key: "fred_ip",
        hour: 9,
        minute: 15,
        fetchers: &[FetcherId::IndustrialProduction],
    },
];

fn utc_at(date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, 0, 0).map(|dt| Utc.from_utc_datetime(&dt))
}

/// Whether US daylight saving time is in effect at `utc`.
///
/// DST starts at 02:00 EST on the second Sunday of March (07:00 UTC) and
/// ends at 02:00 EDT on the first Sunday of November (06:00 UTC).
pub fn is_us_dst(utc: DateTime<Utc>) -> bool {
    let year = chrono::Datelike::year(&utc);
    let start = NaiveDate::from_weekday_of_month_opt(year, 3, Weekday::Sun, 2).and_then(|d| utc_at(d, 7));
    let end = NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Sun, 1).and_then(|d| utc_at(d, 6));
    match (start, end) {
        (Some(start), Some(end)) => utc >= start && utc < end,
        _ => false,
    }
}

/// Wall-clock time in New York.
pub fn to_eastern(utc: DateTime<Utc>) -> NaiveDateTime {
    let offset = if is_us_dst(utc) { 4 } else { 5 };
    utc.naive_utc() - Duration::hours(offset)
}

/// A source released today whose fetch window has not opened yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waiting {
    pub key: &'static str,
    pub fetcher: FetcherId,
    pub release_label: String,
}

/// What a scheduled run should do right now.
#[derive(Debug, Clone, Default)]
pub struct SchedulePlan {
    pub today: Option<NaiveDate>,
    /// Fetchers to run, in source order, without repeats
    pub ready: Vec<FetcherId>,
    pub waiting: Vec<Waiting>,
    /// Next release per source after today, soonest first
    pub upcoming: Vec<(NaiveDate, String)>,
}

impl SchedulePlan {
    pub fn has_work(&self) -> bool {
        !self.ready.is_empty()
    }
}

/// Decide which fetchers are due at Eastern wall-clock time `now`.
pub fn plan(
    calendar: &ReleaseCalendar,
    now: NaiveDateTime,
    delay_minutes: i64,
    upcoming_count: usize,
) -> SchedulePlan {
    let today = now.date();
    let delay = Duration::minutes(delay_minutes);
    let mut plan = SchedulePlan {
        today: Some(today),
        ..SchedulePlan::default()
    };
    let mut seen = HashSet::new();

    for source in RELEASE_SOURCES {
        if !calendar.releases_on(source.key, today) {
            continue;
        }
        let fetch_after = today.and_time(source.release_time()) + delay;
        if now >= fetch_after {
            for id in source.fetchers {
                if seen.insert(*id) {
                    plan.ready.push(*id);
                }
            }
        } else {
            plan.waiting.extend(source.fetchers.iter().map(|id| Waiting {
                key: source.key,
                fetcher: *id,
                release_label: source.release_label(),
            }));
        }
    }

    let mut listed = HashSet::new();
    plan.upcoming = calendar
        .upcoming_after(today)
        .into_iter()
        .filter(|(_, key)| listed.insert(*key))
        .take(upcoming_count)
        .map(|(date, key)| (date, key.to_string()))
        .collect();
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&at(date(y, mo, d), h, mi))
    }

    fn calendar() -> ReleaseCalendar {
        let mut calendar = ReleaseCalendar::new();
        calendar.set("bls", [date(2025, 3, 7), date(2025, 4, 4)]);
        calendar.set("census_m3", [date(2025, 3, 7), date(2025, 4, 3)]);
        calendar.set("fred_ip", [date(2025, 3, 18)]);
        calendar.set("unknown_source", [date(2025, 3, 7)]);
        calendar
    }

    #[test]
    fn test_dst_boundaries() {
        // 2025: DST from Sunday March 9 to Sunday November 2.
        assert!(!is_us_dst(utc(2025, 3, 9, 6, 59)));
        assert!(is_us_dst(utc(2025, 3, 9, 7, 0)));
        assert!(is_us_dst(utc(2025, 11, 2, 5, 59)));
        assert!(!is_us_dst(utc(2025, 11, 2, 6, 0)));
        assert!(!is_us_dst(utc(2025, 1, 15, 12, 0)));
    }

    #[test]
    fn test_to_eastern() {
        assert_eq!(to_eastern(utc(2025, 1, 10, 13, 35)), at(date(2025, 1, 10), 8, 35));
        assert_eq!(to_eastern(utc(2025, 7, 3, 12, 35)), at(date(2025, 7, 3), 8, 35));
        // Early UTC morning is still the previous day in New York.
        assert_eq!(to_eastern(utc(2025, 7, 4, 2, 0)), at(date(2025, 7, 3), 22, 0));
    }

    #[test]
    fn test_ready_and_waiting_split() {
        let plan = plan(&calendar(), at(date(2025, 3, 7), 8, 40), 5, 5);

        assert_eq!(plan.ready, vec![FetcherId::Ces, FetcherId::Unemployment]);
        assert_eq!(plan.waiting.len(), 1);
        assert_eq!(plan.waiting[0].fetcher, FetcherId::M3);
        assert_eq!(plan.waiting[0].release_label, "10:00 AM ET");
        assert!(plan.has_work());
    }

    #[test]
    fn test_delay_is_inclusive() {
        let before = plan(&calendar(), at(date(2025, 3, 7), 8, 34), 5, 5);
        assert!(before.ready.is_empty());
        assert_eq!(before.waiting.len(), 3);

        let after = plan(&calendar(), at(date(2025, 3, 7), 8, 35), 5, 5);
        assert_eq!(after.ready.len(), 2);
    }

    #[test]
    fn test_release_crossing_the_hour() {
        let plan = plan(&calendar(), at(date(2025, 3, 18), 9, 59), 45, 5);
        assert!(plan.ready.is_empty());
        let plan = super::plan(&calendar(), at(date(2025, 3, 18), 10, 0), 45, 5);
        assert_eq!(plan.ready, vec![FetcherId::IndustrialProduction]);
    }

    #[test]
    fn test_quiet_day_lists_next_release_per_source() {
        let plan = plan(&calendar(), at(date(2025, 3, 10), 12, 0), 5, 2);
        assert!(!plan.has_work());
        assert!(plan.waiting.is_empty());
        assert_eq!(
            plan.upcoming,
            vec![(date(2025, 3, 18), "fred_ip".to_string()), (date(2025, 4, 3), "census_m3".to_string())]
        );
    }
}
