//! The common `{metadata, series[]}` document every fetcher writes.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Series with fewer observations than this are never written.
pub const MIN_OBSERVATIONS: usize = 2;

/// Sampling frequency of every series in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
}

/// Document-level descriptive fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub source: String,
    pub unit: String,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Metadata {
    /// Metadata stamped with the current UTC time.
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        unit: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            unit: unit.into(),
            frequency,
            last_updated: Some(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        }
    }

    /// Same fields with a different title and unit, freshly stamped.
    pub fn derive(&self, title: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(title, self.source.clone(), unit, self.frequency)
    }
}

/// A single dated observation. `None` marks a suppressed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// One named time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub name: String,
    pub display_order: usize,
    pub data: Vec<ObservationPoint>,
}

impl Series {
    /// Number of observations carrying a value.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|p| p.value.is_some()).count()
    }
}

/// A complete data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesDocument {
    pub metadata: Metadata,
    pub series: Vec<Series>,
}

impl TimeSeriesDocument {
    pub fn new(metadata: Metadata, series: Vec<Series>) -> Self {
        Self { metadata, series }
    }

    /// Keep series matching `keep`, renumbering `display_order` from zero.
    pub fn filtered(&self, metadata: Metadata, keep: impl Fn(&Series) -> bool) -> Self {
        let series = self.series.iter().filter(|s| keep(s)).cloned().collect();
        Self::new(metadata, renumber(series))
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Reassign `display_order` to match vector position.
pub fn renumber(mut series: Vec<Series>) -> Vec<Series> {
    for (i, s) in series.iter_mut().enumerate() {
        s.display_order = i;
    }
    series
}

#[derive(Debug, Default)]
struct Draft {
    name: String,
    points: Vec<ObservationPoint>,
}

/// Collects parsed rows into series keyed by a sort key.
///
/// Series come out ordered by key, dates ascending, the first row for a
/// repeated date kept, and anything shorter than [`MIN_OBSERVATIONS`] dropped.
#[derive(Debug, Default)]
pub struct SeriesAccumulator<K: Ord> {
    drafts: BTreeMap<K, (String, Draft)>,
}

impl<K: Ord> SeriesAccumulator<K> {
    pub fn new() -> Self {
        Self {
            drafts: BTreeMap::new(),
        }
    }

    /// Register a series so that its name is known even before any rows.
    pub fn declare(&mut self, key: K, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();
        self.drafts.entry(key).or_insert_with(|| {
            (
                id,
                Draft {
                    name,
                    points: Vec::new(),
                },
            )
        });
    }

    /// Add one observation, creating the series on first sight.
    pub fn push(
        &mut self,
        key: K,
        id: impl Into<String>,
        name: impl Into<String>,
        date: NaiveDate,
        value: Option<f64>,
    ) {
        let entry = self.drafts.entry(key).or_insert_with(|| {
            (
                id.into(),
                Draft {
                    name: name.into(),
                    points: Vec::new(),
                },
            )
        });
        entry.1.points.push(ObservationPoint { date, value });
    }

    /// Number of distinct series seen so far.
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Finalize into ordered series.
    pub fn finish(self) -> Vec<Series> {
        let series = self
            .drafts
            .into_values()
            .filter_map(|(id, draft)| {
                let data = sort_dedup(draft.points);
                (data.len() >= MIN_OBSERVATIONS).then_some(Series {
                    id,
                    name: draft.name,
                    display_order: 0,
                    data,
                })
            })
            .collect();
        renumber(series)
    }
}

fn sort_dedup(mut points: Vec<ObservationPoint>) -> Vec<ObservationPoint> {
    // Stable sort keeps arrival order among equal dates.
    points.sort_by_key(|p| p.date);
    let mut seen = HashSet::new();
    points.retain(|p| seen.insert(p.date));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_short_series_are_dropped() {
        let mut acc = SeriesAccumulator::new();
        acc.push("A", "A_VS", "Alpha", date(2024, 1), Some(1.0));
        acc.push("B", "B_VS", "Beta", date(2024, 1), Some(1.0));
        acc.push("B", "B_VS", "Beta", date(2024, 2), Some(2.0));
        acc.declare("C", "C_VS", "Gamma");

        let series = acc.finish();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].id, "B_VS");
        assert!(series.iter().all(|s| s.data.len() >= MIN_OBSERVATIONS));
    }

    #[test]
    fn test_output_sorted_and_deduplicated() {
        let mut acc = SeriesAccumulator::new();
        acc.push(1, "X", "X", date(2024, 3), Some(3.0));
        acc.push(1, "X", "X", date(2024, 1), Some(1.0));
        acc.push(1, "X", "X", date(2024, 3), Some(99.0));
        acc.push(1, "X", "X", date(2024, 2), None);

        let series = acc.finish();
        let dates: Vec<_> = series[0].data.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1), date(2024, 2), date(2024, 3)]);
        assert_eq!(series[0].data[2].value, Some(3.0));
        assert_eq!(series[0].data[1].value, None);
    }

    #[test]
    fn test_display_order_follows_key() {
        let mut acc = SeriesAccumulator::new();
        for key in ["b", "a", "c"] {
            acc.push(key, key, key, date(2024, 1), Some(1.0));
            acc.push(key, key, key, date(2024, 2), Some(1.0));
        }
        let ids: Vec<_> = acc
            .finish()
            .into_iter()
            .map(|s| (s.id, s.display_order))
            .collect();
        assert_eq!(
            ids,
            vec![("a".into(), 0), ("b".into(), 1), ("c".into(), 2)]
        );
    }

    #[test]
    fn test_null_values_serialize_as_null() {
        let point = ObservationPoint {
            date: date(2024, 4),
            value: None,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"date":"2024-04-01","value":null}"#);
    }

    #[test]
    fn test_metadata_without_timestamp_parses() {
        let json = r#"{"title":"t","source":"s","unit":"u","frequency":"quarterly"}"#;
        let meta: Metadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.frequency, Frequency::Quarterly);
        assert!(meta.last_updated.is_none());
    }
}
