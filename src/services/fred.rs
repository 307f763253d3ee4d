//! Industrial production indexes from the FRED observations API.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Frequency, Metadata, ObservationPoint, SeriesAccumulator, TimeSeriesDocument};
use crate::services::ip_series::IP_SERIES;
use crate::services::{FetchContext, FetchReport, Fetcher, FetcherId};
use crate::utils::http;

const FRED_OBSERVATIONS: &str = "https://api.stlouisfed.org/fred/series/observations";
const OUTPUT: &str = "industrial_production/industrial_production.json";

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// Parse an observations payload. FRED writes missing values as `"."`.
pub fn parse_observations(body: &[u8]) -> Result<Vec<ObservationPoint>> {
    let response: ObservationsResponse = serde_json::from_slice(body)?;
    Ok(response
        .observations
        .into_iter()
        .filter_map(|obs| {
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").ok()?;
            let value = match obs.value.trim() {
                "." | "" => None,
                v => v.parse().ok(),
            };
            Some(ObservationPoint { date, value })
        })
        .collect())
}

/// Assemble the industrial production document from per-series results.
/// Failed or empty series are skipped and noted on `report`; the document
/// is built from whatever succeeded, even if that is nothing.
pub fn assemble_document(
    results: Vec<(&str, &str, Result<Vec<ObservationPoint>>)>,
    report: &mut FetchReport,
) -> TimeSeriesDocument {
    let mut acc: SeriesAccumulator<usize> = SeriesAccumulator::new();
    for (i, (series_id, name, result)) in results.into_iter().enumerate() {
        match result {
            Ok(points) if points.len() >= 2 => {
                for point in points {
                    acc.push(i, series_id, name, point.date, point.value);
                }
            }
            Ok(_) => report.fail(series_id, "no data"),
            Err(e) => report.fail(series_id, e.to_string()),
        }
    }

    let metadata = Metadata::new(
        "Industrial Production",
        "Federal Reserve (FRED)",
        "Index 2017=100",
        Frequency::Monthly,
    );
    TimeSeriesDocument::new(metadata, acc.finish())
}

/// FRED industrial production fetcher.
pub struct FredFetcher;

impl FredFetcher {
    async fn fetch_series(&self, ctx: &FetchContext, key: &str, series_id: &str) -> Result<Vec<ObservationPoint>> {
        let request = ctx.client.get(FRED_OBSERVATIONS).query(&[
            ("series_id", series_id),
            ("api_key", key),
            ("file_type", "json"),
            ("observation_start", ctx.config.fetch.observation_start.as_str()),
        ]);
        let body = ctx.client.bytes(request).await?;
        parse_observations(&body)
    }
}

#[async_trait]
impl Fetcher for FredFetcher {
    fn id(&self) -> FetcherId {
        FetcherId::IndustrialProduction
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchReport> {
        let key = ctx.keys.require("fred")?;
        let total = IP_SERIES.len();
        log::info!("  {} series to fetch", total);

        let mut results = Vec::with_capacity(total);
        for (i, (series_id, name)) in IP_SERIES.iter().enumerate() {
            log::debug!("  [{}/{}] {} - {}", i + 1, total, series_id, name);
            let result = self.fetch_series(ctx, key, series_id).await;
            if let Err(e) = &result {
                log::warn!("  Skipping {}: {}", series_id, e);
            }
            results.push((*series_id, *name, result));
            http::pause(ctx.config.rate_limits.fred_ms).await;
        }

        let mut report = FetchReport::default();
        let document = assemble_document(results, &mut report);
        if !report.failures.is_empty() {
            let ids: Vec<&str> = report.failures.iter().map(|(id, _)| id.as_str()).collect();
            log::warn!("  {} of {} series failed: {}", ids.len(), total, ids.join(", "));
        }
        ctx.storage.save_document(OUTPUT, &document).await?;
        report.record(OUTPUT, document.series.len());
        Ok(report)
    }
}
