//! Unemployment rates by industry (CPS) from the BLS Public Data API v2.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Frequency, Metadata, SeriesAccumulator, TimeSeriesDocument};
use crate::services::{FetchContext, FetchReport, Fetcher, FetcherId};
use crate::utils::{http, period};

const BLS_API_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
const OUTPUT: &str = "unemployment/unemployment.json";

/// `(series id, name)` in display order.
pub static SERIES: &[(&str, &str)] = &[
    ("LNU04000000", "Total Unemployment Rate"),
    ("LNU04032230", "Agriculture"),
    ("LNU04032231", "Mining, Quarrying, and Oil and Gas"),
    ("LNU04032232", "Construction"),
    ("LNU04032233", "Manufacturing"),
    ("LNU04032235", "Wholesale and Retail Trade"),
    ("LNU04032236", "Transportation and Utilities"),
    ("LNU04032237", "Information"),
    ("LNU04032238", "Financial Activities"),
    ("LNU04032239", "Professional and Business Services"),
    ("LNU04032240", "Education and Health Services"),
    ("LNU04032241", "Leisure and Hospitality"),
    ("LNU04032242", "Other Services"),
    ("LNU04032243", "Public Administration"),
    ("LNU04032244", "Armed Forces"),
    ("LNU04032234", "Durable Goods Manufacturing"),
];

#[derive(Debug, Serialize)]
struct BlsRequest<'a> {
    seriesid: Vec<&'a str>,
    startyear: String,
    endyear: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrationkey: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct BlsResponse {
    status: String,
    #[serde(default)]
    message: Vec<String>,
    #[serde(rename = "Results", default)]
    results: Option<BlsResults>,
}

#[derive(Debug, Default, Deserialize)]
struct BlsResults {
    #[serde(default)]
    series: Vec<BlsSeries>,
}

#[derive(Debug, Deserialize)]
struct BlsSeries {
    #[serde(rename = "seriesID")]
    series_id: String,
    #[serde(default)]
    data: Vec<BlsPoint>,
}

#[derive(Debug, Deserialize)]
struct BlsPoint {
    year: String,
    period: String,
    value: String,
}

/// Inclusive year ranges of at most `span` years covering `first..=last`.
pub fn year_chunks(first: i32, last: i32, span: i32) -> Vec<(i32, i32)> {
    let span = span.max(1);
    let mut chunks = Vec::new();
    let mut start = first;
    while start <= last {
        let end = (start + span - 1).min(last);
        chunks.push((start, end));
        start = end + 1;
    }
    chunks
}

/// Add one API response to the accumulator.
///
/// Values that do not parse are skipped rather than stored as null.
fn absorb(acc: &mut SeriesAccumulator<usize>, body: &[u8]) -> Result<()> {
    let response: BlsResponse = serde_json::from_slice(body)?;
    if response.status != "REQUEST_SUCCEEDED" {
        let message = if response.message.is_empty() {
            response.status
        } else {
            response.message.join("; ")
        };
        return Err(AppError::api("BLS", message));
    }

    for series in response.results.unwrap_or_default().series {
        let Some(order) = SERIES.iter().position(|(id, _)| *id == series.series_id) else {
            continue;
        };
        let name = SERIES[order].1;
        for point in series.data {
            let Some(date) = period::bls_period(&point.year, &point.period) else {
                continue;
            };
            let Ok(value) = point.value.trim().parse::<f64>() else {
                continue;
            };
            acc.push(order, series.series_id.as_str(), name, date, Some(value));
        }
    }
    Ok(())
}

/// BLS unemployment-by-industry fetcher.
pub struct UnemploymentFetcher;

#[async_trait]
impl Fetcher for UnemploymentFetcher {
    fn id(&self) -> FetcherId {
        FetcherId::Unemployment
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchReport> {
        // The key only raises quotas; the API works without one.
        let key = ctx.keys.get("bls");
        let first = NaiveDate::parse_from_str(&ctx.config.fetch.observation_start, "%Y-%m-%d")
            .map(|d| d.year())
            .unwrap_or(2000);
        let chunks = year_chunks(first, Utc::now().year(), ctx.config.fetch.bls_chunk_years);

        let mut acc: SeriesAccumulator<usize> = SeriesAccumulator::new();
        let mut errors = Vec::new();

        for (i, (start, end)) in chunks.iter().enumerate() {
            if i > 0 {
                http::pause(ctx.config.rate_limits.bls_ms).await;
            }
            log::info!("  Requesting {}-{}...", start, end);
            let payload = BlsRequest {
                seriesid: SERIES.iter().map(|(id, _)| *id).collect(),
                startyear: start.to_string(),
                endyear: end.to_string(),
                registrationkey: key,
            };
            let request = ctx.client.post(BLS_API_URL).json(&payload);
            let outcome = match ctx.client.bytes(request).await {
                Ok(body) => absorb(&mut acc, &body),
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                log::warn!("  {}-{}: {}", start, end, e);
                errors.push(e);
            }
        }

        if acc.is_empty() {
            return Err(errors
                .pop()
                .unwrap_or_else(|| AppError::api("BLS", "no series returned")));
        }

        let metadata = Metadata::new(
            "Unemployment Rate by Industry",
            "BLS Current Population Survey",
            "Percent",
            Frequency::Monthly,
        );
        let document = TimeSeriesDocument::new(metadata, acc.finish());
        ctx.storage.save_document(OUTPUT, &document).await?;

        let mut report = FetchReport::default();
        report.record(OUTPUT, document.series.len());
        Ok(report)
    }
}
