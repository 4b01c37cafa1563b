//! StatBel (Belgian statistics office) fuel price dataset.
//!
//! The view returns every published price as a flat `facts` array. We keep the
//! rows for the requested product with a non-null price and take the one with
//! the latest `Period`.

use super::source::{PriceSource, PriceSourceError};
use crate::sdk::fuel::FuelKind;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const STATBEL_FUEL_PRICES_URL: &str =
    "https://bestat.statbel.fgov.be/bestat/api/views/665e2960-bf86-4d64-b4a8-90f2d30ea892/result/JSON";

#[derive(Debug, Deserialize)]
pub struct StatbelResponse {
    #[serde(default)]
    pub facts: Vec<StatbelFact>,
}

#[derive(Debug, Deserialize)]
pub struct StatbelFact {
    #[serde(rename = "Product")]
    pub product: Option<String>,
    #[serde(rename = "Price incl. VAT", default)]
    pub price_incl_vat: Value,
    #[serde(rename = "Period", default)]
    pub period: Option<String>,
}

impl StatbelFact {
    /// The price as a number; StatBel sometimes ships it as a string.
    fn price(&self) -> Option<f64> {
        match &self.price_incl_vat {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse().ok(),
            _ => None,
        }
    }

    fn period_date(&self) -> Option<NaiveDate> {
        self.period.as_deref().and_then(parse_period)
    }
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY-MM` and bare years.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return Some(date);
    }
    raw.parse::<i32>()
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
}

/// Most recent non-null price for `kind`. Rows without a readable period rank oldest.
pub fn latest_price(facts: &[StatbelFact], kind: FuelKind) -> Option<f64> {
    let label = kind.statbel_label();
    let mut matching: Vec<(Option<NaiveDate>, f64)> = facts
        .iter()
        .filter(|fact| fact.product.as_deref() == Some(label))
        .filter_map(|fact| fact.price().map(|price| (fact.period_date(), price)))
        .collect();

    matching.sort_by(|a, b| b.0.cmp(&a.0));
    matching.first().map(|(_, price)| *price)
}

pub struct StatbelSource {
    client: Client,
    name: &'static str,
    url: String,
    timeout: Duration,
}

impl StatbelSource {
    pub fn direct(client: Client, dataset_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            name: "statbel-direct",
            url: dataset_url.to_string(),
            timeout,
        }
    }

    /// Fetches the dataset through a pass-through proxy; the encoded dataset URL
    /// is appended to `proxy_prefix` (e.g. `https://proxy.example/raw?url=`).
    pub fn via_proxy(
        client: Client,
        dataset_url: &str,
        proxy_prefix: &str,
        timeout: Duration,
    ) -> Self {
        let encoded: String = url::form_urlencoded::byte_serialize(dataset_url.as_bytes()).collect();
        Self {
            client,
            name: "statbel-proxy",
            url: format!("{}{}", proxy_prefix, encoded),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PriceSource for StatbelSource {
    fn name(&self) -> &str {
        self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, kind: FuelKind) -> Result<Option<f64>, PriceSourceError> {
        log::debug!("[PRICE] Calling {} for {}", self.name, kind);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceSourceError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let body: StatbelResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse StatbelResponse. URL: {}\nError: {}",
                self.url,
                e
            );
            e
        })?;

        latest_price(&body.facts, kind)
            .map(Some)
            .ok_or(PriceSourceError::NoData(kind))
    }
}
