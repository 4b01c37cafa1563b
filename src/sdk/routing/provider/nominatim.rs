use super::types::NominatimPlace;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::{Coord, Place};
use crate::sdk::routing::service::Geocoder;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::Client;

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    countries: String,
    limiter: Limiter,
}

impl NominatimGeocoder {
    /// `countries` is a comma-separated list of ISO codes, e.g. "be,nl". Empty means worldwide.
    pub fn new(client: Client, base_url: String, countries: String, limiter: Limiter) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            countries,
            limiter,
        }
    }
}

/// Converts raw matches, dropping any whose coordinates do not parse.
pub fn places_from(raw: Vec<NominatimPlace>) -> Vec<Place> {
    raw.into_iter()
        .filter_map(|item| {
            let lat = item.lat.parse::<f64>().ok()?;
            let lon = item.lon.parse::<f64>().ok()?;
            let name = item
                .name
                .filter(|n| !n.is_empty())
                .or_else(|| item.display_name.split(',').next().map(|s| s.trim().to_string()))
                .unwrap_or_default();
            Some(Place {
                name,
                display_name: item.display_name,
                coord: Coord::new(lat, lon),
            })
        })
        .collect()
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, RoutingError> {
        self.limiter.until_ready().await;
        log::debug!("[PROVIDER] Calling nominatim search for \"{}\"", query);

        let url = format!("{}/search", self.base_url);
        let limit = limit.max(1).to_string();
        let mut params = vec![("format", "json"), ("q", query), ("limit", limit.as_str())];
        if !self.countries.is_empty() {
            params.push(("countrycodes", self.countries.as_str()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::error!("Nominatim returned {} for \"{}\". Body: {}", status, query, text);
            return Err(RoutingError::RawApi {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw: Vec<NominatimPlace> = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse Nominatim response. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        Ok(places_from(raw))
    }
}
