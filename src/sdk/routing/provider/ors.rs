use super::types::{OrsDirectionsResponse, OrsGeocodeResponse};
use crate::sdk::routing::error::{OrsErrorPayload, RoutingError};
use crate::sdk::routing::route::{Coord, Place, Route};
use crate::sdk::routing::service::{Geocoder, Router};
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// openrouteservice: geocoding and driving directions behind one API key.
pub struct OrsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    countries: String,
    limiter: Limiter,
}

impl OrsProvider {
    pub fn new(
        client: Client,
        api_key: String,
        base_url: String,
        countries: &str,
        limiter: Limiter,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            countries: countries.to_uppercase(),
            limiter,
        }
    }
}

pub fn places_from(resp: OrsGeocodeResponse) -> Vec<Place> {
    resp.features
        .into_iter()
        .map(|f| {
            let display_name = f.properties.label.unwrap_or_default();
            let name = f
                .properties
                .name
                .unwrap_or_else(|| display_name.split(',').next().unwrap_or_default().trim().to_string());
            Place {
                name,
                display_name,
                coord: Coord::from_lon_lat(f.geometry.coordinates),
            }
        })
        .collect()
}

pub fn route_from(resp: OrsDirectionsResponse) -> Option<Route> {
    resp.features.into_iter().next().map(|f| Route {
        geometry: f.geometry.coordinates.into_iter().map(Coord::from_lon_lat).collect(),
        distance_m: f.properties.summary.distance,
        duration_s: f.properties.summary.duration,
    })
}

#[async_trait]
impl Geocoder for OrsProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, RoutingError> {
        self.limiter.until_ready().await;
        log::debug!("[PROVIDER] Calling ors geocode for \"{}\"", query);

        let url = format!("{}/geocode/search", self.base_url);
        let size = limit.max(1).to_string();
        let mut params = vec![
            ("api_key", self.api_key.as_str()),
            ("text", query),
            ("size", size.as_str()),
        ];
        if !self.countries.is_empty() {
            params.push(("boundary.country", self.countries.as_str()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let text = response.text().await?;

        let resp: OrsGeocodeResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse GeoResponse. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        Ok(places_from(resp))
    }
}

#[async_trait]
impl Router for OrsProvider {
    async fn route(&self, start: Coord, end: Coord) -> Result<Option<Route>, RoutingError> {
        if start == end {
            return Ok(Some(Route::stationary(start)));
        }

        self.limiter.until_ready().await;
        log::debug!("[PROVIDER] Calling ors directions for {:?} -> {:?}", start, end);
        let url = format!("{}/v2/directions/driving-car/geojson", self.base_url);
        let body = json!({ "coordinates": [[start.lon, start.lat], [end.lon, end.lat]] });

        let response = match self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("Failed to send POST request. URL: {}\nError: {}", url, e);
                return Err(RoutingError::Request(e));
            }
        };

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Try to parse the structured error first
            let err = match serde_json::from_str::<OrsErrorPayload>(&text) {
                Ok(payload) => RoutingError::Api {
                    code: payload.error.code,
                    message: payload.error.message,
                },
                Err(_) => {
                    log::error!(
                        "API returned non-success status: {}. Unparseable Body: {}",
                        status,
                        text
                    );
                    RoutingError::RawApi {
                        status: status.as_u16(),
                        body: text,
                    }
                }
            };
            if err.is_no_route() {
                log::warn!("ORS could not route {:?} -> {:?}: {}", start, end, err);
                return Ok(None);
            }
            return Err(err);
        }

        let resp: OrsDirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse DirectionsResponse. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        Ok(route_from(resp))
    }
}
