use super::types::OsrmResponse;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::{Coord, Route};
use crate::sdk::routing::service::Router;
use async_trait::async_trait;
use reqwest::Client;

pub struct OsrmRouter {
    client: Client,
    base_url: String,
}

impl OsrmRouter {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Interprets an OSRM body. Any code other than "Ok" means no route.
pub fn route_from(response: OsrmResponse) -> Option<Route> {
    if response.code != "Ok" {
        log::warn!(
            "OSRM could not route: {} {}",
            response.code,
            response.message.unwrap_or_default()
        );
        return None;
    }
    response.routes.into_iter().next().map(|r| Route {
        geometry: r.geometry.coordinates.into_iter().map(Coord::from_lon_lat).collect(),
        distance_m: r.distance,
        duration_s: r.duration,
    })
}

#[async_trait]
impl Router for OsrmRouter {
    async fn route(&self, start: Coord, end: Coord) -> Result<Option<Route>, RoutingError> {
        if start == end {
            log::debug!("Start and end coordinates are identical. Returning zero route.");
            return Ok(Some(Route::stationary(start)));
        }

        log::debug!("[PROVIDER] Calling osrm route for {:?} -> {:?}", start, end);
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, start.lon, start.lat, end.lon, end.lat
        );

        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        // OSRM reports NoRoute and friends with a 400 and a JSON body
        match serde_json::from_str::<OsrmResponse>(&text) {
            Ok(body) => Ok(route_from(body)),
            Err(e) if status.is_success() => {
                log::error!(
                    "Failed to parse OsrmResponse. URL: {}\nError: {}. Body: {}",
                    url,
                    e,
                    text
                );
                Err(RoutingError::Parse(e))
            }
            Err(_) => {
                log::error!(
                    "API returned non-success status: {}. Unparseable Body: {}",
                    status,
                    text
                );
                Err(RoutingError::RawApi {
                    status: status.as_u16(),
                    body: text,
                })
            }
        }
    }
}
