use super::error::RoutingError;
use super::route::{Coord, Place, Route};
use async_trait::async_trait;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Matches for a free-text address, best first. Empty when nothing matches.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, RoutingError>;

    /// The highest-ranked match, if any.
    async fn geocode(&self, query: &str) -> Result<Option<Place>, RoutingError> {
        Ok(self.search(query, 1).await?.into_iter().next())
    }
}

#[async_trait]
pub trait Router: Send + Sync {
    /// Driving route between two points. `Ok(None)` when the service cannot route them.
    async fn route(&self, start: Coord, end: Coord) -> Result<Option<Route>, RoutingError>;
}
