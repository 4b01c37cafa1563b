pub mod cache;
pub mod error;
pub mod geocode;
pub mod provider;
pub mod route;
pub mod service;

pub use cache::GeoCache;
pub use error::RoutingError;
pub use geocode::CachedGeocoder;
pub use provider::{NominatimGeocoder, OrsProvider, OsrmRouter};
pub use route::{Coord, Place, Route};
pub use service::{Geocoder, Router};
