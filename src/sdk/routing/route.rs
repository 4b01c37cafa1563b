use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate from a GeoJSON `[lon, lat]` pair.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lon: pair[0],
        }
    }
}

/// A ranked geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Short name, e.g. "Gent".
    pub name: String,
    /// Full label as returned by the geocoder.
    pub display_name: String,
    pub coord: Coord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Ordered polyline from start to end.
    pub geometry: Vec<Coord>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl Route {
    /// Zero-length route for identical start and end points.
    pub fn stationary(at: Coord) -> Self {
        Self {
            geometry: vec![at],
            distance_m: 0.0,
            duration_s: 0.0,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_s / 60.0
    }
}
