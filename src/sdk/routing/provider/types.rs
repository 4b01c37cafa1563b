use serde::Deserialize;

// --- Nominatim ---

#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: String,
}

// --- OSRM ---

#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub distance: f64,
    pub duration: f64,
    pub geometry: LineString,
}

// --- openrouteservice ---

#[derive(Debug, Deserialize)]
pub struct OrsGeocodeResponse {
    pub features: Vec<OrsGeocodeFeature>,
}

#[derive(Debug, Deserialize)]
pub struct OrsGeocodeFeature {
    pub geometry: PointGeometry,
    #[serde(default)]
    pub properties: OrsGeocodeProperties,
}

#[derive(Debug, Deserialize, Default)]
pub struct OrsGeocodeProperties {
    pub name: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrsDirectionsResponse {
    pub features: Vec<OrsRouteFeature>,
}

#[derive(Debug, Deserialize)]
pub struct OrsRouteFeature {
    pub geometry: LineString,
    pub properties: OrsRouteProperties,
}

#[derive(Debug, Deserialize)]
pub struct OrsRouteProperties {
    // ORS sends an empty summary for zero-length routes
    #[serde(default)]
    pub summary: OrsSummary,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct OrsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

// --- GeoJSON ---

#[derive(Debug, Deserialize)]
pub struct PointGeometry {
    pub coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}
