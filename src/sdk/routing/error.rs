use serde::Deserialize;
use thiserror::Error;

// Helper structs to parse the JSON error response from ORS
#[derive(Deserialize, Debug)]
pub struct OrsErrorDetail {
    pub code: u32,
    pub message: String,
}
#[derive(Deserialize, Debug)]
pub struct OrsErrorPayload {
    pub error: OrsErrorDetail,
}

/// ORS: no routable point near one of the coordinates.
pub const ORS_POINT_NOT_FOUND: u32 = 2010;
/// ORS: points are routable but not connected.
pub const ORS_ROUTE_NOT_FOUND: u32 = 2009;

#[derive(Error, Debug)]
pub enum RoutingError {
    // Structured error reported by the API
    #[error("API Error (Code {code}): {message}")]
    Api { code: u32, message: String },

    // Non-success response whose body we could not interpret
    #[error("Unstructured API Error (HTTP {status}): {body}")]
    RawApi { status: u16, body: String },

    #[error("Underlying request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RoutingError {
    /// True for ORS errors that only mean "there is no route between these points".
    pub fn is_no_route(&self) -> bool {
        matches!(
            self,
            RoutingError::Api { code, .. } if *code == ORS_POINT_NOT_FOUND || *code == ORS_ROUTE_NOT_FOUND
        )
    }
}
