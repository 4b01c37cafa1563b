use crate::sdk::fuel::FuelKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source name attached to quotes built from the hardcoded last-resort prices.
pub const EMERGENCY_FALLBACK_SOURCE: &str = "emergency-fallback";

/// A price per litre for one fuel kind, with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub fuel_kind: FuelKind,
    pub amount: f64,
    pub source_name: String,
    pub retrieved_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Builds a quote, rejecting amounts that are not strictly positive.
    pub fn new(
        fuel_kind: FuelKind,
        amount: f64,
        source_name: impl Into<String>,
        retrieved_at: DateTime<Utc>,
    ) -> Option<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        Some(Self {
            fuel_kind,
            amount,
            source_name: source_name.into(),
            retrieved_at,
        })
    }

    pub fn emergency(fuel_kind: FuelKind, retrieved_at: DateTime<Utc>) -> Self {
        Self {
            fuel_kind,
            amount: fuel_kind.emergency_price(),
            source_name: EMERGENCY_FALLBACK_SOURCE.to_string(),
            retrieved_at,
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.source_name == EMERGENCY_FALLBACK_SOURCE
    }
}
