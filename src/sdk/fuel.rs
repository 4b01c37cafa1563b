use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The fuel products a trip can be priced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FuelKind {
    Euro95,
    Euro98,
    Diesel,
    Lpg,
}

impl FuelKind {
    pub const ALL: [FuelKind; 4] = [
        FuelKind::Euro95,
        FuelKind::Euro98,
        FuelKind::Diesel,
        FuelKind::Lpg,
    ];

    /// Short identifier used in storage and cache keys (e.g. "euro95").
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelKind::Euro95 => "euro95",
            FuelKind::Euro98 => "euro98",
            FuelKind::Diesel => "diesel",
            FuelKind::Lpg => "lpg",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FuelKind::Euro95 => "Euro 95",
            FuelKind::Euro98 => "Euro 98",
            FuelKind::Diesel => "Diesel",
            FuelKind::Lpg => "LPG",
        }
    }

    /// Product label used by the StatBel fuel price dataset.
    pub fn statbel_label(&self) -> &'static str {
        match self {
            FuelKind::Euro95 => "Euro Super 95 E10 (€/L)",
            FuelKind::Euro98 => "Super Plus 98 E5 (€/L)",
            FuelKind::Diesel => "Road Diesel B7 (€/L)",
            FuelKind::Lpg => "LPG (€/L)",
        }
    }

    /// Kilograms of CO2 emitted per litre burned.
    pub fn emission_factor(&self) -> f64 {
        match self {
            FuelKind::Euro95 | FuelKind::Euro98 => 2.35,
            FuelKind::Diesel => 2.65,
            FuelKind::Lpg => 1.66,
        }
    }

    /// Last-resort price in €/L (Belgian averages, December 2024).
    pub fn emergency_price(&self) -> f64 {
        match self {
            FuelKind::Euro95 => 1.649,
            FuelKind::Euro98 => 1.759,
            FuelKind::Diesel => 1.689,
            FuelKind::Lpg => 0.749,
        }
    }

    pub fn cache_key(&self) -> String {
        format!("price_{}", self.as_str())
    }
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown fuel kind: {}", s))
    }
}
