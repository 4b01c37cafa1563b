//! Trip cost calculation: geocode both ends, route between them, price the fuel.
//!
//! The calculator never writes history itself; callers decide whether to
//! persist the returned [`TripRecord`].

use super::fuel::FuelKind;
use super::pricing::{PriceQuote, PriceResolver};
use super::routing::{Geocoder, Place, Router};
use super::util::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const MIN_CONSUMPTION: f64 = 2.0;
pub const MAX_CONSUMPTION: f64 = 25.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TripError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Lookup(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub departure_label: String,
    pub destination_label: String,
    pub distance_km: f64,
    pub duration_min: f64,
    pub consumption_l_per_100km: f64,
    pub fuel_kind: FuelKind,
    pub price_per_liter: f64,
    #[serde(default)]
    pub price_source: String,
    pub fuel_liters: f64,
    pub cost_total: f64,
    pub co2_kg: f64,
    pub created_at: DateTime<Utc>,
}

impl TripRecord {
    /// Derives litres, cost and CO2 from the route figures and a price snapshot.
    pub fn compute(
        departure_label: String,
        destination_label: String,
        distance_km: f64,
        duration_min: f64,
        consumption_l_per_100km: f64,
        quote: &PriceQuote,
        created_at: DateTime<Utc>,
    ) -> Self {
        let fuel_liters = distance_km * consumption_l_per_100km / 100.0;
        Self {
            departure_label,
            destination_label,
            distance_km,
            duration_min,
            consumption_l_per_100km,
            fuel_kind: quote.fuel_kind,
            price_per_liter: quote.amount,
            price_source: quote.source_name.clone(),
            fuel_liters,
            cost_total: fuel_liters * quote.amount,
            co2_kg: fuel_liters * quote.fuel_kind.emission_factor(),
            created_at,
        }
    }
}

/// Checks user input before any network traffic happens.
pub fn validate_input(departure: &str, destination: &str, consumption: f64) -> Result<(), TripError> {
    if departure.trim().is_empty() || destination.trim().is_empty() {
        return Err(TripError::Validation(
            "Both departure and destination addresses are required".into(),
        ));
    }
    if !consumption.is_finite() || !(MIN_CONSUMPTION..=MAX_CONSUMPTION).contains(&consumption) {
        return Err(TripError::Validation(format!(
            "Enter a realistic fuel consumption ({}-{} L/100km), got {}",
            MIN_CONSUMPTION, MAX_CONSUMPTION, consumption
        )));
    }
    Ok(())
}

pub struct TripCalculator {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn Router>,
    resolver: PriceResolver,
    clock: Arc<dyn Clock>,
}

impl TripCalculator {
    pub fn new(geocoder: Arc<dyn Geocoder>, router: Arc<dyn Router>, resolver: PriceResolver) -> Self {
        Self::with_clock(geocoder, router, resolver, Arc::new(SystemClock))
    }

    pub fn with_clock(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn Router>,
        resolver: PriceResolver,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            geocoder,
            router,
            resolver,
            clock,
        }
    }

    pub async fn current_price(&mut self, kind: FuelKind) -> PriceQuote {
        self.resolver.resolve(kind).await
    }

    async fn locate(&self, address: &str) -> Result<Place, TripError> {
        match self.geocoder.geocode(address.trim()).await {
            Ok(Some(place)) => Ok(place),
            Ok(None) => {
                log::warn!("No geocode results for \"{}\"", address);
                Err(TripError::Lookup("address not found".into()))
            }
            Err(e) => {
                log::error!("Geocoding error for \"{}\": {}", address, e);
                Err(TripError::Lookup("address not found".into()))
            }
        }
    }

    pub async fn compute_trip(
        &mut self,
        departure: &str,
        destination: &str,
        consumption: f64,
        kind: FuelKind,
    ) -> Result<TripRecord, TripError> {
        validate_input(departure, destination, consumption)?;

        let from = self.locate(departure).await?;
        let to = self.locate(destination).await?;
        log::debug!("Routing {:?} -> {:?}", from.coord, to.coord);

        let route = match self.router.route(from.coord, to.coord).await {
            Ok(Some(route)) => route,
            Ok(None) => return Err(TripError::Lookup("route not found".into())),
            Err(e) => {
                log::error!("Routing error for {} -> {}: {}", departure, destination, e);
                return Err(TripError::Lookup("route not found".into()));
            }
        };

        let quote = self.resolver.resolve(kind).await;
        let record = TripRecord::compute(
            departure.trim().to_string(),
            destination.trim().to_string(),
            route.distance_km(),
            route.duration_min(),
            consumption,
            &quote,
            self.clock.now(),
        );

        log::info!(
            "{} → {}: {:.1} km, {:.2} L, €{:.2}, {:.1} kg CO2",
            record.departure_label,
            record.destination_label,
            record.distance_km,
            record.fuel_liters,
            record.cost_total,
            record.co2_kg
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(kind: FuelKind, amount: f64) -> PriceQuote {
        PriceQuote::new(kind, amount, "test", Utc::now()).unwrap()
    }

    #[test]
    fn cost_formula() {
        let record = TripRecord::compute(
            "A".into(),
            "B".into(),
            100.0,
            60.0,
            6.0,
            &quote(FuelKind::Euro95, 1.70),
            Utc::now(),
        );
        assert!((record.fuel_liters - 6.0).abs() < 1e-9);
        assert!((record.cost_total - 10.20).abs() < 0.01);
        assert!((record.co2_kg - 6.0 * 2.35).abs() < 1e-9);
        assert_eq!(record.price_source, "test");
    }

    #[test]
    fn co2_depends_on_fuel_kind() {
        let diesel = TripRecord::compute("A".into(), "B".into(), 100.0, 60.0, 5.0, &quote(FuelKind::Diesel, 1.6), Utc::now());
        let lpg = TripRecord::compute("A".into(), "B".into(), 100.0, 60.0, 5.0, &quote(FuelKind::Lpg, 0.7), Utc::now());
        assert!((diesel.co2_kg - 5.0 * 2.65).abs() < 1e-9);
        assert!((lpg.co2_kg - 5.0 * 1.66).abs() < 1e-9);
    }

    #[test]
    fn consumption_bounds_are_inclusive() {
        assert!(validate_input("A", "B", 2.0).is_ok());
        assert!(validate_input("A", "B", 25.0).is_ok());
        assert!(matches!(validate_input("A", "B", 1.99), Err(TripError::Validation(_))));
        assert!(matches!(validate_input("A", "B", 25.01), Err(TripError::Validation(_))));
        assert!(matches!(validate_input("A", "B", f64::NAN), Err(TripError::Validation(_))));
    }

    #[test]
    fn blank_addresses_are_rejected() {
        assert!(matches!(validate_input("", "B", 6.0), Err(TripError::Validation(_))));
        assert!(matches!(validate_input("A", "   ", 6.0), Err(TripError::Validation(_))));
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = TripRecord::compute("Gent".into(), "Brugge".into(), 50.0, 40.0, 6.5, &quote(FuelKind::Lpg, 0.75), Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"fuel_kind\":\"lpg\""));
        let back: TripRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
