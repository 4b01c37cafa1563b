pub mod sdk;

pub use sdk::config::AppConfig;
pub use sdk::fuel::FuelKind;
pub use sdk::history::{HistoryStore, JsonFileHistoryStore};
pub use sdk::pricing::{PriceQuote, PriceResolver};
pub use sdk::trip::{TripCalculator, TripError, TripRecord};
