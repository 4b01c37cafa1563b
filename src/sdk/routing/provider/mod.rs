pub mod nominatim;
pub mod ors;
pub mod osrm;
pub mod types;

pub use nominatim::NominatimGeocoder;
pub use ors::OrsProvider;
pub use osrm::OsrmRouter;
