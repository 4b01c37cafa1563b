use crate::sdk::pricing::statbel::STATBEL_FUEL_PRICES_URL;
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Which services answer geocoding and routing requests.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingBackend {
    /// Nominatim for geocoding, OSRM for directions.
    Osm {
        nominatim_url: String,
        osrm_url: String,
    },
    /// openrouteservice for both.
    Ors { api_key: String, base_url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSettings {
    pub statbel_url: String,
    pub proxy_url: Option<String>,
    pub direct_timeout: Duration,
    pub proxy_timeout: Duration,
    pub cache_ttl: chrono::Duration,
    pub seasonal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend: RoutingBackend,
    pub countries: String,
    pub user_agent: String,
    pub prices: PriceSettings,
    pub history_path: PathBuf,
    pub geo_cache_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let backend = match text("ROUTING_BACKEND", "osm").to_lowercase().as_str() {
            "osm" => RoutingBackend::Osm {
                nominatim_url: text("NOMINATIM_URL", "https://nominatim.openstreetmap.org"),
                osrm_url: text("OSRM_URL", "https://router.project-osrm.org"),
            },
            "ors" => RoutingBackend::Ors {
                api_key: get("ORS_API_KEY").ok_or(ConfigError::Missing("ORS_API_KEY"))?,
                base_url: text("ORS_BASE_URL", "https://api.openrouteservice.org"),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "ROUTING_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let prices = PriceSettings {
            statbel_url: text("STATBEL_URL", STATBEL_FUEL_PRICES_URL),
            proxy_url: get("PRICE_PROXY_URL"),
            direct_timeout: Duration::from_secs(positive(&get, "PRICE_DIRECT_TIMEOUT_SECS", 5u64)?),
            proxy_timeout: Duration::from_secs(positive(&get, "PRICE_PROXY_TIMEOUT_SECS", 8u64)?),
            cache_ttl: cache_ttl(&get)?,
            seasonal: parse(&get, "SEASONAL_PRICES", true)?,
        };

        Ok(Self {
            backend,
            countries: text("GEOCODE_COUNTRIES", "be,nl"),
            user_agent: text(
                "HTTP_USER_AGENT",
                concat!("fueltracker/", env!("CARGO_PKG_VERSION")),
            ),
            prices,
            history_path: PathBuf::from(text("HISTORY_PATH", "fueltracker_history.json")),
            geo_cache_path: PathBuf::from(text("GEO_CACHE_PATH", "geo_cache.json")),
        })
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Like [`parse`], but zero and negative values are rejected too.
fn positive<T: FromStr + PartialOrd + Default + ToString>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let value = parse(get, key, default)?;
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

fn cache_ttl(get: &impl Fn(&str) -> Option<String>) -> Result<chrono::Duration, ConfigError> {
    const KEY: &str = "PRICE_CACHE_TTL_HOURS";
    let hours = positive(get, KEY, 24i64)?;
    chrono::Duration::try_hours(hours).ok_or(ConfigError::Invalid {
        key: KEY,
        value: hours.to_string(),
    })
}
