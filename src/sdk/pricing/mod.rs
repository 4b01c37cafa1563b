pub mod cache;
pub mod quote;
pub mod resolver;
pub mod seasonal;
pub mod source;
pub mod statbel;

pub use cache::{CacheEntry, PriceCache};
pub use quote::{PriceQuote, EMERGENCY_FALLBACK_SOURCE};
pub use resolver::PriceResolver;
pub use seasonal::SeasonalSource;
pub use source::{PriceSource, PriceSourceError};
pub use statbel::StatbelSource;

use crate::sdk::config::PriceSettings;
use reqwest::Client;

/// The production source chain: StatBel direct, StatBel via proxy (if configured),
/// then the seasonal table (if enabled).
pub fn default_sources(client: &Client, settings: &PriceSettings) -> Vec<Box<dyn PriceSource>> {
    let mut sources: Vec<Box<dyn PriceSource>> = vec![Box::new(StatbelSource::direct(
        client.clone(),
        &settings.statbel_url,
        settings.direct_timeout,
    ))];

    if let Some(proxy) = &settings.proxy_url {
        sources.push(Box::new(StatbelSource::via_proxy(
            client.clone(),
            &settings.statbel_url,
            proxy,
            settings.proxy_timeout,
        )));
    }

    if settings.seasonal {
        sources.push(Box::new(SeasonalSource::new()));
    }
    sources
}
