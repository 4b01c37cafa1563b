use crate::sdk::fuel::FuelKind;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a single price source could not produce a value.
#[derive(Error, Debug)]
pub enum PriceSourceError {
    #[error("Underlying request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source answered with HTTP status {0}")]
    Status(u16),

    #[error("Failed to parse price data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No usable price for {0}")]
    NoData(FuelKind),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// One provider of fuel prices, tried in priority order by the resolver.
///
/// `Ok(None)` means the source answered but had nothing for this fuel kind.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    /// Upper bound the resolver applies to a single `fetch`.
    fn timeout(&self) -> Duration {
        DEFAULT_SOURCE_TIMEOUT
    }

    async fn fetch(&self, kind: FuelKind) -> Result<Option<f64>, PriceSourceError>;
}
