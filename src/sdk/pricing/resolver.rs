use super::cache::PriceCache;
use super::quote::PriceQuote;
use super::source::{PriceSource, PriceSourceError};
use crate::sdk::fuel::FuelKind;
use crate::sdk::util::clock::{Clock, SystemClock};
use chrono::Duration;
use std::sync::Arc;

/// Walks an ordered list of price sources and always comes back with a quote.
///
/// Sources are awaited one at a time, each under its own timeout. The first
/// strictly positive amount wins and is cached. When nothing usable comes back
/// the per-kind emergency price is returned uncached, so the next call goes
/// back to the network.
pub struct PriceResolver {
    sources: Vec<Box<dyn PriceSource>>,
    cache: PriceCache,
    clock: Arc<dyn Clock>,
}

impl PriceResolver {
    pub fn new(sources: Vec<Box<dyn PriceSource>>, ttl: Duration) -> Self {
        Self::with_clock(sources, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(sources: Vec<Box<dyn PriceSource>>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sources,
            cache: PriceCache::with_clock(ttl, clock.clone()),
            clock,
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub async fn resolve(&mut self, kind: FuelKind) -> PriceQuote {
        let key = kind.cache_key();
        if let Some(quote) = self.cache.get(&key) {
            log::debug!("[CACHE HIT] {} = {:.3} ({})", key, quote.amount, quote.source_name);
            return quote;
        }

        for source in &self.sources {
            let limit = source.timeout();
            let outcome = match tokio::time::timeout(limit, source.fetch(kind)).await {
                Ok(result) => result,
                Err(_) => Err(PriceSourceError::Timeout(limit)),
            };

            match outcome {
                Ok(Some(amount)) => {
                    match PriceQuote::new(kind, amount, source.name(), self.clock.now()) {
                        Some(quote) => {
                            log::info!(
                                "Price for {} from {}: {:.3} €/L",
                                kind,
                                source.name(),
                                quote.amount
                            );
                            self.cache.put(&key, quote.clone());
                            return quote;
                        }
                        None => log::warn!(
                            "Source '{}' returned unusable price {} for {}. Trying next.",
                            source.name(),
                            amount,
                            kind
                        ),
                    }
                }
                Ok(None) => log::warn!(
                    "Source '{}' had no price for {}. Trying next.",
                    source.name(),
                    kind
                ),
                Err(e) => log::warn!(
                    "Failed to fetch {} price from '{}': {}. Trying next.",
                    kind,
                    source.name(),
                    e
                ),
            }
        }

        let quote = PriceQuote::emergency(kind, self.clock.now());
        log::warn!(
            "All price sources failed for {}; using emergency price {:.3} €/L",
            kind,
            quote.amount
        );
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::pricing::quote::EMERGENCY_FALLBACK_SOURCE;
    use crate::sdk::util::clock::ManualClock;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Price(f64),
        Nothing,
        Fail,
        Hang,
    }

    struct FakeSource {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn boxed(name: &'static str, behaviour: Behaviour) -> (Box<dyn PriceSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = FakeSource {
                name,
                behaviour,
                calls: calls.clone(),
            };
            (Box::new(source), calls)
        }
    }

    #[async_trait]
    impl PriceSource for FakeSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, kind: FuelKind) -> Result<Option<f64>, PriceSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Price(p) => Ok(Some(p)),
                Behaviour::Nothing => Ok(None),
                Behaviour::Fail => Err(PriceSourceError::NoData(kind)),
                Behaviour::Hang => {
                    tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                    Ok(Some(9.99))
                }
            }
        }
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 12, 10, 9, 0, 0).unwrap())
    }

    fn resolver(sources: Vec<Box<dyn PriceSource>>, clock: &ManualClock) -> PriceResolver {
        PriceResolver::with_clock(sources, Duration::hours(24), Arc::new(clock.clone()))
    }

    #[tokio::test]
    async fn first_success_short_circuits_the_chain() {
        let (first, first_calls) = FakeSource::boxed("first", Behaviour::Price(1.644));
        let (second, second_calls) = FakeSource::boxed("second", Behaviour::Fail);
        let mut resolver = resolver(vec![first, second], &clock());

        let quote = resolver.resolve(FuelKind::Euro95).await;

        assert_eq!(quote.amount, 1.644);
        assert_eq!(quote.source_name, "first");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_through_failures_to_the_next_source() {
        let (a, _) = FakeSource::boxed("a", Behaviour::Fail);
        let (b, _) = FakeSource::boxed("b", Behaviour::Nothing);
        let (c, _) = FakeSource::boxed("c", Behaviour::Price(0.0));
        let (d, d_calls) = FakeSource::boxed("d", Behaviour::Price(1.72));
        let mut resolver = resolver(vec![a, b, c, d], &clock());

        let quote = resolver.resolve(FuelKind::Diesel).await;

        assert_eq!(quote.source_name, "d");
        assert_eq!(quote.amount, 1.72);
        assert_eq!(d_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn total_failure_returns_uncached_emergency_price() {
        let (a, a_calls) = FakeSource::boxed("a", Behaviour::Fail);
        let (b, _) = FakeSource::boxed("b", Behaviour::Price(-1.0));
        let mut resolver = resolver(vec![a, b], &clock());

        let quote = resolver.resolve(FuelKind::Lpg).await;
        assert_eq!(quote.source_name, EMERGENCY_FALLBACK_SOURCE);
        assert_eq!(quote.amount, FuelKind::Lpg.emergency_price());

        resolver.resolve(FuelKind::Lpg).await;
        assert_eq!(a_calls.load(Ordering::SeqCst), 2, "emergency price must not be cached");
    }

    #[tokio::test]
    async fn empty_chain_still_yields_a_quote() {
        let mut resolver = resolver(Vec::new(), &clock());
        let quote = resolver.resolve(FuelKind::Euro98).await;
        assert!(quote.is_emergency());
        assert!(quote.amount > 0.0);
    }

    #[tokio::test]
    async fn cached_quote_skips_sources_until_ttl_expires() {
        let clock = clock();
        let (a, a_calls) = FakeSource::boxed("a", Behaviour::Price(1.70));
        let mut resolver = resolver(vec![a], &clock);

        resolver.resolve(FuelKind::Euro95).await;
        clock.advance(Duration::hours(23));
        let cached = resolver.resolve(FuelKind::Euro95).await;
        assert_eq!(cached.amount, 1.70);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::hours(2));
        resolver.resolve(FuelKind::Euro95).await;
        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cache_is_per_fuel_kind() {
        let (a, a_calls) = FakeSource::boxed("a", Behaviour::Price(1.70));
        let mut resolver = resolver(vec![a], &clock());

        resolver.resolve(FuelKind::Euro95).await;
        resolver.resolve(FuelKind::Diesel).await;
        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_cache_forces_a_refetch() {
        let (a, a_calls) = FakeSource::boxed("a", Behaviour::Price(1.70));
        let mut resolver = resolver(vec![a], &clock());

        resolver.resolve(FuelKind::Euro95).await;
        resolver.clear_cache();
        resolver.resolve(FuelKind::Euro95).await;
        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_source_times_out_and_the_chain_continues() {
        let (slow, slow_calls) = FakeSource::boxed("slow", Behaviour::Hang);
        let (fast, _) = FakeSource::boxed("fast", Behaviour::Price(1.655));
        let mut resolver = resolver(vec![slow, fast], &clock());

        let quote = resolver.resolve(FuelKind::Euro95).await;

        assert_eq!(slow_calls.load(Ordering::SeqCst), 1);
        assert_eq!(quote.source_name, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn never_fails_for_any_mix_of_outcomes() {
        let behaviours = || {
            vec![
                Behaviour::Fail,
                Behaviour::Hang,
                Behaviour::Nothing,
                Behaviour::Price(0.0),
                Behaviour::Price(f64::NAN),
            ]
        };
        for skip in 0..5 {
            let sources = behaviours()
                .into_iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, b)| FakeSource::boxed("s", b).0)
                .collect();
            let mut resolver = resolver(sources, &clock());
            for kind in FuelKind::ALL {
                let quote = resolver.resolve(kind).await;
                assert!(quote.amount > 0.0);
                assert!(quote.is_emergency());
            }
        }
    }
}
