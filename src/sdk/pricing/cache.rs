use super::quote::PriceQuote;
use crate::sdk::util::clock::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: PriceQuote,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.stored_at < ttl
    }
}

/// In-memory quote store with lazy TTL expiry. Stale entries are dropped on read.
pub struct PriceCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&mut self, key: &str) -> Option<PriceQuote> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                log::debug!("[CACHE EXPIRED] {}", key);
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&mut self, key: &str, value: PriceQuote) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key.to_string(), entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TTL_HOURS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::fuel::FuelKind;
    use crate::sdk::util::clock::ManualClock;
    use chrono::TimeZone;

    fn quote(amount: f64, at: DateTime<Utc>) -> PriceQuote {
        PriceQuote::new(FuelKind::Euro95, amount, "test", at).unwrap()
    }

    fn setup() -> (ManualClock, PriceCache) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 12, 1, 8, 0, 0).unwrap());
        let cache = PriceCache::with_clock(Duration::hours(24), Arc::new(clock.clone()));
        (clock, cache)
    }

    #[test]
    fn returns_entry_just_before_ttl() {
        let (clock, mut cache) = setup();
        cache.put("price_euro95", quote(1.644, clock.now()));

        clock.advance(Duration::hours(23) + Duration::minutes(59));
        assert_eq!(cache.get("price_euro95").map(|q| q.amount), Some(1.644));
    }

    #[test]
    fn evicts_entry_after_ttl() {
        let (clock, mut cache) = setup();
        cache.put("price_euro95", quote(1.644, clock.now()));

        clock.advance(Duration::hours(24) + Duration::minutes(1));
        assert!(cache.get("price_euro95").is_none());
        assert!(cache.is_empty(), "stale entry should be removed on read");
    }

    #[test]
    fn entry_is_stale_exactly_at_ttl() {
        let (clock, mut cache) = setup();
        cache.put("k", quote(1.0, clock.now()));
        clock.advance(Duration::hours(24));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn put_overwrites_and_refreshes_timestamp() {
        let (clock, mut cache) = setup();
        cache.put("k", quote(1.5, clock.now()));
        clock.advance(Duration::hours(20));
        cache.put("k", quote(1.6, clock.now()));
        clock.advance(Duration::hours(20));

        assert_eq!(cache.get("k").map(|q| q.amount), Some(1.6));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let (clock, mut cache) = setup();
        cache.put("a", quote(1.0, clock.now()));
        cache.put("b", quote(2.0, clock.now()));
        cache.clear();
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }
}
