use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

fn per_minute(n: u32) -> Limiter {
    let quota = Quota::per_minute(NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Nominatim usage policy: at most one request per second.
pub fn nominatim_limiter() -> Limiter {
    let quota = Quota::per_second(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(quota))
}

/// openrouteservice free tier: 40 directions requests per minute.
pub fn ors_limiter() -> Limiter {
    per_minute(40)
}
