pub mod clock;
pub mod log;
pub mod rate_limit;
