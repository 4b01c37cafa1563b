pub mod config;
pub mod fuel;
pub mod history;
pub mod pricing;
pub mod routing;
pub mod trip;
pub mod util;
