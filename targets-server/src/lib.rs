pub mod config;
pub mod params;
pub mod runtime;

pub use config::WatchConfig;
pub use params::Params;
