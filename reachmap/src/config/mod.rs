mod config_error;
mod reachmap_config;

pub use config_error::ConfigError;
pub use reachmap_config::ReachmapConfig;
