use crate::config::ConfigError;
use reachmap_core::model::NetworkError;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failure fetching network from {location}: {message}")]
    FetchError { location: String, message: String },
    #[error("failure reading network from {location}: {source}")]
    ReadError {
        location: String,
        source: std::io::Error,
    },
    #[error("failure decoding network: {0}")]
    DecodeError(#[from] NetworkError),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
}
