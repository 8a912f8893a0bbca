use crate::app::ReachmapError;
use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    ReachmapError(#[from] ReachmapError),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("failure writing {path}: {source}")]
    WriteError {
        path: String,
        source: std::io::Error,
    },
    #[error("failure serializing output: {0}")]
    SerializationError(String),
}
