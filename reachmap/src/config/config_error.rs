#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failure reading configuration sources: {0}")]
    SourceError(String),
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("missing required configuration value '{0}'")]
    MissingValue(&'static str),
}
