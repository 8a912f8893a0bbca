#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("search was cancelled")]
    Cancelled,
    #[error("search origin {0} is not a valid coordinate")]
    InvalidOrigin(String),
    #[error("network is inconsistent: {0}")]
    InvalidNetwork(String),
    #[error("{0}")]
    InternalError(String),
}
