use crate::config::ConfigError;
use crate::loader::LoadError;
use crate::position::PositionId;
use crate::state::StateTokenError;

#[derive(thiserror::Error, Debug)]
pub enum ReachmapError {
    #[error("network is not loaded yet")]
    NetworkNotLoaded,
    #[error("network was already loaded, it is only loaded once")]
    NetworkAlreadyLoaded,
    #[error("no position with id {0}")]
    UnknownPosition(PositionId),
    #[error("failure building event runtime: {0}")]
    RuntimeError(std::io::Error),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error(transparent)]
    LoadError(#[from] LoadError),
    #[error(transparent)]
    StateTokenError(#[from] StateTokenError),
}
