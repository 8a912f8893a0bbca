//! shareable view state: positions flattened into a list of string tokens
//! `[time, lat, lng, time, lat, lng, ...]` and restored from it.
mod state_codec;
mod state_error;
mod state_sync;
mod token_validator;

pub use state_codec::{coordinate_precision, parse_valid_prefix, serialize, PositionState};
pub use state_error::StateTokenError;
pub use state_sync::{plan_sync, SyncAction};
pub use token_validator::TokenValidator;
