mod load_error;
mod load_progress;
mod network_decoder;
mod network_source;

pub use load_error::LoadError;
pub use load_progress::LoadProgress;
pub use network_decoder::{JsonNetworkDecoder, NetworkDecoder};
pub use network_source::{load_network, NetworkSource};
