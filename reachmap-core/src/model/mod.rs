mod bounds;
mod lat_lng;
mod line;
mod network_error;
mod raw_network;
mod station;
mod transit_network;

pub use bounds::Bounds;
pub use lat_lng::LatLng;
pub use line::Line;
pub use network_error::NetworkError;
pub use raw_network::{RawLine, RawLineTime, RawNetwork, RawStop, RawTravelOption};
pub use station::{Station, StationId, TravelOption};
pub use transit_network::TransitNetwork;
