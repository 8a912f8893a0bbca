use super::LatLng;
use serde::{Deserialize, Serialize};

/// stable index of a station in the network's station list.
pub type StationId = usize;

/// a scheduled or walking connection leaving a station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TravelOption {
    pub stop: StationId,
    /// seconds in vehicle (or walking, when `line` is None)
    pub travel_time: u32,
    /// seconds the vehicle dwells at the destination
    pub stay_time: u32,
    /// the line serving this connection. None marks a walking transfer.
    pub line: Option<String>,
    /// meters walked for a transfer
    pub walk_distance: u32,
}

impl TravelOption {
    pub fn is_walk(&self) -> bool {
        self.line.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub travel_options: Vec<TravelOption>,
}

impl Station {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}
