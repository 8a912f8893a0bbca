//! wire schema of the decoded network feed. field names follow the
//! feed, one message per network with repeated stops and lines.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawNetwork {
    #[serde(default)]
    pub cityid: String,
    #[serde(default)]
    pub stops: Vec<RawStop>,
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawStop {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub travel_options: Vec<RawTravelOption>,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawTravelOption {
    #[serde(default)]
    pub stop: u32,
    #[serde(default)]
    pub travel_time: u32,
    #[serde(default)]
    pub stay_time: u32,
    /// empty for walking transfers
    #[serde(default)]
    pub line: String,
    #[serde(default)]
    pub walk_distance: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawLine {
    pub line_id: String,
    #[serde(default)]
    pub line_times: Vec<RawLineTime>,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawLineTime {
    /// seconds between departures
    pub interval: u32,
    pub start: u32,
    pub stop: u32,
    pub weekday: u32,
}
