use reachmap_core::model::StationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// minimal seconds to reach each station. unreachable stations are absent.
pub type StationTimes = HashMap<StationId, u64>;

/// ordered path legs leading to each reached station.
pub type DebugMap = HashMap<StationId, Vec<PathSegment>>;

/// one leg of the fastest path to a station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    /// None for the initial walk from the origin
    pub from: Option<StationId>,
    pub to: StationId,
    /// None for walking legs
    pub line: Option<String>,
    /// total seconds since departure at the end of this leg
    pub time: u64,
    pub stay: u64,
    pub wait_time: u64,
    /// total seconds walked at the end of this leg
    pub walk_time: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub station_map: StationTimes,
    pub debug_map: Option<DebugMap>,
    /// iterations used by the search
    pub count: u64,
}
