use reachmap_core::model::{Bounds, LatLng, Line, Station, TransitNetwork};
use std::collections::HashMap;
use std::sync::Arc;

/// input of one background reachability search.
#[derive(Clone)]
pub struct WorkerRequest {
    pub origin: LatLng,
    /// stations and lines, shared read-only with the rest of the map
    pub network: Arc<TransitNetwork>,
    /// iterations between two progress messages
    pub report_interval: u64,
    pub interval_key: String,
    pub max_walk_time: u64,
    pub seconds_per_m: f64,
    /// meters around the origin searched for the first stations
    pub search_radius: f64,
    pub bounds: Bounds,
    pub debug: bool,
}

impl WorkerRequest {
    pub fn stations(&self) -> &[Station] {
        self.network.stations()
    }

    pub fn lines(&self) -> &HashMap<String, Line> {
        self.network.lines()
    }
}
