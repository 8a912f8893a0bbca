use super::{SearchError, SearchResult};
use crate::worker::WorkerRequest;

/// receives progress from a running search and tells it when to stop.
pub trait SearchReporter {
    /// called every `report_interval` iterations with the iteration count.
    fn working(&mut self, at: u64);

    fn is_cancelled(&self) -> bool;
}

/// the transit graph traversal run inside a background task. given an
/// origin and the network it computes the minimal time to reach each
/// station, combining walking with scheduled lines.
pub trait ReachabilitySearch: Send + Sync {
    fn search(
        &self,
        request: &WorkerRequest,
        reporter: &mut dyn SearchReporter,
    ) -> Result<SearchResult, SearchError>;
}
