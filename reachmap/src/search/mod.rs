mod reachability_search;
mod search_error;
mod search_result;
mod transit_dijkstra;

pub use reachability_search::{ReachabilitySearch, SearchReporter};
pub use search_error::SearchError;
pub use search_result::{DebugMap, PathSegment, SearchResult, StationTimes};
pub use transit_dijkstra::TransitDijkstra;
