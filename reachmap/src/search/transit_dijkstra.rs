use super::{
    DebugMap, PathSegment, ReachabilitySearch, SearchError, SearchReporter, SearchResult,
    StationTimes,
};
use crate::worker::WorkerRequest;
use reachmap_core::model::{StationId, TravelOption};
use reachmap_core::util::geo_utils;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// label-setting shortest time search over the station graph.
///
/// the search starts by walking from the origin to nearby stations, then
/// expands along each station's travel options. riding a line costs its
/// travel and stay time; boarding a line other than the one we arrived on
/// costs half of its departure interval as the expected wait. walking
/// transfers are limited to `max_walk_time` each.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitDijkstra;

#[derive(Debug, Clone)]
struct Label {
    time: u64,
    walk_time: u64,
    line: Option<String>,
    parent: Option<StationId>,
    wait_time: u64,
    stay: u64,
}

impl ReachabilitySearch for TransitDijkstra {
    fn search(
        &self,
        request: &WorkerRequest,
        reporter: &mut dyn SearchReporter,
    ) -> Result<SearchResult, SearchError> {
        if !request.origin.is_finite() {
            return Err(SearchError::InvalidOrigin(request.origin.to_string()));
        }
        if !request.bounds.contains(&request.origin) {
            log::debug!("origin {} is outside of the network bounds", request.origin);
            return Ok(SearchResult {
                debug_map: request.debug.then(HashMap::new),
                ..Default::default()
            });
        }

        let mut best: HashMap<StationId, Label> = HashMap::new();
        let mut frontier: BinaryHeap<Reverse<(u64, StationId)>> = BinaryHeap::new();
        for (station_id, walk_time) in seed_stations(request) {
            let improves = best.get(&station_id).is_none_or(|l| walk_time < l.time);
            if improves {
                best.insert(
                    station_id,
                    Label {
                        time: walk_time,
                        walk_time,
                        line: None,
                        parent: None,
                        wait_time: 0,
                        stay: 0,
                    },
                );
                frontier.push(Reverse((walk_time, station_id)));
            }
        }

        let mut settled: HashSet<StationId> = HashSet::new();
        let mut count: u64 = 0;
        while let Some(Reverse((time, station_id))) = frontier.pop() {
            count += 1;
            if count % request.report_interval == 0 {
                reporter.working(count);
            }
            if reporter.is_cancelled() {
                return Err(SearchError::Cancelled);
            }
            if !settled.insert(station_id) {
                continue;
            }
            let label = best.get(&station_id).cloned().ok_or_else(|| {
                SearchError::InternalError(format!(
                    "station {station_id} in frontier without a label"
                ))
            })?;
            let station = request.stations().get(station_id).ok_or_else(|| {
                SearchError::InvalidNetwork(format!("unknown station {station_id}"))
            })?;

            for option in station.travel_options.iter() {
                let Some(next) = traverse(request, &label, time, station_id, option) else {
                    continue;
                };
                if settled.contains(&option.stop) {
                    continue;
                }
                let improves = best.get(&option.stop).is_none_or(|l| next.time < l.time);
                if improves {
                    frontier.push(Reverse((next.time, option.stop)));
                    best.insert(option.stop, next);
                }
            }
        }

        let station_map: StationTimes = best.iter().map(|(id, l)| (*id, l.time)).collect();
        let debug_map = request.debug.then(|| build_debug_map(&best));
        Ok(SearchResult {
            station_map,
            debug_map,
            count,
        })
    }
}

/// stations reachable by walking from the origin, with their walking time.
/// the search radius doubles until a station is found or it exceeds the
/// longest allowed walk.
fn seed_stations(request: &WorkerRequest) -> Vec<(StationId, u64)> {
    let max_walk_distance = if request.seconds_per_m > 0.0 {
        request.max_walk_time as f64 / request.seconds_per_m
    } else {
        f64::INFINITY
    };
    let mut radius = request.search_radius;
    let mut found = request.network.stations_in_radius(&request.origin, radius);
    while found.is_empty() && radius > 0.0 && radius < max_walk_distance {
        radius = (radius * 2.0).min(max_walk_distance);
        found = request.network.stations_in_radius(&request.origin, radius);
    }
    found
        .into_iter()
        .filter_map(|s| {
            let meters = geo_utils::haversine_distance(&request.origin, &s.lat_lng());
            let walk_time = (meters * request.seconds_per_m).round() as u64;
            (walk_time <= request.max_walk_time).then_some((s.id, walk_time))
        })
        .collect()
}

/// label at the end of a travel option, or None if it cannot be taken.
fn traverse(
    request: &WorkerRequest,
    label: &Label,
    time: u64,
    station_id: StationId,
    option: &TravelOption,
) -> Option<Label> {
    match &option.line {
        None => {
            let walk = if option.walk_distance > 0 {
                (option.walk_distance as f64 * request.seconds_per_m).round() as u64
            } else {
                option.travel_time as u64
            };
            if walk > request.max_walk_time {
                return None;
            }
            Some(Label {
                time: time + walk,
                walk_time: label.walk_time + walk,
                line: None,
                parent: Some(station_id),
                wait_time: 0,
                stay: 0,
            })
        }
        Some(line_id) => {
            let wait_time = if label.line.as_deref() == Some(line_id.as_str()) {
                0
            } else {
                // a line without an interval for this key is not running
                let interval = request
                    .lines()
                    .get(line_id)?
                    .interval(&request.interval_key)?;
                interval as u64 / 2
            };
            let stay = option.stay_time as u64;
            Some(Label {
                time: time + wait_time + option.travel_time as u64 + stay,
                walk_time: label.walk_time,
                line: Some(line_id.clone()),
                parent: Some(station_id),
                wait_time,
                stay,
            })
        }
    }
}

fn build_debug_map(best: &HashMap<StationId, Label>) -> DebugMap {
    best.keys()
        .map(|id| {
            let mut path = vec![];
            let mut current = Some(*id);
            while let Some(station_id) = current {
                let Some(label) = best.get(&station_id) else {
                    break;
                };
                path.push(PathSegment {
                    from: label.parent,
                    to: station_id,
                    line: label.line.clone(),
                    time: label.time,
                    stay: label.stay,
                    wait_time: label.wait_time,
                    walk_time: label.walk_time,
                });
                // parents form a tree; the guard only protects against corrupt labels
                if path.len() > best.len() {
                    break;
                }
                current = label.parent;
            }
            path.reverse();
            (*id, path)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::worker::WorkerRequest;
    use reachmap_core::model::{LatLng, TransitNetwork};
    use std::sync::Arc;

    struct CountingReporter {
        reports: Vec<u64>,
        cancel_after: Option<usize>,
    }

    impl SearchReporter for CountingReporter {
        fn working(&mut self, at: u64) {
            self.reports.push(at);
        }

        fn is_cancelled(&self) -> bool {
            self.cancel_after
                .is_some_and(|n| self.reports.len() >= n)
        }
    }

    /// A -(L1)-> B -(L1)-> C, B -(walk)-> D, C -(L2, not running)-> E
    fn line_network() -> Arc<TransitNetwork> {
        let json = r#"{
            "Cityid": "line",
            "Stops": [
                {"Latitude": 52.500, "Longitude": 13.400, "Name": "A",
                 "TravelOptions": [{"Stop": 1, "TravelTime": 300, "StayTime": 30, "Line": "L1"}]},
                {"Latitude": 52.520, "Longitude": 13.400, "Name": "B",
                 "TravelOptions": [
                    {"Stop": 2, "TravelTime": 300, "StayTime": 30, "Line": "L1"},
                    {"Stop": 3, "WalkDistance": 200}
                 ]},
                {"Latitude": 52.540, "Longitude": 13.400, "Name": "C",
                 "TravelOptions": [{"Stop": 4, "TravelTime": 60, "Line": "L2"}]},
                {"Latitude": 52.521, "Longitude": 13.402, "Name": "D"},
                {"Latitude": 52.560, "Longitude": 13.400, "Name": "E"}
            ],
            "Lines": [
                {"LineId": "L1", "Name": "Line 1",
                 "LineTimes": [{"Interval": 600, "Start": 6, "Stop": 9, "Weekday": 1}]},
                {"LineId": "L2", "Name": "Line 2",
                 "LineTimes": [{"Interval": 600, "Start": 6, "Stop": 9, "Weekday": 6}]}
            ]
        }"#;
        Arc::new(TransitNetwork::try_from(json).expect("test network should decode"))
    }

    fn request(network: Arc<TransitNetwork>, origin: LatLng, debug: bool) -> WorkerRequest {
        WorkerRequest {
            origin,
            bounds: *network.bounds(),
            network,
            report_interval: 2,
            interval_key: String::from("1-6"),
            max_walk_time: 900,
            seconds_per_m: 1.2,
            search_radius: 100.0,
            debug,
        }
    }

    #[test]
    fn test_search_reaches_along_line_with_wait() {
        let network = line_network();
        let req = request(network, LatLng::new(52.500, 13.400), false);
        let mut reporter = CountingReporter {
            reports: vec![],
            cancel_after: None,
        };
        let result = TransitDijkstra
            .search(&req, &mut reporter)
            .expect("search should succeed");
        // origin sits on A
        assert_eq!(result.station_map.get(&0), Some(&0));
        // wait 300 + ride 300 + stay 30
        assert_eq!(result.station_map.get(&1), Some(&630));
        // same line, no new wait
        assert_eq!(result.station_map.get(&2), Some(&960));
        // 200m walk at 1.2 s/m
        assert_eq!(result.station_map.get(&3), Some(&870));
        // L2 does not run for key 1-6
        assert_eq!(result.station_map.get(&4), None);
        assert!(result.debug_map.is_none());
        assert!(!reporter.reports.is_empty());
        assert!(reporter.reports.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_search_expands_radius_until_station_found() {
        let network = line_network();
        // ~330m south of A, initial radius 100m
        let req = request(network, LatLng::new(52.497, 13.400), false);
        let mut reporter = CountingReporter {
            reports: vec![],
            cancel_after: None,
        };
        let result = TransitDijkstra
            .search(&req, &mut reporter)
            .expect("search should succeed");
        let walk = result.station_map.get(&0).copied().expect("A is reached");
        assert!((390..=410).contains(&walk), "walk time was {walk}");
    }

    #[test]
    fn test_search_outside_bounds_is_empty() {
        let network = line_network();
        let req = request(network, LatLng::new(10.0, 10.0), false);
        let mut reporter = CountingReporter {
            reports: vec![],
            cancel_after: None,
        };
        let result = TransitDijkstra
            .search(&req, &mut reporter)
            .expect("search should succeed");
        assert!(result.station_map.is_empty());
    }

    #[test]
    fn test_search_debug_map_paths() {
        let network = line_network();
        let req = request(network, LatLng::new(52.500, 13.400), true);
        let mut reporter = CountingReporter {
            reports: vec![],
            cancel_after: None,
        };
        let result = TransitDijkstra
            .search(&req, &mut reporter)
            .expect("search should succeed");
        let debug = result.debug_map.expect("debug requested");
        let path = debug.get(&2).expect("C was reached");
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].from, None);
        assert_eq!(path[1].from, Some(0));
        assert_eq!(path[1].wait_time, 300);
        assert_eq!(path[2].from, Some(1));
        assert_eq!(path[2].wait_time, 0);
        assert_eq!(path[2].time, 960);
    }

    #[test]
    fn test_search_cancellation() {
        let network = line_network();
        let req = WorkerRequest {
            report_interval: 1,
            ..request(network, LatLng::new(52.500, 13.400), false)
        };
        let mut reporter = CountingReporter {
            reports: vec![],
            cancel_after: Some(1),
        };
        let result = TransitDijkstra.search(&req, &mut reporter);
        assert!(matches!(result, Err(SearchError::Cancelled)));
    }
}
