use crate::position::Position;
use reachmap_core::model::{LatLng, TransitNetwork};
use reachmap_core::util::geo_utils;

const WALKING: &str = "$walking";

/// explains how each position reaches the stations around `at`, leg by
/// leg. positions are only explained when their search ran in debug mode.
///
/// # Arguments
///
/// * `network` - the loaded network
/// * `positions` - positions in display order
/// * `at` - the point that was clicked
/// * `radius` - meters around `at` to look for stations
///
/// # Returns
///
/// * one line per finding, in the order they were made
pub fn debug_dump(
    network: &TransitNetwork,
    positions: &[Position],
    at: &LatLng,
    radius: f64,
) -> Vec<String> {
    let stations = network.stations_in_radius(at, radius);
    let line_name = |line: Option<&str>| match line {
        None => String::from(WALKING),
        Some(id) => network.line_name(id).unwrap_or(id).to_string(),
    };
    let mut lines = vec![];
    for (i, position) in positions.iter().enumerate() {
        lines.push(format!("position {i}"));
        let Some(debug_map) = position.debug_map() else {
            lines.push(String::from("no debug map present"));
            continue;
        };
        for station in stations.iter() {
            lines.push(format!("found station {}", station.name));
            let Some(path) = debug_map.get(&station.id) else {
                lines.push(String::from("not reached"));
                continue;
            };
            let mut last_line: Option<Option<&str>> = None;
            let mut total_time = 0;
            for (k, segment) in path.iter().enumerate() {
                let Some(to) = network.station(segment.to) else {
                    continue;
                };
                let from = segment.from.and_then(|id| network.station(id));
                let from_name = from.map(|s| s.name.as_str()).unwrap_or(WALKING);
                let distance = match from {
                    Some(s) => geo_utils::haversine_distance(&s.lat_lng(), &to.lat_lng()),
                    None => geo_utils::haversine_distance(&position.origin(), &to.lat_lng()),
                };
                let line = segment.line.as_deref();
                if last_line != Some(line) {
                    lines.push(format!(
                        "{k} switching transport to {} waiting: {}",
                        line_name(line),
                        segment.wait_time
                    ));
                }
                last_line = Some(line);
                let leg_time = segment.time.saturating_sub(total_time);
                total_time = segment.time;
                lines.push(format!(
                    "{k} {from_name} -> {} via {} in {leg_time} (stay: {}, total time: {}, total walk time: {}, distance: {distance:.0} meters)",
                    to.name,
                    line_name(line),
                    segment.stay,
                    segment.time,
                    segment.walk_time,
                ));
            }
        }
    }
    lines
}
