use super::{Bounds, LatLng, Line, NetworkError, RawNetwork, Station, StationId, TravelOption};
use crate::spatial::StationIndex;
use itertools::Itertools;
use std::collections::HashMap;

/// padding in degrees added around the station extent.
pub const BOUNDS_PADDING: f64 = 0.01;

/// the transit network, read-only once built. shared by reference between
/// positions, background searches and tile rendering.
pub struct TransitNetwork {
    pub city_id: String,
    stations: Vec<Station>,
    lines: HashMap<String, Line>,
    line_names: HashMap<String, String>,
    bounds: Bounds,
    index: StationIndex,
}

impl TransitNetwork {
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn lines(&self) -> &HashMap<String, Line> {
        &self.lines
    }

    pub fn line_name(&self, line_id: &str) -> Option<&str> {
        self.line_names.get(line_id).map(String::as_str)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn index(&self) -> &StationIndex {
        &self.index
    }

    /// stations within `radius` meters of `center`, ordered by id.
    pub fn stations_in_radius(&self, center: &LatLng, radius: f64) -> Vec<&Station> {
        self.index
            .search_in_radius(center, radius)
            .into_iter()
            .filter_map(|id| self.stations.get(id))
            .collect_vec()
    }
}

impl TryFrom<RawNetwork> for TransitNetwork {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        let n_stations = raw.stops.len();
        let stations = raw
            .stops
            .into_iter()
            .enumerate()
            .map(|(id, stop)| {
                if !(stop.latitude.is_finite() && stop.longitude.is_finite()) {
                    return Err(NetworkError::InvalidStationCoordinate(id));
                }
                let travel_options = stop
                    .travel_options
                    .into_iter()
                    .map(|opt| {
                        let stop_id = opt.stop as usize;
                        if stop_id >= n_stations {
                            return Err(NetworkError::UnknownTravelOptionStop {
                                station: id,
                                stop: opt.stop,
                            });
                        }
                        Ok(TravelOption {
                            stop: stop_id,
                            travel_time: opt.travel_time,
                            stay_time: opt.stay_time,
                            line: (!opt.line.is_empty()).then_some(opt.line),
                            walk_distance: opt.walk_distance,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Station {
                    id,
                    lat: stop.latitude,
                    lng: stop.longitude,
                    name: stop.name,
                    travel_options,
                })
            })
            .collect::<Result<Vec<_>, NetworkError>>()?;

        let coords = stations.iter().map(Station::lat_lng).collect_vec();
        let bounds = Bounds::from_coordinates(&coords)
            .ok_or(NetworkError::EmptyNetwork)?
            .padded(BOUNDS_PADDING);

        let mut lines = HashMap::new();
        let mut line_names = HashMap::new();
        for raw_line in raw.lines.iter() {
            line_names.insert(raw_line.line_id.clone(), raw_line.name.clone());
            if let Some(line) = Line::from_raw(raw_line) {
                lines.insert(line.line_id.clone(), line);
            }
        }

        let index = StationIndex::new(&stations);
        log::debug!(
            "built network '{}' with {} stations, {} scheduled lines",
            raw.cityid,
            stations.len(),
            lines.len()
        );

        Ok(TransitNetwork {
            city_id: raw.cityid,
            stations,
            lines,
            line_names,
            bounds,
            index,
        })
    }
}

impl TryFrom<&str> for TransitNetwork {
    type Error = NetworkError;

    /// decodes a network from its JSON feed representation.
    fn try_from(json: &str) -> Result<Self, Self::Error> {
        let raw: RawNetwork =
            serde_json::from_str(json).map_err(|e| NetworkError::DecodeError(e.to_string()))?;
        TransitNetwork::try_from(raw)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const NETWORK: &str = r#"{
        "Cityid": "testville",
        "Stops": [
            {"Latitude": 52.50, "Longitude": 13.40, "Name": "A",
             "TravelOptions": [{"Stop": 1, "TravelTime": 120, "StayTime": 30, "Line": "L1"}]},
            {"Latitude": 52.52, "Longitude": 13.42, "Name": "B",
             "TravelOptions": [{"Stop": 0, "TravelTime": 0, "Line": "", "WalkDistance": 2500}]}
        ],
        "Lines": [
            {"LineId": "L1", "Name": "Line One",
             "LineTimes": [{"Interval": 600, "Start": 6, "Stop": 9, "Weekday": 1}]},
            {"LineId": "L2", "Name": "Ghost line", "LineTimes": []}
        ]
    }"#;

    #[test]
    fn test_network_from_json_feed() {
        let network = TransitNetwork::try_from(NETWORK).expect("network should decode");
        assert_eq!(network.city_id, "testville");
        assert_eq!(network.stations().len(), 2);
        assert_eq!(network.stations()[1].id, 1);
        assert_eq!(network.stations()[0].travel_options[0].line.as_deref(), Some("L1"));
        assert!(network.stations()[1].travel_options[0].is_walk());
        assert!(network.lines().contains_key("L1"));
        assert!(!network.lines().contains_key("L2"));
        assert_eq!(network.line_name("L2"), Some("Ghost line"));
    }

    #[test]
    fn test_bounds_are_padded() {
        let network = TransitNetwork::try_from(NETWORK).expect("network should decode");
        let b = network.bounds();
        assert!((b.south - 52.49).abs() < 1e-9);
        assert!((b.north - 52.53).abs() < 1e-9);
        assert!((b.west - 13.39).abs() < 1e-9);
        assert!((b.east - 13.43).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_travel_option_stop_fails() {
        let json = r#"{"Stops": [{"Latitude": 1.0, "Longitude": 1.0,
            "TravelOptions": [{"Stop": 7, "TravelTime": 1, "Line": "x"}]}]}"#;
        let result = TransitNetwork::try_from(json);
        assert!(matches!(
            result,
            Err(NetworkError::UnknownTravelOptionStop { station: 0, stop: 7 })
        ));
    }

    #[test]
    fn test_empty_network_fails() {
        let result = TransitNetwork::try_from(r#"{"Cityid": "nowhere"}"#);
        assert!(matches!(result, Err(NetworkError::EmptyNetwork)));
    }
}
