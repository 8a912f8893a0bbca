use crate::model::{LatLng, Station, StationId};
use crate::util::geo_utils;
use rstar::primitives::GeomWithData;
use rstar::RTree;

pub type IndexedStation = GeomWithData<[f64; 2], StationId>;

/// radius queries over station coordinates. points are stored in
/// `[lng, lat]` order; distances are measured in meters with the
/// haversine formula.
pub struct StationIndex {
    rtree: RTree<IndexedStation>,
    coordinates: Vec<LatLng>,
}

impl StationIndex {
    pub fn new(stations: &[Station]) -> StationIndex {
        let entries = stations
            .iter()
            .map(|s| GeomWithData::new([s.lng, s.lat], s.id))
            .collect::<Vec<_>>();
        let coordinates = stations.iter().map(Station::lat_lng).collect();
        StationIndex {
            rtree: RTree::bulk_load(entries),
            coordinates,
        }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// finds all stations within `radius` meters of `center`.
    ///
    /// # Arguments
    ///
    /// * `center` - query point
    /// * `radius` - search radius in meters
    ///
    /// # Returns
    ///
    /// * station ids in ascending order
    pub fn search_in_radius(&self, center: &LatLng, radius: f64) -> Vec<StationId> {
        if !(radius >= 0.0) || !center.is_finite() {
            return vec![];
        }
        let envelope = geo_utils::radius_envelope(center, radius);
        let mut found = self
            .rtree
            .locate_in_envelope(&envelope)
            .filter(|entry| {
                let coord = &self.coordinates[entry.data];
                geo_utils::haversine_distance(center, coord) <= radius
            })
            .map(|entry| entry.data)
            .collect::<Vec<_>>();
        found.sort_unstable();
        found
    }

    /// distance in meters between two indexed stations, if both exist.
    pub fn distance_between(&self, a: StationId, b: StationId) -> Option<f64> {
        let ca = self.coordinates.get(a)?;
        let cb = self.coordinates.get(b)?;
        Some(geo_utils::haversine_distance(ca, cb))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn station(id: StationId, lat: f64, lng: f64) -> Station {
        Station {
            id,
            lat,
            lng,
            name: format!("s{id}"),
            travel_options: vec![],
        }
    }

    #[test]
    fn test_search_in_radius_filters_by_true_distance() {
        // ~111m per 0.001 degree latitude
        let stations = vec![
            station(0, 52.500, 13.400),
            station(1, 52.501, 13.400),
            station(2, 52.505, 13.400),
            station(3, 52.600, 13.400),
        ];
        let index = StationIndex::new(&stations);
        let found = index.search_in_radius(&LatLng::new(52.5, 13.4), 200.0);
        assert_eq!(found, vec![0, 1]);
        let found = index.search_in_radius(&LatLng::new(52.5, 13.4), 1000.0);
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_with_negative_radius_is_empty() {
        let index = StationIndex::new(&[station(0, 0.0, 0.0)]);
        assert!(index.search_in_radius(&LatLng::new(0.0, 0.0), -1.0).is_empty());
    }

    #[test]
    fn test_distance_between_unknown_station() {
        let index = StationIndex::new(&[station(0, 0.0, 0.0)]);
        assert!(index.distance_between(0, 5).is_none());
        assert_eq!(index.distance_between(0, 0), Some(0.0));
    }
}
