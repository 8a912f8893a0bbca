mod station_index;

pub use station_index::StationIndex;
