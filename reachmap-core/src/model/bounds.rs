use super::LatLng;
use serde::{Deserialize, Serialize};

/// geographic extent of a network in degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Bounds {
    /// smallest extent containing every coordinate, or None for an empty iterator.
    pub fn from_coordinates<'a>(coords: impl IntoIterator<Item = &'a LatLng>) -> Option<Bounds> {
        coords.into_iter().fold(None, |acc, c| match acc {
            None => Some(Bounds {
                south: c.lat,
                north: c.lat,
                west: c.lng,
                east: c.lng,
            }),
            Some(b) => Some(Bounds {
                south: b.south.min(c.lat),
                north: b.north.max(c.lat),
                west: b.west.min(c.lng),
                east: b.east.max(c.lng),
            }),
        })
    }

    /// grows the extent by `degrees` on every side.
    pub fn padded(&self, degrees: f64) -> Bounds {
        Bounds {
            south: self.south - degrees,
            north: self.north + degrees,
            west: self.west - degrees,
            east: self.east + degrees,
        }
    }

    pub fn contains(&self, coord: &LatLng) -> bool {
        self.south <= coord.lat
            && coord.lat <= self.north
            && self.west <= coord.lng
            && coord.lng <= self.east
    }
}
