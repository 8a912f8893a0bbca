use super::PixelPoint;
use reachmap_core::model::LatLng;

/// geographic to pixel projection of the map library.
pub trait Projection {
    fn project(&self, coord: &LatLng, zoom: f64) -> PixelPoint;

    fn unproject(&self, point: &PixelPoint, zoom: f64) -> LatLng;
}
