use super::{PixelPoint, Projection};
use reachmap_core::model::LatLng;
use std::f64::consts::PI;

/// spherical web mercator with square tiles, as used by slippy maps.
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    pub tile_size: f64,
}

impl WebMercator {
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

    fn scale(&self, zoom: f64) -> f64 {
        self.tile_size * 2f64.powf(zoom)
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self { tile_size: 256.0 }
    }
}

impl Projection for WebMercator {
    fn project(&self, coord: &LatLng, zoom: f64) -> PixelPoint {
        let scale = self.scale(zoom);
        let lat = coord.lat.clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        let x = (coord.lng + 180.0) / 360.0 * scale;
        let sin_lat = lat.to_radians().sin();
        let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale;
        PixelPoint::new(x, y)
    }

    fn unproject(&self, point: &PixelPoint, zoom: f64) -> LatLng {
        let scale = self.scale(zoom);
        let lng = point.x / scale * 360.0 - 180.0;
        let n = PI - 2.0 * PI * point.y / scale;
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }
}
