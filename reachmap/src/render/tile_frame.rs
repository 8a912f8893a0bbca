use crate::map::{PixelPoint, Projection, TileCoord, TileSize};
use reachmap_core::model::LatLng;
use reachmap_core::util::geo_utils;

/// placement of one tile in projected pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFrame {
    /// pixel position of the top-left corner at `zoom`
    pub origin: PixelPoint,
    pub size: TileSize,
    pub zoom: f64,
}

impl TileFrame {
    pub fn for_tile(tile: &TileCoord, size: TileSize) -> TileFrame {
        TileFrame {
            origin: tile.origin(&size),
            size,
            zoom: tile.z as f64,
        }
    }

    pub fn center<P: Projection + ?Sized>(&self, projection: &P) -> LatLng {
        let middle = PixelPoint::new(
            self.origin.x + self.size.x as f64 / 2.0,
            self.origin.y + self.size.y as f64 / 2.0,
        );
        projection.unproject(&middle, self.zoom)
    }

    /// real-world distance in meters between the tile's top-left and
    /// bottom-right corners.
    pub fn span<P: Projection + ?Sized>(&self, projection: &P) -> f64 {
        let end = PixelPoint::new(
            self.origin.x + self.size.x as f64,
            self.origin.y + self.size.y as f64,
        );
        let start = projection.unproject(&self.origin, self.zoom);
        let end = projection.unproject(&end, self.zoom);
        geo_utils::haversine_distance(&start, &end)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::map::WebMercator;

    #[test]
    fn test_world_tile_center() {
        let frame = TileFrame::for_tile(&TileCoord::new(0, 0, 0), TileSize::default());
        let c = frame.center(&WebMercator::default());
        assert!(c.lat.abs() < 1e-9 && c.lng.abs() < 1e-9);
    }

    #[test]
    fn test_span_halves_per_zoom_level() {
        let wm = WebMercator::default();
        let coarse = TileFrame::for_tile(&TileCoord::new(2200, 1343, 12), TileSize::default());
        let fine = TileFrame::for_tile(&TileCoord::new(4400, 2686, 13), TileSize::default());
        let ratio = coarse.span(&wm) / fine.span(&wm);
        assert!((ratio - 2.0).abs() < 0.01, "ratio was {ratio}");
    }
}
