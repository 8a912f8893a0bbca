use crate::config::ReachmapConfig;
use crate::map::Projection;
use crate::render::TileFrame;
use reachmap_core::model::LatLng;
use reachmap_core::util::geo_utils;
use serde::{Deserialize, Serialize};

/// a circle of walkable area in tile-local pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachableCircle {
    pub x: i64,
    pub y: i64,
    pub r: i64,
}

impl ReachableCircle {
    /// true when the circle's bounding box touches the tile rectangle.
    pub fn intersects_tile(&self, frame: &TileFrame) -> bool {
        let w = frame.size.x as i64;
        let h = frame.size.y as i64;
        !(self.x + self.r < 0 || self.x - self.r > w || self.y + self.r < 0 || self.y - self.r > h)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WalkSettings {
    pub max_walk_time: u64,
    pub meters_per_second: f64,
}

impl From<&ReachmapConfig> for WalkSettings {
    fn from(config: &ReachmapConfig) -> Self {
        WalkSettings {
            max_walk_time: config.max_walk_time,
            meters_per_second: config.walk_meters_per_second(),
        }
    }
}

impl WalkSettings {
    /// meters walkable with `remaining` seconds, capped by the longest walk.
    pub fn walk_radius(&self, remaining: u64) -> f64 {
        remaining.min(self.max_walk_time) as f64 * self.meters_per_second
    }

    pub fn max_walk_distance(&self) -> f64 {
        self.walk_radius(self.max_walk_time)
    }
}

/// pixel radius of a walking circle around `coord`. the meter radius is
/// converted to degrees of longitude at the coordinate's latitude and the
/// offset point is projected to measure the radius in pixels.
pub fn pixel_radius<P: Projection + ?Sized>(
    coord: &LatLng,
    meters: f64,
    zoom: f64,
    projection: &P,
) -> i64 {
    let lng_radius = geo_utils::lng_degrees_for_meters(coord.lat, meters);
    let offset = LatLng::new(coord.lat, coord.lng - lng_radius);
    let p1 = projection.project(coord, zoom);
    let p2 = projection.project(&offset, zoom);
    ((p1.x - p2.x).round() as i64).max(1)
}

/// the walking circle around `coord` with `remaining` seconds left, or
/// None if it does not touch the tile.
pub fn circle_in_tile<P: Projection + ?Sized>(
    coord: &LatLng,
    remaining: u64,
    frame: &TileFrame,
    projection: &P,
    walk: &WalkSettings,
) -> Option<ReachableCircle> {
    let meters = walk.walk_radius(remaining);
    let r = pixel_radius(coord, meters, frame.zoom, projection);
    let p = projection.project(coord, frame.zoom);
    let circle = ReachableCircle {
        x: (p.x - frame.origin.x).round() as i64,
        y: (p.y - frame.origin.y).round() as i64,
        r,
    };
    circle.intersects_tile(frame).then_some(circle)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::map::{PixelPoint, TileSize, WebMercator};

    fn walk() -> WalkSettings {
        WalkSettings {
            max_walk_time: 900,
            meters_per_second: 1000.0 / 1200.0,
        }
    }

    #[test]
    fn test_walk_radius_is_capped() {
        let w = walk();
        assert!((w.walk_radius(600) - 500.0).abs() < 1e-9);
        assert!((w.walk_radius(5000) - 750.0).abs() < 1e-9);
        assert!((w.max_walk_distance() - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_radius_has_floor_of_one() {
        let r = pixel_radius(&LatLng::new(52.5, 13.4), 0.0, 10.0, &WebMercator::default());
        assert_eq!(r, 1);
    }

    #[test]
    fn test_pixel_radius_grows_with_zoom() {
        let wm = WebMercator::default();
        let coord = LatLng::new(52.5, 13.4);
        let r12 = pixel_radius(&coord, 750.0, 12.0, &wm);
        let r14 = pixel_radius(&coord, 750.0, 14.0, &wm);
        assert!(r12 > 1);
        assert!((r14 - 4 * r12).abs() <= 2);
    }

    #[test]
    fn test_circle_outside_tile_is_culled() {
        let wm = WebMercator::default();
        let coord = LatLng::new(52.5, 13.4);
        let p = wm.project(&coord, 12.0);
        let on_tile = TileFrame {
            origin: PixelPoint::new(p.x - 128.0, p.y - 128.0),
            size: TileSize::square(256),
            zoom: 12.0,
        };
        let c = circle_in_tile(&coord, 900, &on_tile, &wm, &walk()).expect("circle is centered");
        assert_eq!((c.x, c.y), (128, 128));
        let far_away = TileFrame {
            origin: PixelPoint::new(p.x + 1000.0, p.y),
            ..on_tile
        };
        assert!(circle_in_tile(&coord, 900, &far_away, &wm, &walk()).is_none());
    }

    #[test]
    fn test_circle_just_touching_tile_is_kept() {
        let frame = TileFrame {
            origin: PixelPoint::new(0.0, 0.0),
            size: TileSize::square(256),
            zoom: 1.0,
        };
        let touching = ReachableCircle { x: -10, y: 5, r: 10 };
        let outside = ReachableCircle { x: -11, y: 5, r: 10 };
        assert!(touching.intersects_tile(&frame));
        assert!(!outside.intersects_tile(&frame));
    }
}
