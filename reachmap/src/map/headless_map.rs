use super::{MapSurface, PixelPoint, Projection, TileSize, WebMercator};
use crate::position::{PositionId, PositionView};
use reachmap_core::model::LatLng;
use std::collections::HashMap;

/// a map without a display. it records what it was asked to show so that
/// the command line tool and tests can drive the overlay.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    projection: WebMercator,
    zoom: f64,
    tile_size: TileSize,
    frame_requested: bool,
    reloads: usize,
    views: HashMap<PositionId, PositionView>,
    view_state: Vec<String>,
    publish_count: usize,
}

impl HeadlessMap {
    pub fn new(zoom: f64) -> HeadlessMap {
        let tile_size = TileSize::default();
        HeadlessMap {
            projection: WebMercator {
                tile_size: tile_size.x as f64,
            },
            zoom,
            tile_size,
            frame_requested: false,
            reloads: 0,
            views: HashMap::new(),
            view_state: vec![],
            publish_count: 0,
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn projection(&self) -> WebMercator {
        self.projection
    }

    /// true once per requested animation frame.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn reload_count(&self) -> usize {
        self.reloads
    }

    pub fn view(&self, id: PositionId) -> Option<&PositionView> {
        self.views.get(&id)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn view_state(&self) -> &[String] {
        &self.view_state
    }

    pub fn publish_count(&self) -> usize {
        self.publish_count
    }
}

impl Projection for HeadlessMap {
    fn project(&self, coord: &LatLng, zoom: f64) -> PixelPoint {
        self.projection.project(coord, zoom)
    }

    fn unproject(&self, point: &PixelPoint, zoom: f64) -> LatLng {
        self.projection.unproject(point, zoom)
    }
}

impl MapSurface for HeadlessMap {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    fn reload_tiles(&mut self) {
        self.reloads += 1;
    }

    fn show_position(&mut self, id: PositionId, view: &PositionView) {
        self.views.insert(id, view.clone());
    }

    fn remove_position(&mut self, id: PositionId) {
        self.views.remove(&id);
    }

    fn publish_view_state(&mut self, tokens: &[String]) {
        log::debug!("view state: {}", tokens.join(","));
        self.view_state = tokens.to_vec();
        self.publish_count += 1;
    }
}
