use super::{TileFrame, TileMask};
use crate::config::ReachmapConfig;
use crate::map::{Projection, TileCoord, TileSize};
use crate::position::{Position, WalkSettings};
use itertools::Itertools;
use reachmap_core::model::TransitNetwork;

/// rasterizes the reachability overlay for single tiles.
///
/// every tile is computed from scratch out of the network, the positions
/// and the projection; nothing is kept between calls, so tiles can be
/// rendered in any order or in parallel.
#[derive(Debug, Clone, Copy)]
pub struct TileRenderer {
    overlay: [u8; 4],
    walk: WalkSettings,
}

impl TileRenderer {
    pub fn new(config: &ReachmapConfig) -> TileRenderer {
        let [r, g, b] = config.overlay_color;
        let alpha = (config.overlay_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
        TileRenderer {
            overlay: [r, g, b, alpha],
            walk: WalkSettings::from(config),
        }
    }

    pub fn overlay(&self) -> [u8; 4] {
        self.overlay
    }

    /// radius in meters around the tile center that contains every station
    /// whose walking circle can reach into the tile.
    pub fn search_radius<P: Projection + ?Sized>(&self, frame: &TileFrame, projection: &P) -> f64 {
        let span = frame.span(projection);
        (2.0 * span * span).sqrt() + self.walk.max_walk_distance()
    }

    /// renders one tile.
    ///
    /// the tile is covered with the overlay, then every walking circle of
    /// every position is cut out of it. without a network or without
    /// positions the tile stays fully transparent.
    ///
    /// # Arguments
    ///
    /// * `tile` - tile address, its `z` is the zoom level
    /// * `size` - tile size in pixels
    /// * `network` - the loaded network, if any
    /// * `positions` - positions in display order
    /// * `projection` - the map's projection
    ///
    /// # Returns
    ///
    /// * the RGBA mask for the tile
    pub fn render<P: Projection + ?Sized>(
        &self,
        tile: &TileCoord,
        size: TileSize,
        network: Option<&TransitNetwork>,
        positions: &[Position],
        projection: &P,
    ) -> TileMask {
        let mut mask = TileMask::transparent(size.x, size.y);
        let Some(network) = network else {
            return mask;
        };
        if positions.is_empty() {
            return mask;
        }
        let frame = TileFrame::for_tile(tile, size);
        let center = frame.center(projection);
        let radius = self.search_radius(&frame, projection);
        let candidates = network.stations_in_radius(&center, radius);
        log::trace!(
            "tile {tile}: {} candidate stations within {radius:.0}m",
            candidates.len()
        );

        mask.fill(self.overlay);
        let circles = positions
            .iter()
            .flat_map(|p| p.reachable_circles(&candidates, &frame, projection, self.walk))
            .collect_vec();
        for circle in circles {
            mask.erase_circle(circle.x, circle.y, circle.r);
        }
        mask
    }
}
