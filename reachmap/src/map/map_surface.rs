use super::{Projection, TileSize};
use crate::position::{PositionId, PositionView};

/// the interactive map the overlay is drawn on. it owns the tile layer,
/// the markers and popups, and the shareable view state.
pub trait MapSurface: Projection {
    fn zoom(&self) -> f64;

    fn tile_size(&self) -> TileSize;

    /// ask for an animation frame event on the next repaint.
    fn request_frame(&mut self);

    /// drop and re-render every visible overlay tile.
    fn reload_tiles(&mut self);

    /// create or update the marker and popup of a position.
    fn show_position(&mut self, id: PositionId, view: &PositionView);

    fn remove_position(&mut self, id: PositionId);

    /// replace the serialized positions in the shareable view state.
    fn publish_view_state(&mut self, tokens: &[String]);
}
