use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// a point in projected pixel space at some zoom level.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    pub x: u32,
    pub y: u32,
}

impl TileSize {
    pub const fn square(size: u32) -> Self {
        Self { x: size, y: size }
    }
}

impl Default for TileSize {
    fn default() -> Self {
        TileSize::square(256)
    }
}

/// address of a tile in the tile pyramid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// pixel position of the tile's top-left corner.
    pub fn origin(&self, tile_size: &TileSize) -> PixelPoint {
        PixelPoint::new(
            self.x as f64 * tile_size.x as f64,
            self.y as f64 * tile_size.y as f64,
        )
    }
}

impl Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
