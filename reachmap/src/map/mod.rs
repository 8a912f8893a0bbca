mod headless_map;
mod map_surface;
mod pixel;
mod projection;
mod web_mercator;

pub use headless_map::HeadlessMap;
pub use map_surface::MapSurface;
pub use pixel::{PixelPoint, TileCoord, TileSize};
pub use projection::Projection;
pub use web_mercator::WebMercator;
