mod redraw_scheduler;
mod tile_frame;
mod tile_mask;
mod tile_renderer;

pub use redraw_scheduler::RedrawScheduler;
pub use tile_frame::TileFrame;
pub use tile_mask::TileMask;
pub use tile_renderer::TileRenderer;
