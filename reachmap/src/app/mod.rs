mod debug_dump;
mod map_event;
mod reachmap;
mod reachmap_error;

pub use debug_dump::debug_dump;
pub use map_event::MapEvent;
pub use reachmap::Reachmap;
pub use reachmap_error::ReachmapError;
