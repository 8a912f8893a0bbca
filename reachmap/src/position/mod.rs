mod position;
mod position_context;
mod position_id;
mod position_intent;
mod position_view;
mod progress;
mod reachable_circle;

pub use position::{MessageOutcome, Position, PositionStatus};
pub use position_context::PositionContext;
pub use position_id::PositionId;
pub use position_intent::{PositionChange, PositionIntent};
pub use position_view::{MarkerView, PopupView, PositionView, TimeControls};
pub use progress::ProgressDisplay;
pub use reachable_circle::{ReachableCircle, WalkSettings};
