use reachmap_core::model::LatLng;

/// a user or state-driven change to a single position.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionIntent {
    /// new origin, optionally with a new time budget in seconds
    Move {
        origin: LatLng,
        time_budget: Option<u64>,
    },
    /// new time budget in seconds
    SetTime(u64),
    /// slider moved without release; only the label follows
    PreviewMinutes(u64),
    Remove,
}

/// what the orchestrator must do after a position changed. each flag
/// is acted on once per change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionChange {
    pub needs_redraw: bool,
    pub needs_resync: bool,
}

impl PositionChange {
    pub const NONE: PositionChange = PositionChange {
        needs_redraw: false,
        needs_resync: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.needs_redraw && !self.needs_resync
    }
}
