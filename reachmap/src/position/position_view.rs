use reachmap_core::model::LatLng;
use serde::{Deserialize, Serialize};

/// everything the map must show for one position: a draggable marker
/// and a popup that either reports progress or offers the time controls.
/// every popup also offers removal of the position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PositionView {
    pub marker: MarkerView,
    pub popup: PopupView,
    pub popup_open: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub origin: LatLng,
    pub opacity: f64,
    pub draggable: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PopupView {
    /// computation in flight. `striped` marks an estimate that has run past its maximum.
    Progress { percent: f64, striped: bool },
    Controls(TimeControls),
}

/// the time slider, in whole minutes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeControls {
    pub minutes: u64,
    pub max_minutes: u64,
    /// label next to the slider, follows the slider while it is dragged
    pub display: String,
}

impl TimeControls {
    pub fn new(time_budget: u64, max_time: u64) -> TimeControls {
        let minutes = seconds_to_minutes(time_budget);
        TimeControls {
            minutes,
            max_minutes: seconds_to_minutes(max_time),
            display: minutes_label(minutes),
        }
    }
}

pub fn minutes_label(minutes: u64) -> String {
    format!("{minutes} min")
}

fn seconds_to_minutes(seconds: u64) -> u64 {
    (seconds as f64 / 60.0).round() as u64
}
