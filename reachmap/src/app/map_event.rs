use crate::position::{PositionId, PositionIntent};
use reachmap_core::model::LatLng;

/// interaction and lifecycle events delivered by the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// primary click on the map
    Click(LatLng),
    /// secondary click, explains paths near the point in debug mode
    ContextMenu(LatLng),
    MarkerDragEnd {
        position: PositionId,
        origin: LatLng,
    },
    /// the time slider is being dragged
    SliderInput {
        position: PositionId,
        minutes: u64,
    },
    /// the time slider was released
    SliderChange {
        position: PositionId,
        minutes: u64,
    },
    RemoveClicked(PositionId),
    TilesLoading,
    TilesLoaded,
    AnimationFrame,
    ViewStateInit(Vec<String>),
    ViewStateChange(Vec<String>),
}

impl MapEvent {
    /// the changes this event makes to a single position, in order. events
    /// that are not about one position yield None.
    pub fn position_intents(&self, redraw_on_time_drag: bool) -> Option<(PositionId, Vec<PositionIntent>)> {
        match self {
            MapEvent::MarkerDragEnd { position, origin } => Some((
                *position,
                vec![PositionIntent::Move {
                    origin: *origin,
                    time_budget: None,
                }],
            )),
            MapEvent::SliderInput { position, minutes } => {
                let mut intents = vec![PositionIntent::PreviewMinutes(*minutes)];
                if redraw_on_time_drag {
                    intents.push(PositionIntent::SetTime(minutes.saturating_mul(60)));
                }
                Some((*position, intents))
            }
            MapEvent::SliderChange { position, minutes } => Some((
                *position,
                vec![PositionIntent::SetTime(minutes.saturating_mul(60))],
            )),
            MapEvent::RemoveClicked(position) => Some((*position, vec![PositionIntent::Remove])),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slider_drag_only_sets_time_when_configured() {
        let event = MapEvent::SliderInput {
            position: PositionId(2),
            minutes: 20,
        };
        let (id, intents) = event.position_intents(false).expect("slider targets a position");
        assert_eq!(id, PositionId(2));
        assert_eq!(intents, vec![PositionIntent::PreviewMinutes(20)]);
        let (_, intents) = event.position_intents(true).expect("slider targets a position");
        assert_eq!(
            intents,
            vec![
                PositionIntent::PreviewMinutes(20),
                PositionIntent::SetTime(1200)
            ]
        );
    }

    #[test]
    fn test_map_wide_events_have_no_intents() {
        assert!(MapEvent::Click(LatLng::new(1.0, 2.0))
            .position_intents(true)
            .is_none());
        assert!(MapEvent::TilesLoaded.position_intents(true).is_none());
    }
}
