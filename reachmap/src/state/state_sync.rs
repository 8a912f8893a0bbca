use super::PositionState;

/// one step that brings the position list in line with restored state.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    /// move the existing position at `index`
    Update { index: usize, state: PositionState },
    /// append a new position
    Create { state: PositionState },
    /// remove the position at `index`
    Remove { index: usize },
}

/// steps that turn a list of `current_len` positions into exactly `valid`.
///
/// positions that exist are updated in place, missing ones are appended
/// and surplus ones are removed from the back, so every index stays valid
/// while the actions are applied in order.
pub fn plan_sync(current_len: usize, valid: &[PositionState]) -> Vec<SyncAction> {
    let mut actions = valid
        .iter()
        .enumerate()
        .map(|(index, state)| {
            if index < current_len {
                SyncAction::Update {
                    index,
                    state: *state,
                }
            } else {
                SyncAction::Create { state: *state }
            }
        })
        .collect::<Vec<_>>();
    actions.extend(
        (valid.len()..current_len)
            .rev()
            .map(|index| SyncAction::Remove { index }),
    );
    actions
}
