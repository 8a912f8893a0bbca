use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// identity of one background computation of a position. a position's
/// task ids strictly increase; only messages carrying the current id are applied.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn next(&self) -> TaskId {
        TaskId(self.0 + 1)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task-{}", self.0)
    }
}
