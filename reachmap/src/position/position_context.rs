use super::WalkSettings;
use crate::config::ReachmapConfig;
use crate::worker::WorkerLauncher;
use std::sync::Arc;

/// what a position needs from its map: settings and a way to start searches.
#[derive(Clone)]
pub struct PositionContext {
    pub config: Arc<ReachmapConfig>,
    pub launcher: WorkerLauncher,
}

impl PositionContext {
    pub fn new(config: Arc<ReachmapConfig>, launcher: WorkerLauncher) -> Self {
        Self { config, launcher }
    }

    pub fn walk_settings(&self) -> WalkSettings {
        WalkSettings::from(self.config.as_ref())
    }
}
