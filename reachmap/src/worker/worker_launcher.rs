use super::{TaskEnvelope, TaskId, WorkerError, WorkerHandle, WorkerRequest};
use crate::config::ReachmapConfig;
use crate::position::PositionId;
use crate::search::ReachabilitySearch;
use reachmap_core::model::{LatLng, TransitNetwork};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// starts background searches for positions. every task shares the
/// network and reports into the orchestrator's single channel.
#[derive(Clone)]
pub struct WorkerLauncher {
    network: Arc<TransitNetwork>,
    search: Arc<dyn ReachabilitySearch>,
    sender: UnboundedSender<TaskEnvelope>,
    report_interval: u64,
    interval_key: String,
    max_walk_time: u64,
    seconds_per_m: f64,
    search_radius: f64,
    debug: bool,
}

impl WorkerLauncher {
    pub fn new(
        config: &ReachmapConfig,
        network: Arc<TransitNetwork>,
        search: Arc<dyn ReachabilitySearch>,
        sender: UnboundedSender<TaskEnvelope>,
    ) -> WorkerLauncher {
        WorkerLauncher {
            network,
            search,
            sender,
            report_interval: config.report_interval,
            interval_key: config.interval_key.clone(),
            max_walk_time: config.max_walk_time,
            seconds_per_m: config.seconds_per_meter(),
            search_radius: config.initial_station_search_radius,
            debug: config.debug,
        }
    }

    pub fn network(&self) -> &Arc<TransitNetwork> {
        &self.network
    }

    pub fn request(&self, origin: LatLng) -> WorkerRequest {
        WorkerRequest {
            origin,
            network: self.network.clone(),
            report_interval: self.report_interval,
            interval_key: self.interval_key.clone(),
            max_walk_time: self.max_walk_time,
            seconds_per_m: self.seconds_per_m,
            search_radius: self.search_radius,
            bounds: *self.network.bounds(),
            debug: self.debug,
        }
    }

    pub fn launch(
        &self,
        position: PositionId,
        task: TaskId,
        origin: LatLng,
    ) -> Result<WorkerHandle, WorkerError> {
        log::debug!("starting {task} for position {position} at {origin}");
        WorkerHandle::spawn(
            position,
            task,
            self.request(origin),
            self.search.clone(),
            self.sender.clone(),
        )
    }
}
