use super::position_view::minutes_label;
use super::reachable_circle::circle_in_tile;
use super::{
    MarkerView, PopupView, PositionChange, PositionContext, PositionId, PositionView,
    ProgressDisplay, ReachableCircle, TimeControls, WalkSettings,
};
use crate::map::Projection;
use crate::render::TileFrame;
use crate::search::{DebugMap, StationTimes};
use crate::worker::{TaskId, WorkerHandle, WorkerMessage};
use reachmap_core::model::{LatLng, Station};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStatus {
    Computing,
    Ready,
    /// the search reported an error. the position keeps showing progress
    /// and is not retried.
    Failed,
    Destroyed,
}

/// effect of a worker message on a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// message from a superseded or terminated task, discarded
    Stale,
    Progress,
    Completed,
    Failed,
}

/// a user-placed origin with its time budget and the result of its
/// background search.
pub struct Position {
    id: PositionId,
    origin: LatLng,
    time_budget: u64,
    reachable_times: Option<StationTimes>,
    debug_map: Option<DebugMap>,
    progress_count: u64,
    progress: ProgressDisplay,
    status: PositionStatus,
    /// the only task whose messages are applied
    current_task: Option<TaskId>,
    last_task: TaskId,
    worker: Option<WorkerHandle>,
    view: Option<PositionView>,
}

impl Position {
    /// places a marker with an open popup and starts computing right away.
    pub fn create(
        id: PositionId,
        origin: LatLng,
        time_budget: Option<u64>,
        ctx: &PositionContext,
    ) -> Position {
        let progress = ProgressDisplay::exact(0.0);
        let mut position = Position {
            id,
            origin,
            time_budget: time_budget.unwrap_or(ctx.config.default_time_budget),
            reachable_times: None,
            debug_map: None,
            progress_count: 0,
            progress,
            status: PositionStatus::Computing,
            current_task: None,
            last_task: TaskId(0),
            worker: None,
            view: Some(PositionView {
                marker: MarkerView {
                    origin,
                    opacity: progress.marker_opacity(),
                    draggable: true,
                },
                popup: PopupView::Progress {
                    percent: 0.0,
                    striped: false,
                },
                popup_open: true,
            }),
        };
        position.start_calculation(ctx);
        position
    }

    pub fn id(&self) -> PositionId {
        self.id
    }

    pub fn origin(&self) -> LatLng {
        self.origin
    }

    pub fn time_budget(&self) -> u64 {
        self.time_budget
    }

    pub fn reachable_times(&self) -> Option<&StationTimes> {
        self.reachable_times.as_ref()
    }

    pub fn debug_map(&self) -> Option<&DebugMap> {
        self.debug_map.as_ref()
    }

    pub fn progress_count(&self) -> u64 {
        self.progress_count
    }

    pub fn progress(&self) -> ProgressDisplay {
        self.progress
    }

    pub fn status(&self) -> PositionStatus {
        self.status
    }

    pub fn current_task(&self) -> Option<TaskId> {
        self.current_task
    }

    pub fn view(&self) -> Option<&PositionView> {
        self.view.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == PositionStatus::Destroyed
    }

    /// moves the position and/or changes its time budget.
    ///
    /// a new origin discards the current result and restarts the search;
    /// a new time budget alone only needs a redraw. either change is
    /// reported once in the returned [`PositionChange`].
    pub fn update_position(
        &mut self,
        origin: LatLng,
        time_budget: Option<u64>,
        ctx: &PositionContext,
    ) -> PositionChange {
        if self.is_destroyed() {
            return PositionChange::NONE;
        }
        let mut change = PositionChange::NONE;
        if let Some(time) = time_budget {
            if time != self.time_budget {
                change.needs_redraw = true;
                self.time_budget = time;
                self.refresh_controls(ctx);
            }
        }
        let needs_recalc = self.origin != origin;
        self.origin = origin;
        if needs_recalc {
            self.reachable_times = None;
            self.debug_map = None;
            self.progress_count = 0;
            if let Some(view) = self.view.as_mut() {
                view.marker.origin = origin;
            }
            self.start_calculation(ctx);
            change.needs_redraw = true;
        }
        change.needs_resync = change.needs_redraw || needs_recalc;
        change
    }

    /// sets the time budget in seconds. no recomputation is needed.
    pub fn set_time(&mut self, time_budget: u64, ctx: &PositionContext) -> PositionChange {
        if self.is_destroyed() || time_budget == self.time_budget {
            return PositionChange::NONE;
        }
        self.time_budget = time_budget;
        self.refresh_controls(ctx);
        PositionChange {
            needs_redraw: true,
            needs_resync: true,
        }
    }

    /// updates the slider label while it is dragged.
    pub fn preview_minutes(&mut self, minutes: u64) {
        if let Some(PopupView::Controls(controls)) = self.view.as_mut().map(|v| &mut v.popup) {
            controls.display = minutes_label(minutes);
        }
    }

    /// updates the progress popup and marker opacity. without an explicit
    /// percentage the progress is estimated from the search's iteration
    /// counter and never shown above 99%.
    pub fn update_progress(&mut self, percent: Option<f64>, estimated_max: u64) {
        self.progress = match percent {
            Some(p) => ProgressDisplay::exact(p),
            None => ProgressDisplay::estimate(self.progress_count, estimated_max),
        };
        if let Some(view) = self.view.as_mut() {
            view.marker.opacity = self.progress.marker_opacity();
            if let PopupView::Progress { percent, striped } = &mut view.popup {
                *percent = self.progress.percent;
                *striped = self.progress.striped;
            }
        }
    }

    /// applies a message from a background search. messages from any task
    /// other than the current one are discarded.
    pub fn handle_message(
        &mut self,
        task: TaskId,
        message: WorkerMessage,
        ctx: &PositionContext,
    ) -> MessageOutcome {
        if self.current_task != Some(task) || self.is_destroyed() {
            log::debug!("position {} discarding message from stale {task}", self.id);
            return MessageOutcome::Stale;
        }
        match message {
            WorkerMessage::Working { at } => {
                self.progress_count = self.progress_count.max(at);
                self.update_progress(None, ctx.config.estimated_max_calculate_calls);
                MessageOutcome::Progress
            }
            WorkerMessage::Done {
                station_map,
                debug_map,
                count,
            } => {
                log::debug!(
                    "position {} reached {} stations in {count} iterations",
                    self.id,
                    station_map.len()
                );
                self.update_progress(Some(100.0), ctx.config.estimated_max_calculate_calls);
                self.reachable_times = Some(station_map);
                self.debug_map = debug_map;
                self.status = PositionStatus::Ready;
                self.worker = None;
                self.show_controls(ctx);
                MessageOutcome::Completed
            }
            WorkerMessage::Error { message } => {
                log::error!("search for position {} failed: {message}", self.id);
                self.status = PositionStatus::Failed;
                self.worker = None;
                MessageOutcome::Failed
            }
        }
    }

    /// walking circles, in tile-local pixels, for the origin and for every
    /// candidate station reached within the time budget. circles that do not
    /// touch the tile are skipped. the sequence is lazy and can be restarted
    /// by cloning it. a position without a result yields nothing.
    pub fn reachable_circles<'a, P: Projection + ?Sized>(
        &'a self,
        candidates: &'a [&'a Station],
        frame: &'a TileFrame,
        projection: &'a P,
        walk: WalkSettings,
    ) -> impl Iterator<Item = ReachableCircle> + Clone + 'a {
        let budget = self.time_budget;
        let times = self.reachable_times.as_ref();
        // walking starts at the origin
        let origin = times.map(|_| (self.origin, 0u64));
        let stations = times.into_iter().flat_map(move |times| {
            candidates.iter().filter_map(move |station| {
                let reached_in = *times.get(&station.id)?;
                (reached_in < budget).then(|| (station.lat_lng(), reached_in))
            })
        });
        origin
            .into_iter()
            .chain(stations)
            .filter_map(move |(coord, reached_in)| {
                circle_in_tile(&coord, budget - reached_in, frame, projection, &walk)
            })
    }

    /// removes the marker and popup, stops the search and drops the result.
    /// calling it again has no effect.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        if let Some(mut worker) = self.worker.take() {
            worker.terminate();
        }
        self.current_task = None;
        self.view = None;
        self.reachable_times = None;
        self.debug_map = None;
        self.status = PositionStatus::Destroyed;
    }

    fn start_calculation(&mut self, ctx: &PositionContext) {
        if let Some(mut previous) = self.worker.take() {
            previous.terminate();
        }
        self.status = PositionStatus::Computing;
        self.progress = ProgressDisplay::exact(0.0);
        if let Some(view) = self.view.as_mut() {
            view.popup = PopupView::Progress {
                percent: 0.0,
                striped: false,
            };
            view.marker.opacity = self.progress.marker_opacity();
            view.popup_open = true;
        }
        let task = self.last_task.next();
        self.last_task = task;
        self.current_task = Some(task);
        match ctx.launcher.launch(self.id, task, self.origin) {
            Ok(handle) => self.worker = Some(handle),
            Err(e) => {
                log::error!("position {} could not start its search: {e}", self.id);
                self.status = PositionStatus::Failed;
            }
        }
    }

    fn show_controls(&mut self, ctx: &PositionContext) {
        if let Some(view) = self.view.as_mut() {
            view.popup = PopupView::Controls(TimeControls::new(
                self.time_budget,
                ctx.config.max_walk_travel_time,
            ));
        }
    }

    fn refresh_controls(&mut self, ctx: &PositionContext) {
        if matches!(
            self.view.as_ref().map(|v| &v.popup),
            Some(PopupView::Controls(_))
        ) {
            self.show_controls(ctx);
        }
    }
}

impl Drop for Position {
    fn drop(&mut self) {
        self.destroy();
    }
}
