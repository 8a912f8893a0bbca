use super::{debug_dump, MapEvent, ReachmapError};
use crate::config::ReachmapConfig;
use crate::loader::{load_network, LoadProgress, NetworkDecoder, NetworkSource};
use crate::map::{MapSurface, TileCoord};
use crate::position::{
    MessageOutcome, Position, PositionChange, PositionContext, PositionId, PositionIntent,
    PositionStatus,
};
use crate::render::{RedrawScheduler, TileMask, TileRenderer};
use crate::search::ReachabilitySearch;
use crate::state::{self, PositionState, SyncAction, TokenValidator};
use crate::worker::{TaskEnvelope, WorkerLauncher};
use reachmap_core::model::{LatLng, TransitNetwork};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// the reachability overlay of one map.
///
/// owns the network, the positions and their background searches, and
/// keeps the map's tiles, markers and shareable view state in step with
/// them. all mutation happens through `&mut self` on the thread that
/// drives the map; searches only talk back through the task channel,
/// which is drained by [`Reachmap::process_worker_messages`].
pub struct Reachmap<M: MapSurface> {
    config: Arc<ReachmapConfig>,
    map: M,
    search: Arc<dyn ReachabilitySearch>,
    network: Option<Arc<TransitNetwork>>,
    context: Option<PositionContext>,
    positions: Vec<Position>,
    last_position_id: u64,
    sender: UnboundedSender<TaskEnvelope>,
    receiver: UnboundedReceiver<TaskEnvelope>,
    scheduler: RedrawScheduler,
    renderer: TileRenderer,
    validator: TokenValidator,
    /// view state received before the network was loaded
    pending_view_state: Option<Vec<String>>,
    /// set while restoring view state; publishing waits until it is done
    restoring: bool,
    publish_pending: bool,
}

impl<M: MapSurface> Reachmap<M> {
    pub fn new(
        config: ReachmapConfig,
        map: M,
        search: Arc<dyn ReachabilitySearch>,
    ) -> Result<Reachmap<M>, ReachmapError> {
        config.validate()?;
        let (sender, receiver) = unbounded_channel();
        let renderer = TileRenderer::new(&config);
        Ok(Reachmap {
            config: Arc::new(config),
            map,
            search,
            network: None,
            context: None,
            positions: vec![],
            last_position_id: 0,
            sender,
            receiver,
            scheduler: RedrawScheduler::new(),
            renderer,
            validator: TokenValidator::new()?,
            pending_view_state: None,
            restoring: false,
            publish_pending: false,
        })
    }

    pub fn config(&self) -> &ReachmapConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn network(&self) -> Option<&Arc<TransitNetwork>> {
        self.network.as_ref()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.iter().find(|p| p.id() == id)
    }

    pub fn renderer(&self) -> &TileRenderer {
        &self.renderer
    }

    /// fetches and decodes the network, then initializes the overlay.
    pub fn load(
        &mut self,
        source: &NetworkSource,
        decoder: &dyn NetworkDecoder,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), ReachmapError> {
        if self.network.is_some() {
            return Err(ReachmapError::NetworkAlreadyLoaded);
        }
        let network = load_network(source, decoder, on_progress)?;
        self.init(network, None)
    }

    /// takes the loaded network and attaches the overlay to the map.
    ///
    /// positions are restored from `view_state` (or from view state the map
    /// delivered earlier). when nothing was restored and the configuration
    /// names starting coordinates, a position is placed there.
    pub fn init(
        &mut self,
        network: TransitNetwork,
        view_state: Option<Vec<String>>,
    ) -> Result<(), ReachmapError> {
        if self.network.is_some() {
            return Err(ReachmapError::NetworkAlreadyLoaded);
        }
        let network = Arc::new(network);
        let launcher = WorkerLauncher::new(
            &self.config,
            network.clone(),
            self.search.clone(),
            self.sender.clone(),
        );
        self.context = Some(PositionContext::new(self.config.clone(), launcher));
        self.network = Some(network);
        if self.scheduler.attach() {
            self.map.request_frame();
        }

        if let Some(tokens) = view_state.or_else(|| self.pending_view_state.take()) {
            self.apply_view_state(&tokens)?;
        }
        if let Some([lng, lat]) = self.config.coordinates {
            if self.positions.is_empty() {
                self.add_position(LatLng::new(lat, lng), None)?;
            }
        }
        Ok(())
    }

    /// the single entry point for map events.
    pub fn handle_event(&mut self, event: MapEvent) -> Result<(), ReachmapError> {
        if let Some((id, intents)) = event.position_intents(self.config.redraw_on_time_drag) {
            for intent in intents {
                self.apply_intent(id, intent)?;
            }
            return Ok(());
        }
        match event {
            MapEvent::Click(at) => {
                self.add_position(at, None)?;
            }
            MapEvent::ContextMenu(at) => {
                if self.config.debug {
                    self.debug_dump(&at)?;
                }
            }
            MapEvent::TilesLoading => self.scheduler.on_loading(),
            MapEvent::TilesLoaded => {
                if self.scheduler.on_loaded() {
                    self.map.request_frame();
                }
            }
            MapEvent::AnimationFrame => {
                if self.scheduler.on_frame() {
                    self.map.reload_tiles();
                }
            }
            MapEvent::ViewStateInit(tokens) | MapEvent::ViewStateChange(tokens) => {
                if self.network.is_some() {
                    self.apply_view_state(&tokens)?;
                } else {
                    self.pending_view_state = Some(tokens);
                }
            }
            MapEvent::MarkerDragEnd { .. }
            | MapEvent::SliderInput { .. }
            | MapEvent::SliderChange { .. }
            | MapEvent::RemoveClicked(_) => {}
        }
        Ok(())
    }

    /// places a new position and starts its search.
    pub fn add_position(
        &mut self,
        origin: LatLng,
        time_budget: Option<u64>,
    ) -> Result<PositionId, ReachmapError> {
        let ctx = self.context.as_ref().ok_or(ReachmapError::NetworkNotLoaded)?;
        self.last_position_id += 1;
        let id = PositionId(self.last_position_id);
        let position = Position::create(id, origin, time_budget, ctx);
        log::debug!("added position {id} at {origin}");
        if let Some(view) = position.view() {
            self.map.show_position(id, view);
        }
        self.positions.push(position);
        self.publish_view_state();
        Ok(id)
    }

    /// removes a position, stops its search and clears it from the map.
    pub fn remove_position(&mut self, id: PositionId) -> Result<(), ReachmapError> {
        let index = self.index_of(id)?;
        let mut position = self.positions.remove(index);
        position.destroy();
        self.map.remove_position(id);
        log::debug!("removed position {id}");
        self.redraw();
        self.publish_view_state();
        Ok(())
    }

    /// applies one change to a position. redraw and view state publication
    /// happen at most once for the change.
    pub fn apply_intent(
        &mut self,
        id: PositionId,
        intent: PositionIntent,
    ) -> Result<(), ReachmapError> {
        if intent == PositionIntent::Remove {
            return self.remove_position(id);
        }
        let index = self.index_of(id)?;
        let ctx = self.context.as_ref().ok_or(ReachmapError::NetworkNotLoaded)?;
        let position = &mut self.positions[index];
        let change = match intent {
            PositionIntent::Move {
                origin,
                time_budget,
            } => position.update_position(origin, time_budget, ctx),
            PositionIntent::SetTime(time_budget) => position.set_time(time_budget, ctx),
            PositionIntent::PreviewMinutes(minutes) => {
                position.preview_minutes(minutes);
                PositionChange::NONE
            }
            PositionIntent::Remove => PositionChange::NONE,
        };
        if let Some(view) = position.view() {
            self.map.show_position(id, view);
        }
        self.apply_change(change);
        Ok(())
    }

    /// requests a redraw of the overlay. requests are served on the next
    /// animation frame and held back while the tile layer reloads.
    pub fn redraw(&mut self) {
        if self.scheduler.request() {
            self.map.request_frame();
        }
    }

    /// applies every message the searches have sent so far without
    /// waiting for more.
    ///
    /// # Returns
    ///
    /// * the number of messages that changed a position
    pub fn process_worker_messages(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = self.receiver.try_recv() {
            if self.dispatch(envelope) {
                applied += 1;
            }
        }
        applied
    }

    /// applies search messages as they arrive until no position is
    /// computing any more or `timeout` has passed.
    ///
    /// # Returns
    ///
    /// * true when every search finished in time
    pub fn wait_for_results(&mut self, timeout: Duration) -> Result<bool, ReachmapError> {
        self.process_worker_messages();
        if !self.is_computing() {
            return Ok(true);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(ReachmapError::RuntimeError)?;
        let finished = runtime.block_on(async {
            tokio::time::timeout(timeout, async {
                while self.is_computing() {
                    match self.receiver.recv().await {
                        Some(envelope) => {
                            self.dispatch(envelope);
                        }
                        None => break,
                    }
                }
            })
            .await
            .is_ok()
        });
        Ok(finished && !self.is_computing())
    }

    pub fn is_computing(&self) -> bool {
        self.positions
            .iter()
            .any(|p| p.status() == PositionStatus::Computing)
    }

    /// renders the overlay for one tile of the map.
    pub fn render_tile(&self, tile: &TileCoord) -> TileMask {
        self.renderer.render(
            tile,
            self.map.tile_size(),
            self.network.as_deref(),
            &self.positions,
            &self.map,
        )
    }

    /// the positions as view state tokens at the map's zoom.
    pub fn view_state(&self) -> Vec<String> {
        state::serialize(self.position_states(), self.map.zoom())
    }

    /// makes the positions match the valid prefix of `tokens`. existing
    /// positions are moved, missing ones are created and the rest removed.
    pub fn apply_view_state<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), ReachmapError> {
        let valid = state::parse_valid_prefix(tokens, &self.validator);
        if valid.len() * 3 < tokens.len() {
            log::debug!(
                "view state has {} tokens, only the first {} positions are valid",
                tokens.len(),
                valid.len()
            );
        }
        let actions = state::plan_sync(self.positions.len(), &valid);
        self.restoring = true;
        let result = actions
            .into_iter()
            .try_for_each(|action| self.apply_sync_action(action));
        self.restoring = false;
        if std::mem::take(&mut self.publish_pending) {
            self.publish_view_state();
        }
        result
    }

    /// explains the paths of every position to the stations around `at`.
    /// the lines are logged and returned.
    pub fn debug_dump(&self, at: &LatLng) -> Result<Vec<String>, ReachmapError> {
        let network = self.network.as_ref().ok_or(ReachmapError::NetworkNotLoaded)?;
        let lines = debug_dump(network, &self.positions, at, self.config.debug_search_radius);
        for line in lines.iter() {
            log::info!("{line}");
        }
        Ok(lines)
    }

    fn apply_sync_action(&mut self, action: SyncAction) -> Result<(), ReachmapError> {
        match action {
            SyncAction::Update { index, state } => {
                let id = self
                    .positions
                    .get(index)
                    .map(Position::id)
                    .ok_or(ReachmapError::UnknownPosition(PositionId(index as u64)))?;
                self.apply_intent(
                    id,
                    PositionIntent::Move {
                        origin: state.origin,
                        time_budget: Some(state.time_budget),
                    },
                )
            }
            SyncAction::Create { state } => self
                .add_position(state.origin, Some(state.time_budget))
                .map(|_| ()),
            SyncAction::Remove { index } => {
                let id = self
                    .positions
                    .get(index)
                    .map(Position::id)
                    .ok_or(ReachmapError::UnknownPosition(PositionId(index as u64)))?;
                self.remove_position(id)
            }
        }
    }

    /// applies a search message to its position. returns false for
    /// messages nobody is waiting for.
    fn dispatch(&mut self, envelope: TaskEnvelope) -> bool {
        let Some(ctx) = self.context.as_ref() else {
            return false;
        };
        let Some(position) = self
            .positions
            .iter_mut()
            .find(|p| p.id() == envelope.position)
        else {
            log::debug!(
                "dropping message of {} for removed position {}",
                envelope.task,
                envelope.position
            );
            return false;
        };
        let terminal = envelope.message.is_terminal();
        let outcome = position.handle_message(envelope.task, envelope.message, ctx);
        if terminal && outcome == MessageOutcome::Stale {
            log::debug!(
                "discarding result of superseded {} for position {}",
                envelope.task,
                envelope.position
            );
        }
        if let Some(view) = position.view() {
            if outcome != MessageOutcome::Stale {
                self.map.show_position(envelope.position, view);
            }
        }
        match outcome {
            MessageOutcome::Stale => false,
            MessageOutcome::Completed => {
                self.redraw();
                true
            }
            MessageOutcome::Progress | MessageOutcome::Failed => true,
        }
    }

    fn apply_change(&mut self, change: PositionChange) {
        if change.needs_redraw {
            self.redraw();
        }
        if change.needs_resync {
            self.publish_view_state();
        }
    }

    fn publish_view_state(&mut self) {
        if self.restoring {
            self.publish_pending = true;
            return;
        }
        let tokens = self.view_state();
        self.map.publish_view_state(&tokens);
    }

    fn position_states(&self) -> impl Iterator<Item = PositionState> + '_ {
        self.positions.iter().map(|p| PositionState {
            time_budget: p.time_budget(),
            origin: p.origin(),
        })
    }

    fn index_of(&self, id: PositionId) -> Result<usize, ReachmapError> {
        self.positions
            .iter()
            .position(|p| p.id() == id)
            .ok_or(ReachmapError::UnknownPosition(id))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::map::HeadlessMap;
    use crate::position::PopupView;
    use crate::search::{SearchError, SearchReporter, SearchResult, TransitDijkstra};
    use crate::worker::WorkerRequest;

    const NETWORK: &str = r#"{
        "Cityid": "testville",
        "Stops": [
            {"Latitude": 52.500, "Longitude": 13.400, "Name": "A",
             "TravelOptions": [{"Stop": 1, "TravelTime": 300, "StayTime": 30, "Line": "L1"}]},
            {"Latitude": 52.520, "Longitude": 13.400, "Name": "B"}
        ],
        "Lines": [{"LineId": "L1", "Name": "Line 1",
                   "LineTimes": [{"Interval": 600, "Start": 6, "Stop": 9, "Weekday": 1}]}]
    }"#;

    /// never reports; positions stay computing
    struct IdleSearch;

    impl ReachabilitySearch for IdleSearch {
        fn search(
            &self,
            _request: &WorkerRequest,
            _reporter: &mut dyn SearchReporter,
        ) -> Result<SearchResult, SearchError> {
            Err(SearchError::Cancelled)
        }
    }

    fn network() -> TransitNetwork {
        TransitNetwork::try_from(NETWORK).expect("test network should decode")
    }

    fn reachmap(search: Arc<dyn ReachabilitySearch>) -> Reachmap<HeadlessMap> {
        let mut app = Reachmap::new(ReachmapConfig::default(), HeadlessMap::new(12.0), search)
            .expect("default config is valid");
        app.init(network(), None).expect("network initializes once");
        app
    }

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_click_adds_position_and_publishes_state() {
        let mut app = reachmap(Arc::new(IdleSearch));
        app.handle_event(MapEvent::Click(LatLng::new(52.5, 13.4)))
            .expect("network is loaded");
        assert_eq!(app.positions().len(), 1);
        let id = app.positions()[0].id();
        assert!(app.map().view(id).is_some());
        assert_eq!(app.map().view_state(), &tokens(&["900", "52.5000", "13.4000"]));
    }

    #[test]
    fn test_click_before_load_fails() {
        let mut app = Reachmap::new(
            ReachmapConfig::default(),
            HeadlessMap::new(12.0),
            Arc::new(IdleSearch),
        )
        .expect("default config is valid");
        let result = app.handle_event(MapEvent::Click(LatLng::new(52.5, 13.4)));
        assert!(matches!(result, Err(ReachmapError::NetworkNotLoaded)));
    }

    #[test]
    fn test_view_state_truncates_at_invalid_triple() {
        let mut app = reachmap(Arc::new(IdleSearch));
        app.handle_event(MapEvent::ViewStateInit(tokens(&[
            "900", "52.5", "13.4", "bad", "0", "0",
        ])))
        .expect("view state applies");
        assert_eq!(app.positions().len(), 1);
        assert_eq!(app.positions()[0].time_budget(), 900);
        assert_eq!(app.positions()[0].origin(), LatLng::new(52.5, 13.4));
        // published once, with the invalid tail dropped
        assert_eq!(app.map().publish_count(), 1);
        assert_eq!(app.map().view_state(), &tokens(&["900", "52.5000", "13.4000"]));
    }

    #[test]
    fn test_view_state_converges() {
        let mut app = reachmap(Arc::new(IdleSearch));
        app.apply_view_state(&["600", "52.5", "13.4", "900", "52.51", "13.41", "300", "52.52", "13.42"])
            .expect("view state applies");
        assert_eq!(app.positions().len(), 3);
        let first = app.positions()[0].id();
        let task = app.positions()[0].current_task();

        // same origin, new time: no recomputation; the rest is removed
        app.apply_view_state(&["1200", "52.5", "13.4"])
            .expect("view state applies");
        assert_eq!(app.positions().len(), 1);
        assert_eq!(app.positions()[0].id(), first);
        assert_eq!(app.positions()[0].current_task(), task);
        assert_eq!(app.positions()[0].time_budget(), 1200);
        assert_eq!(app.map().view_count(), 1);

        app.apply_view_state(&[] as &[&str]).expect("view state applies");
        assert!(app.positions().is_empty());
        assert!(app.map().view_state().is_empty());
    }

    #[test]
    fn test_configured_coordinates_place_position() {
        let config = ReachmapConfig {
            coordinates: Some([13.4, 52.5]),
            ..Default::default()
        };
        let mut app = Reachmap::new(config, HeadlessMap::new(12.0), Arc::new(IdleSearch))
            .expect("config is valid");
        app.init(network(), None).expect("network initializes once");
        assert_eq!(app.positions().len(), 1);
        assert_eq!(app.positions()[0].origin(), LatLng::new(52.5, 13.4));
        assert!(matches!(
            app.init(network(), None),
            Err(ReachmapError::NetworkAlreadyLoaded)
        ));
    }

    #[test]
    fn test_restored_state_wins_over_coordinates() {
        let config = ReachmapConfig {
            coordinates: Some([13.4, 52.5]),
            ..Default::default()
        };
        let mut app = Reachmap::new(config, HeadlessMap::new(12.0), Arc::new(IdleSearch))
            .expect("config is valid");
        app.handle_event(MapEvent::ViewStateInit(tokens(&["300", "52.51", "13.41"])))
            .expect("state is held until load");
        assert!(app.positions().is_empty());
        app.init(network(), None).expect("network initializes once");
        assert_eq!(app.positions().len(), 1);
        assert_eq!(app.positions()[0].time_budget(), 300);
    }

    #[test]
    fn test_search_results_flow_back() {
        let mut app = reachmap(Arc::new(TransitDijkstra));
        let id = app
            .add_position(LatLng::new(52.5, 13.4), None)
            .expect("network is loaded");
        let finished = app
            .wait_for_results(Duration::from_secs(10))
            .expect("runtime builds");
        assert!(finished);
        let position = app.position(id).expect("position exists");
        assert_eq!(position.status(), PositionStatus::Ready);
        assert_eq!(position.reachable_times().and_then(|t| t.get(&0)), Some(&0));
        assert!(matches!(
            app.map().view(id).map(|v| &v.popup),
            Some(PopupView::Controls(_))
        ));
        // completion asked for a redraw
        assert!(app.map_mut().take_frame_request());
        app.handle_event(MapEvent::AnimationFrame)
            .expect("frames are handled");
        assert_eq!(app.map().reload_count(), 1);
    }

    #[test]
    fn test_redraw_is_held_during_tile_load() {
        let mut app = reachmap(Arc::new(IdleSearch));
        app.map_mut().take_frame_request();
        app.handle_event(MapEvent::TilesLoading).expect("events apply");
        app.redraw();
        app.redraw();
        assert!(!app.map_mut().take_frame_request());
        app.handle_event(MapEvent::TilesLoaded).expect("events apply");
        assert!(app.map_mut().take_frame_request());
        app.handle_event(MapEvent::AnimationFrame).expect("events apply");
        app.handle_event(MapEvent::AnimationFrame).expect("events apply");
        assert_eq!(app.map().reload_count(), 1);
    }

    #[test]
    fn test_slider_and_removal() {
        let mut app = reachmap(Arc::new(IdleSearch));
        let id = app
            .add_position(LatLng::new(52.5, 13.4), None)
            .expect("network is loaded");
        let published = app.map().publish_count();
        app.handle_event(MapEvent::SliderInput {
            position: id,
            minutes: 30,
        })
        .expect("position exists");
        assert_eq!(app.map().publish_count(), published);
        app.handle_event(MapEvent::SliderChange {
            position: id,
            minutes: 30,
        })
        .expect("position exists");
        assert_eq!(app.map().publish_count(), published + 1);
        assert_eq!(app.view_state(), tokens(&["1800", "52.5000", "13.4000"]));

        app.handle_event(MapEvent::RemoveClicked(id))
            .expect("position exists");
        assert!(app.positions().is_empty());
        assert!(app.map().view(id).is_none());
        assert!(matches!(
            app.handle_event(MapEvent::RemoveClicked(id)),
            Err(ReachmapError::UnknownPosition(_))
        ));
    }

    #[test]
    fn test_render_tile_without_positions_is_transparent() {
        let app = reachmap(Arc::new(IdleSearch));
        let mask = app.render_tile(&TileCoord::new(2200, 1343, 12));
        assert!(mask.is_transparent());
    }
}
