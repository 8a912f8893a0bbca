use std::time::Instant;

/// coalesces redraw requests of the tile layer.
///
/// a request is served on the next animation frame, and several requests
/// before that frame share it. while the layer is reloading, requests are
/// held back and replayed once when the reload finishes.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    layer_ready: bool,
    needs_redraw: bool,
    tiles_loading: bool,
    frame_requested: bool,
    load_started: Option<Instant>,
}

impl RedrawScheduler {
    pub fn new() -> RedrawScheduler {
        RedrawScheduler::default()
    }

    /// the tile layer exists once the network is loaded. requests made
    /// before that are remembered but cannot be served.
    pub fn attach(&mut self) -> bool {
        self.layer_ready = true;
        self.needs_redraw && self.schedule()
    }

    /// asks for a redraw. returns true when the caller must request an
    /// animation frame from the map.
    pub fn request(&mut self) -> bool {
        self.needs_redraw = true;
        self.schedule()
    }

    /// called on an animation frame. returns true when the tile layer
    /// must be reloaded now.
    pub fn on_frame(&mut self) -> bool {
        if !self.frame_requested {
            return false;
        }
        self.frame_requested = false;
        self.needs_redraw = false;
        true
    }

    pub fn on_loading(&mut self) {
        self.tiles_loading = true;
        self.load_started = Some(Instant::now());
    }

    /// called when the tile layer finished loading. returns true when a
    /// held back request needs an animation frame.
    pub fn on_loaded(&mut self) -> bool {
        self.tiles_loading = false;
        if let Some(started) = self.load_started.take() {
            log::debug!(
                "reloading tile layer took {} ms",
                started.elapsed().as_millis()
            );
        }
        self.needs_redraw && self.schedule()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    fn schedule(&mut self) -> bool {
        if !self.layer_ready || self.tiles_loading || self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }
}
