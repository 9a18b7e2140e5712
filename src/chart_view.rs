// ChartView implementation

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::data_types::{ChartConfig, ChartRange, ChartState, Dataset, ScaleMode, Session, Viewport};
use crate::feed_source::parse_feed;
use crate::rendering::{Frame, RenderTarget, Scene};
use crate::transform::PlotTransform;

/// Identifies one feed request. Completions older than the newest applied
/// one are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// External inputs driving the chart.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    /// A feed body arrived.
    DatasetReady { ticket: FetchTicket, body: String },
    /// A feed request failed.
    FetchFailed { ticket: FetchTicket, reason: String },
    /// The render target changed size.
    ViewportChanged,
    /// The user picked a scale mode.
    ScaleModeChanged(ScaleMode),
}

/// Owns the session state and sequences parse, range, mapping and render.
///
/// Every handler runs to completion and replaces the session as a unit.
pub struct ChartView<T: RenderTarget> {
    config: ChartConfig,
    mode: ScaleMode,
    state: ChartState,
    scene: Scene,
    target: T,
    issued: u64,
    applied: Option<FetchTicket>,
    last_frame: Option<Frame>,
}

impl<T: RenderTarget> ChartView<T> {
    pub fn new(config: ChartConfig, mode: ScaleMode, target: T) -> Self {
        info!(?mode, "ChartView created");
        Self {
            config,
            mode,
            state: ChartState::Uninitialized,
            scene: Scene::new(),
            target,
            issued: 0,
            applied: None,
            last_frame: None,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    pub fn range(&self) -> Option<&ChartRange> {
        self.session().map(|s| &s.range)
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Frame issued by the most recent render pass.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Reserves a ticket for a feed request about to be sent.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    pub fn handle(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::DatasetReady { ticket, body } => self.on_fetch_success(ticket, &body),
            ChartEvent::FetchFailed { ticket, reason } => self.on_fetch_failure(ticket, &reason),
            ChartEvent::ViewportChanged => self.on_viewport_resize(),
            ChartEvent::ScaleModeChanged(mode) => self.on_scale_mode_change(mode),
        }
    }

    /// Parses `body`, derives its range and swaps the session in.
    pub fn on_fetch_success(&mut self, ticket: FetchTicket, body: &str) {
        if self.applied.is_some_and(|applied| ticket < applied) {
            debug!(ticket = ticket.seq(), "ignoring stale feed response");
            return;
        }
        let dataset = parse_feed(body);
        let range = ChartRange::compute(&dataset, self.mode, &self.config.log_scale);
        debug!(ticket = ticket.seq(), points = dataset.len(), ?range, "dataset loaded");

        self.applied = Some(ticket);
        self.state = ChartState::Loaded(Session {
            dataset: Arc::new(dataset),
            range,
        });
        self.redraw();
    }

    /// The chart keeps showing the last good dataset.
    pub fn on_fetch_failure(&mut self, ticket: FetchTicket, reason: &str) {
        warn!(ticket = ticket.seq(), "Failed to receive data: {reason}");
    }

    pub fn on_scale_mode_change(&mut self, mode: ScaleMode) {
        if mode == self.mode {
            return;
        }
        debug!(from = ?self.mode, to = ?mode, "scale mode changed");
        self.mode = mode;

        let ChartState::Loaded(session) = &self.state else {
            return;
        };
        let dataset = Arc::clone(&session.dataset);
        let range = ChartRange::compute(&dataset, mode, &self.config.log_scale);
        self.state = ChartState::Loaded(Session { dataset, range });
        self.redraw();
    }

    /// Recomputes pixel mappings only; the range is left as is.
    pub fn on_viewport_resize(&mut self) {
        self.redraw();
    }

    fn redraw(&mut self) {
        let ChartState::Loaded(session) = &self.state else {
            return;
        };
        let viewport = self.target.viewport();
        let frame = render_session(&mut self.scene, session, self.mode, viewport, &self.config);

        if let Err(err) = self.target.present(&frame) {
            warn!("failed to present frame: {err:#}");
        }
        self.last_frame = Some(frame);
    }
}

fn render_session(
    scene: &mut Scene,
    session: &Session,
    mode: ScaleMode,
    viewport: Viewport,
    config: &ChartConfig,
) -> Frame {
    let margins = config.margins_for(viewport);
    let dataset: &Dataset = &session.dataset;
    let latest = dataset.time_extent().map(|(_, end)| end);
    let transform = PlotTransform::build(&session.range, latest, viewport, mode, &margins, config.label_timezone);
    scene.render(transform.as_ref(), &session.range, dataset, viewport, config)
}
