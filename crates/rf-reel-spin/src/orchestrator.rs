//! Reel Spin Orchestrator
//!
//! Owns the reels, the live style, the symbol set and at most one
//! [`SpinSession`]. Everything moves on [`ReelSpinOrchestrator::advance`],
//! called once per frame:
//!
//! ```text
//! Idle ──trigger_spin()──> SpinningOut ──OUT plan done──> (reassign symbols)
//!   ^                                                          │
//!   └────── on_spin_complete(outcome) <── IN plan done ── SpinningIn
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{
    MotionSettings, ReelBounds, SpinConfig, StyleConfig, validate_bounce, validate_reel_count,
};
use crate::error::ReelResult;
use crate::events::{SpinEvent, SpinEventKind, SpinEventLog};
use crate::overlay::OverlaySweep;
use crate::plan::{Arrival, PlanContext};
use crate::reel::{Reel, ReelLayout, resize_reels};
use crate::session::{Phase, SpinOutcome, SpinSession};
use crate::symbols::{SymbolId, SymbolSet};

/// Completion callback, fired once per accepted trigger
pub type SpinCompleteCallback = Box<dyn FnMut(&SpinOutcome) + Send>;

/// Drives spin sessions over a set of reels
pub struct ReelSpinOrchestrator {
    /// Live style; sessions work on a snapshot
    style: StyleConfig,
    bounds: ReelBounds,
    motion: MotionSettings,
    symbols: SymbolSet,
    rng: ChaCha8Rng,

    reels: Vec<Reel>,
    layout: Option<Box<dyn ReelLayout + Send>>,
    overlay: OverlaySweep,

    session: Option<SpinSession>,
    /// Reel count requested while spinning
    pending_reel_count: Option<usize>,
    pending_resync: bool,

    next_session_id: u64,
    completed_sessions: u64,
    last_outcome: Option<SpinOutcome>,

    events: SpinEventLog,
    /// Scratch buffer for per-tick arrivals
    arrivals: Vec<Arrival>,
    on_complete: Option<SpinCompleteCallback>,
}

impl ReelSpinOrchestrator {
    /// Create from a validated config; reels start at rest
    pub fn new(config: SpinConfig) -> ReelResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        let mut reels = Vec::with_capacity(crate::MAX_REELS);
        resize_reels(&mut reels, config.reel_count, config.bounds.y_end);

        log::debug!(
            "Reel orchestrator created: {} reels, out={:?}, in={:?}",
            config.reel_count,
            config.style.out_style,
            config.style.in_style
        );

        Ok(Self {
            style: config.style,
            bounds: config.bounds,
            motion: config.motion,
            symbols: config.symbols,
            rng,
            reels,
            layout: None,
            overlay: OverlaySweep::new(),
            session: None,
            pending_reel_count: None,
            pending_resync: false,
            next_session_id: 1,
            completed_sessions: 0,
            last_outcome: None,
            events: SpinEventLog::new(),
            arrivals: Vec::with_capacity(crate::MAX_REELS),
            on_complete: None,
        })
    }

    /// Create with an external layout collaborator owning the visual reels
    pub fn with_layout(
        config: SpinConfig,
        mut layout: Box<dyn ReelLayout + Send>,
    ) -> ReelResult<Self> {
        let reel_count = config.reel_count;
        let mut orchestrator = Self::new(config)?;

        layout.set_reel_count(reel_count);
        orchestrator.layout = Some(layout);
        orchestrator.resync_reels();

        Ok(orchestrator)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Set reel count and style.
    ///
    /// While a session is active the running spin keeps its own snapshot of
    /// the style and the reel count change waits until it completes.
    pub fn configure(&mut self, reel_count: usize, style: StyleConfig) -> ReelResult<()> {
        validate_reel_count(reel_count)?;
        style.validate()?;
        validate_bounce(&style, &self.bounds)?;

        self.style = style;

        if self.is_spinning() {
            log::debug!("Reel count {} deferred until spin completes", reel_count);
            self.pending_reel_count = Some(reel_count);
        } else {
            self.apply_reel_count(reel_count);
        }
        Ok(())
    }

    /// Replace the symbol set used for the next reassignment.
    ///
    /// [`SymbolSet`] is never empty once constructed, so this cannot fail.
    pub fn set_symbols(&mut self, symbols: SymbolSet) {
        self.symbols = symbols;
    }

    /// Ask the layout collaborator for `count` reels, then re-synchronize.
    ///
    /// Unlike [`configure`](Self::configure) this is not range-checked: the
    /// layout is the source of truth for how many reels exist.
    pub fn set_reel_count(&mut self, count: usize) {
        if self.is_spinning() {
            log::debug!("Reel count {} deferred until spin completes", count);
            self.pending_reel_count = Some(count);
            return;
        }
        self.apply_reel_count(count);
    }

    /// Match the reel array to the layout's current reel count
    pub fn resync_reels(&mut self) {
        if self.is_spinning() {
            self.pending_resync = true;
            return;
        }

        if let Some(layout) = &self.layout {
            let count = layout.reel_count();
            resize_reels(&mut self.reels, count, self.bounds.y_end);
        }
    }

    fn apply_reel_count(&mut self, count: usize) {
        let count = match self.layout.as_mut() {
            Some(layout) => {
                layout.set_reel_count(count);
                layout.reel_count()
            }
            None => count,
        };
        resize_reels(&mut self.reels, count, self.bounds.y_end);
    }

    fn apply_pending(&mut self) {
        if let Some(count) = self.pending_reel_count.take() {
            self.apply_reel_count(count);
        }
        if std::mem::take(&mut self.pending_resync) {
            self.resync_reels();
        }
    }

    /// Register the completion callback
    pub fn on_spin_complete<F>(&mut self, callback: F)
    where
        F: FnMut(&SpinOutcome) + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    /// Seed RNG for reproducible results
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a spin. Returns false, changing nothing, if one is already running.
    pub fn trigger_spin(&mut self) -> bool {
        if self.session.is_some() {
            log::debug!("Spin trigger rejected: session already active");
            return false;
        }

        let id = self.next_session_id;
        self.next_session_id += 1;

        let style = self.style.clone();
        self.push_event(
            id,
            0.0,
            SpinEventKind::SpinStarted {
                reel_count: self.reels.len(),
                out_style: style.out_style,
                in_style: style.in_style,
            },
        );

        if self.reels.is_empty() {
            log::info!("Spin {} complete immediately: no reels", id);
            self.push_event(id, 0.0, SpinEventKind::SpinCompleted { symbols: Vec::new() });
            self.complete(SpinOutcome::empty(id));
            return true;
        }

        for reel in &mut self.reels {
            reel.snap_to(self.bounds.y_end);
        }

        let planner = style.out_style.planner();
        let plan = planner.plan(
            &PlanContext {
                reel_count: self.reels.len(),
                style: &style,
                bounds: &self.bounds,
                motion: &self.motion,
            },
            &mut self.rng,
        );

        log::info!(
            "Spin {} started: {} reels, out={}, in={}",
            id,
            self.reels.len(),
            planner.name(),
            style.in_style.planner().name()
        );
        self.push_event(
            id,
            0.0,
            SpinEventKind::PhaseChanged {
                from: Phase::Idle,
                to: Phase::SpinningOut,
            },
        );

        if style.visual_overlay.enabled {
            self.overlay.show(&style.visual_overlay, &self.motion);
            self.push_event(id, 0.0, SpinEventKind::OverlayShown);
        }

        self.session = Some(SpinSession::begin(id, style, plan));
        true
    }

    /// Advance the active session by one frame
    pub fn advance(&mut self, frame_delta: f32) {
        if !frame_delta.is_finite() {
            log::warn!("Ignoring non-finite frame delta {}", frame_delta);
            return;
        }
        if frame_delta <= 0.0 {
            return;
        }

        let threshold = self.motion.snap_threshold;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.tick(frame_delta);
        let id = session.id();
        let phase = session.phase();
        let timestamp_ms = session.timestamp_ms();

        if self.overlay.advance(frame_delta, threshold) {
            self.events.push(SpinEvent::new(id, timestamp_ms, SpinEventKind::OverlayHolding));
        }
        if phase == Phase::SpinningIn
            && self.overlay.is_visible()
            && session.phase_elapsed() >= session.style().visual_overlay.window_duration
        {
            self.overlay.release();
            self.events.push(SpinEvent::new(
                id,
                timestamp_ms,
                SpinEventKind::OverlayReleased { forced: false },
            ));
        }

        self.arrivals.clear();
        let done = session
            .plan_mut()
            .advance(&mut self.reels, frame_delta, threshold, &mut self.arrivals);

        for arrival in self.arrivals.drain(..) {
            log::debug!(
                "Spin {}: reel {} arrived at {} ({:?})",
                id,
                arrival.reel,
                arrival.offset,
                phase
            );
            self.events.push(SpinEvent::new(
                id,
                timestamp_ms,
                SpinEventKind::ReelArrived {
                    phase,
                    reel: arrival.reel,
                    offset: arrival.offset,
                },
            ));
        }

        if done {
            match phase {
                Phase::SpinningOut => self.finish_out(),
                Phase::SpinningIn => self.finish_in(),
                Phase::Idle => {}
            }
        }
    }

    /// OUT done: draw symbols, park reels above the window, start the IN plan
    fn finish_out(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let id = session.id();
        let timestamp_ms = session.timestamp_ms();
        let reel_count = self.reels.len();

        let symbols = self.symbols.sample_many(&mut self.rng, reel_count);
        let overlay_symbols = if session.style().visual_overlay.enabled {
            self.symbols.sample_many(&mut self.rng, reel_count)
        } else {
            Vec::new()
        };
        self.overlay.set_placeholders(overlay_symbols.clone());

        for reel in &mut self.reels {
            reel.snap_to(self.bounds.y_start);
        }

        let in_plan = session.style().in_style.planner().plan(
            &PlanContext {
                reel_count,
                style: session.style(),
                bounds: &self.bounds,
                motion: &self.motion,
            },
            &mut self.rng,
        );

        log::debug!(
            "Spin {}: OUT complete after {:.3}s, symbols {:?}",
            id,
            session.phase_elapsed(),
            symbols
        );

        self.events.push(SpinEvent::new(
            id,
            timestamp_ms,
            SpinEventKind::SymbolsAssigned {
                symbols: symbols.clone(),
                overlay: overlay_symbols,
            },
        ));
        self.events.push(SpinEvent::new(
            id,
            timestamp_ms,
            SpinEventKind::PhaseChanged {
                from: Phase::SpinningOut,
                to: Phase::SpinningIn,
            },
        ));

        session.enter_in(symbols, in_plan);
    }

    /// IN done: force exact alignment, hide the overlay, return to idle
    fn finish_in(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let id = session.id();
        let timestamp_ms = session.timestamp_ms();

        for reel in &mut self.reels {
            reel.snap_to(self.bounds.y_end);
        }

        if self.overlay.release() {
            log::debug!("Spin {}: overlay still visible at settle, hiding", id);
            self.push_event(id, timestamp_ms, SpinEventKind::OverlayReleased { forced: true });
        }

        self.push_event(
            id,
            timestamp_ms,
            SpinEventKind::PhaseChanged {
                from: Phase::SpinningIn,
                to: Phase::Idle,
            },
        );

        let outcome = session.finish(self.overlay.placeholders().to_vec());
        self.push_event(
            id,
            timestamp_ms,
            SpinEventKind::SpinCompleted {
                symbols: outcome.symbols.clone(),
            },
        );

        log::info!(
            "Spin {} complete in {:.3}s: {:?}",
            id,
            outcome.total_secs(),
            outcome.symbols
        );

        self.apply_pending();
        self.complete(outcome);
    }

    fn complete(&mut self, outcome: SpinOutcome) {
        self.completed_sessions += 1;
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&outcome);
        }
        self.last_outcome = Some(outcome);
    }

    fn push_event(&mut self, session_id: u64, timestamp_ms: f64, kind: SpinEventKind) {
        self.events.push(SpinEvent::new(session_id, timestamp_ms, kind));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DEBUG POSITIONING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Snap every reel to the parked-above offset. Idle only.
    pub fn park_reels(&mut self) -> bool {
        self.snap_all(self.bounds.y_start)
    }

    /// Snap every reel to the resting offset. Idle only.
    pub fn settle_reels(&mut self) -> bool {
        self.snap_all(self.bounds.y_end)
    }

    fn snap_all(&mut self, offset: f32) -> bool {
        if self.is_spinning() {
            return false;
        }
        for reel in &mut self.reels {
            reel.snap_to(offset);
        }
        true
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, SpinSession::phase)
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_some()
    }

    /// Active session, if any
    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn reel_count(&self) -> usize {
        self.reels.len()
    }

    pub fn reel_offsets(&self) -> Vec<f32> {
        self.reels.iter().map(Reel::offset).collect()
    }

    /// Symbols of the running session once drawn, else of the last completed one
    pub fn current_symbols(&self) -> Option<&[SymbolId]> {
        self.session
            .as_ref()
            .and_then(SpinSession::symbols)
            .or_else(|| self.last_outcome.as_ref().map(|o| o.symbols.as_slice()))
    }

    /// Live style (applies to the next spin)
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn bounds(&self) -> &ReelBounds {
        &self.bounds
    }

    pub fn motion(&self) -> &MotionSettings {
        &self.motion
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn overlay(&self) -> &OverlaySweep {
        &self.overlay
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn completed_sessions(&self) -> u64 {
        self.completed_sessions
    }

    /// Take all buffered spin events, oldest first
    pub fn drain_events(&mut self) -> Vec<SpinEvent> {
        self.events.drain()
    }

    pub fn event_log(&self) -> &SpinEventLog {
        &self.events
    }
}

impl std::fmt::Debug for ReelSpinOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReelSpinOrchestrator")
            .field("phase", &self.phase())
            .field("reels", &self.reels)
            .field("style", &self.style)
            .field("overlay", &self.overlay)
            .field("completed_sessions", &self.completed_sessions)
            .finish_non_exhaustive()
    }
}
