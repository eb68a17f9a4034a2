//! Spin session
//!
//! One spin-out / reassign / spin-in cycle. Sessions are only created by the
//! orchestrator, which holds at most one at a time.

use serde::{Deserialize, Serialize};

use crate::config::StyleConfig;
use crate::plan::MotionPlan;
use crate::symbols::SymbolId;

/// Spin state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting triggers
    #[default]
    Idle,
    /// Reels leaving the window
    SpinningOut,
    /// Reels coming back with fresh symbols
    SpinningIn,
}

impl Phase {
    #[inline]
    pub fn is_spinning(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// An active spin
#[derive(Debug, Clone)]
pub struct SpinSession {
    id: u64,
    phase: Phase,
    style: StyleConfig,
    plan: MotionPlan,
    elapsed: f32,
    phase_elapsed: f32,
    out_secs: f32,
    symbols: Option<Vec<SymbolId>>,
}

impl SpinSession {
    /// Start in `SpinningOut` with a style snapshot and the OUT plan
    pub(crate) fn begin(id: u64, style: StyleConfig, out_plan: MotionPlan) -> Self {
        Self {
            id,
            phase: Phase::SpinningOut,
            style,
            plan: out_plan,
            elapsed: 0.0,
            phase_elapsed: 0.0,
            out_secs: 0.0,
            symbols: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Style captured when the spin was triggered
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn plan(&self) -> &MotionPlan {
        &self.plan
    }

    /// Seconds since trigger
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds since the current phase began
    pub fn phase_elapsed(&self) -> f32 {
        self.phase_elapsed
    }

    /// Milliseconds since trigger, for event timestamps
    pub fn timestamp_ms(&self) -> f64 {
        f64::from(self.elapsed) * 1000.0
    }

    /// Symbols drawn for this session, once reassignment has happened
    pub fn symbols(&self) -> Option<&[SymbolId]> {
        self.symbols.as_deref()
    }

    pub(crate) fn plan_mut(&mut self) -> &mut MotionPlan {
        &mut self.plan
    }

    pub(crate) fn tick(&mut self, frame_delta: f32) {
        self.elapsed += frame_delta;
        self.phase_elapsed += frame_delta;
    }

    /// Record the drawn symbols and switch to the IN plan
    pub(crate) fn enter_in(&mut self, symbols: Vec<SymbolId>, in_plan: MotionPlan) {
        self.out_secs = self.phase_elapsed;
        self.symbols = Some(symbols);
        self.plan = in_plan;
        self.phase = Phase::SpinningIn;
        self.phase_elapsed = 0.0;
    }

    /// Close the session and build its outcome
    pub(crate) fn finish(self, overlay_symbols: Vec<SymbolId>) -> SpinOutcome {
        SpinOutcome {
            session_id: self.id,
            symbols: self.symbols.unwrap_or_default(),
            overlay_symbols,
            out_secs: self.out_secs,
            in_secs: self.phase_elapsed,
        }
    }
}

/// Result of a completed session, handed to the completion callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub session_id: u64,
    /// Final symbol per reel, reel 0 first
    pub symbols: Vec<SymbolId>,
    /// Symbols on the overlay placeholders (empty when the overlay is off)
    #[serde(default)]
    pub overlay_symbols: Vec<SymbolId>,
    /// Duration of the OUT phase
    pub out_secs: f32,
    /// Duration of the IN phase
    pub in_secs: f32,
}

impl SpinOutcome {
    /// Outcome of a spin with no reels
    pub(crate) fn empty(session_id: u64) -> Self {
        Self {
            session_id,
            symbols: Vec::new(),
            overlay_symbols: Vec::new(),
            out_secs: 0.0,
            in_secs: 0.0,
        }
    }

    pub fn total_secs(&self) -> f32 {
        self.out_secs + self.in_secs
    }

    /// Stub match check: every reel shows the same symbol
    pub fn all_match(&self) -> bool {
        match self.symbols.split_first() {
            Some((first, rest)) => rest.iter().all(|s| s == first),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_phases() {
        let mut session = SpinSession::begin(1, StyleConfig::classic(), MotionPlan::default());
        assert_eq!(session.phase(), Phase::SpinningOut);
        assert!(session.symbols().is_none());

        session.tick(0.25);
        session.enter_in(vec![SymbolId(1), SymbolId(2)], MotionPlan::default());
        assert_eq!(session.phase(), Phase::SpinningIn);
        assert_eq!(session.phase_elapsed(), 0.0);
        assert_eq!(session.symbols(), Some(&[SymbolId(1), SymbolId(2)][..]));

        session.tick(0.5);
        assert_eq!(session.timestamp_ms(), 750.0);

        let outcome = session.finish(Vec::new());
        assert_eq!(outcome.out_secs, 0.25);
        assert_eq!(outcome.in_secs, 0.5);
        assert_eq!(outcome.total_secs(), 0.75);
    }

    #[test]
    fn test_all_match() {
        let mut outcome = SpinOutcome::empty(1);
        assert!(!outcome.all_match());

        outcome.symbols = vec![SymbolId(7); 3];
        assert!(outcome.all_match());

        outcome.symbols[1] = SymbolId(2);
        assert!(!outcome.all_match());
    }
}
