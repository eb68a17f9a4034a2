//! Spin events
//!
//! Timestamped record of what a session did, in order, for hosts that drive
//! audio or UI cues off reel arrivals and phase changes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::{InStyle, OutStyle};
use crate::session::Phase;
use crate::symbols::SymbolId;

/// Events kept before the oldest are dropped
pub const MAX_BUFFERED_EVENTS: usize = 4096;

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpinEventKind {
    SpinStarted {
        reel_count: usize,
        out_style: OutStyle,
        in_style: InStyle,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    /// A reel reached the target of one of its moves
    ReelArrived {
        phase: Phase,
        reel: usize,
        offset: f32,
    },
    SymbolsAssigned {
        symbols: Vec<SymbolId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        overlay: Vec<SymbolId>,
    },
    OverlayShown,
    OverlayHolding,
    /// `forced` when hidden at session end rather than by its window
    OverlayReleased {
        forced: bool,
    },
    SpinCompleted {
        symbols: Vec<SymbolId>,
    },
}

impl SpinEventKind {
    /// Get event type name
    pub fn type_name(&self) -> &'static str {
        match self {
            SpinEventKind::SpinStarted { .. } => "SPIN_STARTED",
            SpinEventKind::PhaseChanged { .. } => "PHASE_CHANGED",
            SpinEventKind::ReelArrived { .. } => "REEL_ARRIVED",
            SpinEventKind::SymbolsAssigned { .. } => "SYMBOLS_ASSIGNED",
            SpinEventKind::OverlayShown => "OVERLAY_SHOWN",
            SpinEventKind::OverlayHolding => "OVERLAY_HOLDING",
            SpinEventKind::OverlayReleased { .. } => "OVERLAY_RELEASED",
            SpinEventKind::SpinCompleted { .. } => "SPIN_COMPLETED",
        }
    }
}

/// An event with its session and time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinEvent {
    pub session_id: u64,
    /// Milliseconds since the session was triggered
    pub timestamp_ms: f64,
    #[serde(flatten)]
    pub kind: SpinEventKind,
}

impl SpinEvent {
    pub fn new(session_id: u64, timestamp_ms: f64, kind: SpinEventKind) -> Self {
        Self {
            session_id,
            timestamp_ms,
            kind,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// Bounded FIFO of undrained events
#[derive(Debug, Clone, Default)]
pub struct SpinEventLog {
    events: VecDeque<SpinEvent>,
    dropped: u64,
}

impl SpinEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SpinEvent) {
        if self.events.len() >= MAX_BUFFERED_EVENTS {
            self.events.pop_front();
            self.dropped += 1;
            if self.dropped == 1 {
                log::warn!("Spin event log full, dropping oldest events");
            }
        }
        self.events.push_back(event);
    }

    /// Take every buffered event, oldest first
    pub fn drain(&mut self) -> Vec<SpinEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to the buffer limit
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpinEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = SpinEventLog::new();
        for i in 0..(MAX_BUFFERED_EVENTS + 10) {
            log.push(SpinEvent::new(1, i as f64, SpinEventKind::OverlayShown));
        }
        assert_eq!(log.len(), MAX_BUFFERED_EVENTS);
        assert_eq!(log.dropped(), 10);

        let drained = log.drain();
        assert_eq!(drained[0].timestamp_ms, 10.0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event = SpinEvent::new(
            3,
            120.0,
            SpinEventKind::ReelArrived {
                phase: Phase::SpinningIn,
                reel: 2,
                offset: 0.0,
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "reel_arrived");
        assert_eq!(json["session_id"], 3);
        assert_eq!(json["reel"], 2);
        assert_eq!(event.type_name(), "REEL_ARRIVED");
    }
}
