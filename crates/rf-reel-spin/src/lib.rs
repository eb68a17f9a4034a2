//! # rf-reel-spin: Reel Spin Orchestrator
//!
//! Drives the reel-spin sequence of a slot-machine widget: per-reel position
//! animation, the visual overlay sweep and symbol reassignment across a
//! configurable number of vertical reels.
//!
//! ## Architecture
//!
//! ```text
//! trigger_spin()                      advance(dt) once per frame
//!     │                                        │
//!     v                                        v
//! ReelSpinOrchestrator ── SpinSession (style snapshot, phase clock)
//!     │                        │
//!     │                        ├── MotionPlan (OUT) ── Track ── Step::Move / Step::Wait
//!     │                        │        └── Reel ── MotionTask (move_towards + snap)
//!     │                        ├── symbol reassignment (SymbolSet)
//!     │                        └── MotionPlan (IN)
//!     ├── OverlaySweep (runs across OUT and IN, released by time window)
//!     └── SpinEvent trace ──> drain_events() / on_spin_complete(SpinOutcome)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rf_reel_spin::{ReelSpinOrchestrator, SpinConfig};
//!
//! let mut slots = ReelSpinOrchestrator::new(SpinConfig::default())?;
//! slots.on_spin_complete(|outcome| println!("{:?}", outcome.symbols));
//!
//! slots.trigger_spin();
//! while slots.is_spinning() {
//!     slots.advance(1.0 / 60.0);
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod motion;
pub mod orchestrator;
pub mod overlay;
pub mod plan;
pub mod reel;
pub mod session;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use error::{ReelError, ReelResult};
pub use events::*;
pub use motion::*;
pub use orchestrator::*;
pub use overlay::*;
pub use plan::*;
pub use reel::*;
pub use session::*;
pub use symbols::*;
pub use timing::*;

/// Minimum configurable reel count
pub const MIN_REELS: usize = 3;

/// Maximum configurable reel count
pub const MAX_REELS: usize = 5;
