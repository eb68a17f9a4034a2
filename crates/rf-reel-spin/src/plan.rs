//! Motion plans
//!
//! A spin style is a [`MotionPlanner`] that produces a [`MotionPlan`]: a set
//! of tracks, each an ordered list of steps. Tracks run side by side and the
//! plan completes when every track has completed, so "all reels at once" is
//! one track per reel and "one reel after another" is a single track. The
//! orchestrator executes any plan the same way; a new style only needs a new
//! planner.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::{InStyle, MotionSettings, OutStyle, ReelBounds, StyleConfig};
use crate::motion::MotionTask;
use crate::reel::Reel;

// ═══════════════════════════════════════════════════════════════════════════════
// STEPS & TRACKS
// ═══════════════════════════════════════════════════════════════════════════════

/// One unit of work on a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Move a reel to `target` at `speed` units per second
    Move { reel: usize, target: f32, speed: f32 },
    /// Idle for `secs`
    Wait { secs: f32 },
}

/// A reel reaching the target of a move step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    pub reel: usize,
    pub offset: f32,
}

/// Ordered steps executed one at a time
///
/// A move step launches its reel's motion on the first tick it is current and
/// completes on the tick the reel arrives; the next step starts on the
/// following tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    steps: Vec<Step>,
    cursor: usize,
    launched: bool,
    waited: f32,
}

impl Track {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            cursor: 0,
            launched: false,
            waited: 0.0,
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Step currently executing
    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.cursor)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn next(&mut self) {
        self.cursor += 1;
        self.launched = false;
        self.waited = 0.0;
    }

    fn advance(
        &mut self,
        reels: &mut [Reel],
        frame_delta: f32,
        threshold: f32,
        arrivals: &mut Vec<Arrival>,
    ) {
        let Some(step) = self.current().copied() else {
            return;
        };

        match step {
            Step::Move { reel, target, speed } => {
                let Some(r) = reels.get_mut(reel) else {
                    log::warn!("Motion step for missing reel {} skipped", reel);
                    self.next();
                    return;
                };

                if !self.launched {
                    r.launch(MotionTask::new(target, speed));
                    self.launched = true;
                }

                if r.step(frame_delta, threshold).is_arrived() {
                    arrivals.push(Arrival {
                        reel,
                        offset: r.offset(),
                    });
                    self.next();
                }
            }
            Step::Wait { secs } => {
                self.waited += frame_delta;
                if self.waited >= secs {
                    self.next();
                }
            }
        }
    }
}

/// Tracks advanced together, complete when all are (fan-out / fan-in)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionPlan {
    tracks: Vec<Track>,
}

impl MotionPlan {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// One track per entry, each run in parallel
    pub fn parallel(steps: impl IntoIterator<Item = Vec<Step>>) -> Self {
        Self::new(steps.into_iter().map(Track::new).collect())
    }

    /// A single track running every step in order
    pub fn sequential(steps: Vec<Step>) -> Self {
        Self::new(vec![Track::new(steps)])
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// True once every track has run out of steps (an empty plan is complete)
    pub fn is_complete(&self) -> bool {
        self.tracks.iter().all(Track::is_done)
    }

    /// Advance every unfinished track by one tick; returns `is_complete()`
    pub fn advance(
        &mut self,
        reels: &mut [Reel],
        frame_delta: f32,
        threshold: f32,
        arrivals: &mut Vec<Arrival>,
    ) -> bool {
        for track in self.tracks.iter_mut().filter(|t| !t.is_done()) {
            track.advance(reels, frame_delta, threshold, arrivals);
        }
        self.is_complete()
    }

    /// Targets a reel will visit, in order
    pub fn waypoints(&self, reel: usize) -> Vec<f32> {
        self.tracks
            .iter()
            .flat_map(|t| t.steps.iter())
            .filter_map(|step| match *step {
                Step::Move { reel: r, target, .. } if r == reel => Some(target),
                _ => None,
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLANNERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Inputs a planner may use
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub reel_count: usize,
    pub style: &'a StyleConfig,
    pub bounds: &'a ReelBounds,
    pub motion: &'a MotionSettings,
}

/// Produces the motion plan of one phase
pub trait MotionPlanner: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Build the plan for a phase
    fn plan(&self, ctx: &PlanContext<'_>, rng: &mut dyn RngCore) -> MotionPlan;
}

/// OUT: every reel leaves at once with its own jittered speed
#[derive(Debug, Clone, Copy, Default)]
pub struct AllAtOnce;

impl MotionPlanner for AllAtOnce {
    fn name(&self) -> &'static str {
        "all"
    }

    fn plan(&self, ctx: &PlanContext<'_>, rng: &mut dyn RngCore) -> MotionPlan {
        let jitter = ctx.style.per_reel_jitter;
        let target = ctx.bounds.out_target();

        MotionPlan::parallel((0..ctx.reel_count).map(|reel| {
            let offset = if jitter > 0.0 {
                rng.random_range(-jitter..=jitter)
            } else {
                0.0
            };
            vec![Step::Move {
                reel,
                target,
                speed: ctx.motion.units_per_sec(ctx.style.speed_out + offset),
            }]
        }))
    }
}

/// OUT: reels leave one after another, each followed by the stagger delay
#[derive(Debug, Clone, Copy, Default)]
pub struct OneByOneOut;

impl MotionPlanner for OneByOneOut {
    fn name(&self) -> &'static str {
        "one_by_one"
    }

    fn plan(&self, ctx: &PlanContext<'_>, _rng: &mut dyn RngCore) -> MotionPlan {
        let target = ctx.bounds.out_target();
        let speed = ctx.motion.units_per_sec(ctx.style.speed_out);

        MotionPlan::sequential(
            (0..ctx.reel_count)
                .flat_map(|reel| {
                    [
                        Step::Move { reel, target, speed },
                        Step::Wait {
                            secs: ctx.style.stagger_delay,
                        },
                    ]
                })
                .collect(),
        )
    }
}

/// IN: reels slide straight to rest, strictly one at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustIn;

impl MotionPlanner for RobustIn {
    fn name(&self) -> &'static str {
        "robust"
    }

    fn plan(&self, ctx: &PlanContext<'_>, _rng: &mut dyn RngCore) -> MotionPlan {
        let target = ctx.bounds.y_end;
        let speed = ctx.motion.units_per_sec(ctx.style.speed_in);

        MotionPlan::sequential(
            (0..ctx.reel_count)
                .map(|reel| Step::Move { reel, target, speed })
                .collect(),
        )
    }
}

/// IN: each reel overshoots to a waypoint, then settles at the bounce speed
#[derive(Debug, Clone, Copy, Default)]
pub struct BouncyIn;

impl MotionPlanner for BouncyIn {
    fn name(&self) -> &'static str {
        "bouncy"
    }

    fn plan(&self, ctx: &PlanContext<'_>, _rng: &mut dyn RngCore) -> MotionPlan {
        let rest = ctx.bounds.y_end;
        let waypoint = bounce_waypoint(ctx.style, ctx.bounds);
        let speed_in = ctx.motion.units_per_sec(ctx.style.speed_in);
        let settle = ctx.motion.units_per_sec(ctx.style.bounce_speed);

        MotionPlan::sequential(
            (0..ctx.reel_count)
                .flat_map(|reel| {
                    [
                        Step::Move {
                            reel,
                            target: waypoint,
                            speed: speed_in,
                        },
                        Step::Move {
                            reel,
                            target: rest,
                            speed: settle,
                        },
                    ]
                })
                .collect(),
        )
    }
}

/// Overshoot waypoint of the bouncy style: `end * (1 + fraction) - offset`.
///
/// Mixes a relative and an absolute term, so it does not scale with the
/// widget; with the default bounds it lands 200 units past rest.
pub fn bounce_waypoint(style: &StyleConfig, bounds: &ReelBounds) -> f32 {
    bounds.y_end * (1.0 + style.bounce_overshoot_fraction) - style.bounce_overshoot_offset
}

impl OutStyle {
    /// Planner for this style
    pub fn planner(&self) -> &'static dyn MotionPlanner {
        match self {
            OutStyle::All => &AllAtOnce,
            OutStyle::OneByOne => &OneByOneOut,
        }
    }
}

impl InStyle {
    /// Planner for this style
    pub fn planner(&self) -> &'static dyn MotionPlanner {
        match self {
            InStyle::Robust => &RobustIn,
            InStyle::Bouncy => &BouncyIn,
        }
    }
}
