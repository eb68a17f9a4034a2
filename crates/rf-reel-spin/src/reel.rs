//! Reels and the layout collaborator

use serde::{Deserialize, Serialize};

use crate::motion::{MotionStatus, MotionTask};

/// One vertical column of symbols
///
/// The offset is only changed by the orchestrator (snaps) or by the reel's own
/// in-flight [`MotionTask`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    index: usize,
    offset: f32,
    motion: Option<MotionTask>,
}

impl Reel {
    /// Create a reel resting at `offset`
    pub fn new(index: usize, offset: f32) -> Self {
        Self {
            index,
            offset,
            motion: None,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current vertical offset
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// In-flight motion, if any
    #[inline]
    pub fn motion(&self) -> Option<&MotionTask> {
        self.motion.as_ref()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Start a motion, replacing any previous one
    pub fn launch(&mut self, task: MotionTask) {
        self.motion = Some(task);
    }

    /// Advance the in-flight motion by one tick.
    ///
    /// A reel without a motion reports `Arrived`.
    pub fn step(&mut self, frame_delta: f32, threshold: f32) -> MotionStatus {
        let Some(task) = self.motion else {
            return MotionStatus::Arrived;
        };

        let status = task.step(&mut self.offset, frame_delta, threshold);
        if status.is_arrived() {
            self.motion = None;
        }
        status
    }

    /// Force the offset, dropping any in-flight motion
    pub fn snap_to(&mut self, offset: f32) {
        self.motion = None;
        self.offset = offset;
    }
}

/// External layout collaborator that owns the visual reel objects
///
/// The orchestrator asks it to reconcile its reel objects to a count and then
/// re-synchronizes its own reel array to whatever the layout reports.
pub trait ReelLayout {
    /// Add or remove visual reels to match `count`
    fn set_reel_count(&mut self, count: usize);

    /// Number of visual reels currently present
    fn reel_count(&self) -> usize;
}

/// Layout with no visual side; reports exactly what it was asked for
#[derive(Debug, Clone, Default)]
pub struct HeadlessLayout {
    count: usize,
}

impl HeadlessLayout {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl ReelLayout for HeadlessLayout {
    fn set_reel_count(&mut self, count: usize) {
        self.count = count;
    }

    fn reel_count(&self) -> usize {
        self.count
    }
}

/// Grow or shrink `reels` to `count`, new reels resting at `rest_offset`
pub(crate) fn resize_reels(reels: &mut Vec<Reel>, count: usize, rest_offset: f32) {
    reels.truncate(count);
    let start = reels.len();
    reels.extend((start..count).map(|index| Reel::new(index, rest_offset)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_without_motion_is_arrived() {
        let mut reel = Reel::new(0, 10.0);
        assert_eq!(reel.step(0.1, 0.1), MotionStatus::Arrived);
        assert_eq!(reel.offset(), 10.0);
    }

    #[test]
    fn test_motion_cleared_on_arrival() {
        let mut reel = Reel::new(1, 0.0);
        reel.launch(MotionTask::new(100.0, 600.0));
        assert!(reel.is_moving());

        let mut ticks = 0;
        while reel.step(1.0 / 60.0, 0.1) == MotionStatus::Pending {
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(!reel.is_moving());
        assert_eq!(reel.offset(), 100.0);
    }

    #[test]
    fn test_snap_cancels_motion() {
        let mut reel = Reel::new(0, 0.0);
        reel.launch(MotionTask::new(100.0, 1.0));
        reel.snap_to(-5.0);
        assert!(!reel.is_moving());
        assert_eq!(reel.offset(), -5.0);
    }

    #[test]
    fn test_resize_reels_keeps_existing() {
        let mut reels = vec![Reel::new(0, 7.0)];
        resize_reels(&mut reels, 3, 0.0);
        assert_eq!(reels.len(), 3);
        assert_eq!(reels[0].offset(), 7.0);
        assert_eq!(reels[2].index(), 2);

        resize_reels(&mut reels, 0, 0.0);
        assert!(reels.is_empty());
    }
}
