//! Motion Primitive
//!
//! Moves a single scalar (a reel's vertical offset) toward a target at a
//! constant speed, one tick at a time, and snaps exactly once it is within
//! the snap threshold.

use serde::{Deserialize, Serialize};

/// Default distance below which a moving value snaps to its target
pub const DEFAULT_SNAP_THRESHOLD: f32 = 0.1;

/// Move `current` toward `target` by at most `speed * frame_delta`.
///
/// Never passes the target. A non-positive speed or delta leaves the value
/// where it is.
#[inline]
pub fn move_towards(current: f32, target: f32, speed: f32, frame_delta: f32) -> f32 {
    let max_delta = speed * frame_delta;
    if max_delta <= 0.0 {
        return current;
    }

    let distance = target - current;
    if distance.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(distance)
    }
}

/// Result of advancing a motion task by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    /// Still travelling
    Pending,
    /// Reached the target and snapped onto it
    Arrived,
}

impl MotionStatus {
    /// Check if the task finished
    #[inline]
    pub fn is_arrived(&self) -> bool {
        *self == MotionStatus::Arrived
    }
}

/// A single in-flight motion toward a fixed target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionTask {
    /// Destination offset
    pub target: f32,
    /// Speed in position units per second (already scaled)
    pub speed: f32,
}

impl MotionTask {
    /// Create a new task
    pub fn new(target: f32, speed: f32) -> Self {
        Self { target, speed }
    }

    /// Advance `offset` by one tick.
    ///
    /// Once `|offset - target| <= threshold` the offset is set to exactly
    /// `target`, so floating-point creep never survives arrival.
    pub fn step(&self, offset: &mut f32, frame_delta: f32, threshold: f32) -> MotionStatus {
        if (*offset - self.target).abs() <= threshold {
            *offset = self.target;
            return MotionStatus::Arrived;
        }

        *offset = move_towards(*offset, self.target, self.speed, frame_delta);

        if (*offset - self.target).abs() <= threshold {
            *offset = self.target;
            MotionStatus::Arrived
        } else {
            MotionStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_clamps_at_target() {
        assert_eq!(move_towards(0.0, 10.0, 100.0, 1.0), 10.0);
        assert_eq!(move_towards(0.0, -10.0, 100.0, 1.0), -10.0);
        assert_eq!(move_towards(0.0, 10.0, 4.0, 0.5), 2.0);
        assert_eq!(move_towards(10.0, 0.0, 4.0, 0.5), 8.0);
    }

    #[test]
    fn test_non_positive_speed_stalls() {
        assert_eq!(move_towards(5.0, 10.0, 0.0, 1.0), 5.0);
        assert_eq!(move_towards(5.0, 10.0, -3.0, 1.0), 5.0);

        let task = MotionTask::new(100.0, 0.0);
        let mut offset = 0.0;
        for _ in 0..1000 {
            assert_eq!(task.step(&mut offset, 1.0 / 60.0, 0.1), MotionStatus::Pending);
        }
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn test_task_never_overshoots_and_snaps_exactly() {
        let task = MotionTask::new(-1080.0, 6000.0);
        let mut offset = 0.0f32;
        let mut ticks = 0;

        loop {
            let before = offset;
            let status = task.step(&mut offset, 1.0 / 60.0, DEFAULT_SNAP_THRESHOLD);
            ticks += 1;

            // Monotonic toward the target, never past it
            assert!(offset <= before);
            assert!(offset >= -1080.0);

            if status.is_arrived() {
                break;
            }
            assert!(ticks < 1000, "motion did not arrive");
        }

        assert_eq!(offset, -1080.0);
        // 1080 units at 6000 units/s ≈ 0.18s ≈ 11 frames at 60fps
        assert_eq!(ticks, 11);
    }

    #[test]
    fn test_within_threshold_snaps_immediately() {
        let task = MotionTask::new(0.0, 1.0);
        let mut offset = 0.05;
        assert_eq!(task.step(&mut offset, 0.0, 0.1), MotionStatus::Arrived);
        assert_eq!(offset, 0.0);
    }
}
