//! Lane motion controller
//!
//! Turns discrete lane commands or a continuous steering value into a smoothed
//! lateral position and a visual tilt. Smoothing is spring/exponential based so
//! it behaves the same at any frame rate.

use crate::consts::*;
use crate::settings::LaneTuning;
use crate::{exp_blend, smooth_damp};

/// The player's lateral motion
#[derive(Debug, Clone)]
pub struct LaneController {
    lane: usize,
    /// Current lateral position
    x: f32,
    /// Spring velocity carried between ticks
    x_velocity: f32,
    /// Visual roll (degrees)
    tilt: f32,
    sensitivity: f32,
    input_enabled: bool,
    tuning: LaneTuning,
}

impl LaneController {
    pub fn new(tuning: LaneTuning) -> Self {
        let mut controller = Self {
            lane: CENTER_LANE,
            x: 0.0,
            x_velocity: 0.0,
            tilt: 0.0,
            sensitivity: 1.0,
            input_enabled: true,
            tuning,
        };
        controller.x = controller.target_x();
        controller
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn lane_width(&self) -> f32 {
        self.tuning.lane_width
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Lateral position of the current lane
    pub fn target_x(&self) -> f32 {
        self.lane_x(self.lane)
    }

    pub fn lane_x(&self, lane: usize) -> f32 {
        (lane as f32 - CENTER_LANE as f32) * self.tuning.lane_width
    }

    /// Set responsiveness from the mode profile
    pub fn configure(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity.clamp(MIN_LANE_SENSITIVITY, MAX_LANE_SENSITIVITY);
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    /// Move to `lane` (clamped). Returns the new lane if it changed.
    pub fn set_lane(&mut self, lane: usize) -> Option<usize> {
        let lane = lane.min(LANE_COUNT - 1);
        if lane == self.lane {
            return None;
        }
        self.lane = lane;
        Some(lane)
    }

    /// Map a normalized steering value in [-1, 1] onto a lane
    pub fn steer(&mut self, value: f32) -> Option<usize> {
        if !self.input_enabled {
            return None;
        }
        let lane = if value < -STEER_DEADZONE {
            0
        } else if value > STEER_DEADZONE {
            LANE_COUNT - 1
        } else {
            CENTER_LANE
        };
        self.set_lane(lane)
    }

    /// Step one lane left (negative) or right (positive)
    pub fn shift(&mut self, direction: i32) -> Option<usize> {
        if !self.input_enabled || direction == 0 {
            return None;
        }
        let lane = (self.lane as i32 + direction.signum()).clamp(0, LANE_COUNT as i32 - 1);
        self.set_lane(lane as usize)
    }

    /// Advance position and tilt
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let target_x = self.target_x();
        let smooth_time = self.tuning.switch_smooth_time / self.sensitivity;
        self.x = smooth_damp(self.x, target_x, &mut self.x_velocity, smooth_time, dt);

        if self.tuning.lane_width < 0.01 {
            return;
        }
        let offset = ((target_x - self.x) / self.tuning.lane_width).clamp(-1.0, 1.0);
        let target_tilt = -offset * self.tuning.tilt_angle_deg;
        self.tilt += (target_tilt - self.tilt) * exp_blend(self.tuning.tilt_smoothing, dt);
    }

    /// Snap back to the center lane at rest
    pub fn reset(&mut self) {
        self.lane = CENTER_LANE;
        self.x = self.target_x();
        self.x_velocity = 0.0;
        self.tilt = 0.0;
    }
}

impl Default for LaneController {
    fn default() -> Self {
        Self::new(LaneTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_lane_reports_changes_only() {
        let mut lane = LaneController::default();
        assert_eq!(lane.set_lane(1), None);
        assert_eq!(lane.set_lane(2), Some(2));
        assert_eq!(lane.set_lane(7), None); // clamped to 2, unchanged
        assert_eq!(lane.set_lane(0), Some(0));
        assert!((lane.target_x() + 2.8).abs() < 1e-6);
    }

    #[test]
    fn test_steer_thresholds() {
        let mut lane = LaneController::default();
        assert_eq!(lane.steer(0.2), None);
        assert_eq!(lane.steer(-0.5), Some(0));
        assert_eq!(lane.steer(-0.33), Some(1));
        assert_eq!(lane.steer(0.34), Some(2));
        assert_eq!(lane.steer(1.0), None);
    }

    #[test]
    fn test_shift_clamps_at_edges() {
        let mut lane = LaneController::default();
        assert_eq!(lane.shift(1), Some(2));
        assert_eq!(lane.shift(1), None);
        assert_eq!(lane.shift(-1), Some(1));
        assert_eq!(lane.shift(-1), Some(0));
        assert_eq!(lane.shift(-1), None);
    }

    #[test]
    fn test_disabled_input_is_ignored() {
        let mut lane = LaneController::default();
        lane.set_input_enabled(false);
        assert_eq!(lane.shift(1), None);
        assert_eq!(lane.steer(-1.0), None);
        assert_eq!(lane.lane(), 1);
    }

    #[test]
    fn test_sensitivity_is_clamped() {
        let mut lane = LaneController::default();
        lane.configure(3.0);
        assert_eq!(lane.sensitivity(), MAX_LANE_SENSITIVITY);
        lane.configure(0.1);
        assert_eq!(lane.sensitivity(), MIN_LANE_SENSITIVITY);
    }

    #[test]
    fn test_tick_moves_and_tilts_toward_lane() {
        let mut lane = LaneController::default();
        lane.set_lane(2);
        lane.tick(1.0 / 60.0);
        assert!(lane.x() > 0.0 && lane.x() < 2.8);
        // Moving right rolls the body the opposite way
        assert!(lane.tilt() < 0.0);

        for _ in 0..240 {
            lane.tick(1.0 / 60.0);
        }
        assert!((lane.x() - 2.8).abs() < 1e-3);
        assert!(lane.tilt().abs() < 0.1);
    }

    #[test]
    fn test_smoothing_is_frame_rate_independent() {
        let mut fast = LaneController::default();
        let mut slow = LaneController::default();
        fast.set_lane(0);
        slow.set_lane(0);
        for _ in 0..120 {
            fast.tick(1.0 / 120.0);
        }
        for _ in 0..30 {
            slow.tick(1.0 / 30.0);
        }
        assert!((fast.x() - slow.x()).abs() < 0.05);
    }
}
