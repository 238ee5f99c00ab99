//! Neon Runner - A lane-based endless runner exercise game
//!
//! Core modules:
//! - `sim`: Session simulation (lane motion, orb spawning, scoring state machine)
//! - `modes`: Static catalog of game-mode tuning profiles
//! - `context`: Cross-session store (selected mode, best scores, last session)
//! - `menu`: Mode selection and session summary screens
//! - `app`: Composition root and scene routing
//! - `settings`: Data-driven tuning loaded from JSON

pub mod app;
pub mod best_scores;
pub mod context;
pub mod error;
pub mod input;
pub mod menu;
pub mod modes;
pub mod settings;
pub mod sim;

pub use app::{App, Scene};
pub use best_scores::BestScores;
pub use context::{CommitOutcome, GameContext};
pub use error::StoreError;
pub use modes::{GameMode, ModeProfile};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Number of lanes the player can occupy
    pub const LANE_COUNT: usize = 3;
    /// Lane the player starts in (center)
    pub const CENTER_LANE: usize = 1;
    /// Lane spacing handed to the orb pool when no lane controller is present
    pub const DEFAULT_LANE_WIDTH: f32 = 2.8;
    /// Steering signal beyond which the side lanes are chosen
    pub const STEER_DEADZONE: f32 = 0.33;
    /// Sensitivity clamp applied to the lane smoothing time
    pub const MIN_LANE_SENSITIVITY: f32 = 0.6;
    pub const MAX_LANE_SENSITIVITY: f32 = 1.4;

    /// Passive score per unit of run speed per second
    pub const DISTANCE_SCORE_FACTOR: f32 = 7.0;
    /// Baseline calories per second regardless of effort
    pub const BASE_CALORIES_PER_SEC: f32 = 0.04;
    /// Calories per second at full intensity (before mode multiplier)
    pub const INTENSITY_CALORIES_PER_SEC: f32 = 0.22;
    /// Calories awarded per collected orb (before mode multiplier)
    pub const ORB_CALORIES: f32 = 0.24;

    /// Lane change score: base + lane index * per-lane bonus
    pub const LANE_CHANGE_SCORE: u64 = 8;
    pub const LANE_CHANGE_SCORE_PER_LANE: u64 = 3;
    /// Orb score: base + combo * per-combo bonus
    pub const ORB_SCORE: u64 = 45;
    pub const ORB_SCORE_PER_COMBO: u64 = 12;
    /// Combo ceiling
    pub const MAX_COMBO: u32 = 999;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Exponential blend factor for smoothing toward a target at rate `k`.
///
/// Frame-rate independent: two steps of `dt` equal one step of `2 * dt`.
#[inline]
pub fn exp_blend(k: f32, dt: f32) -> f32 {
    1.0 - (-k * dt).exp()
}

/// Critically damped spring toward `target` (Game Programming Gems 4, ch. 1.10).
///
/// `velocity` is carried between calls. Returns the new position.
/// A non-positive `dt` leaves both position and velocity untouched.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // No overshoot
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}
