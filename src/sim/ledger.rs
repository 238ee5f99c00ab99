//! Session ledger and the scoring rules applied to it
//!
//! The ledger is a plain `Copy` value: every hand-off (HUD frame, commit) is a
//! copy, so a committed snapshot can never alias the live session.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::modes::ModeProfile;
use crate::settings::SessionTuning;
use crate::clamp01;

/// Aggregate of one session's results
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLedger {
    /// Non-decreasing during play
    pub score: u64,
    /// Best score for the mode, filled in on commit
    pub best_score: u64,
    /// Consecutive collects since the last miss
    pub combo: u32,
    pub calories: f32,
    /// Normalized exertion, always in [0, 1]
    pub intensity: f32,
    /// Seconds spent in the Playing phase
    pub elapsed: f32,
    pub orbs_collected: u32,
}

/// Gains and rates for one session, resolved from mode profile + tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    /// Passive points per second
    pub distance_score_per_sec: f32,
    pub intensity_decay_rate: f32,
    pub calorie_multiplier: f32,
    /// Intensity per lane change, already scaled by input sensitivity
    pub lane_switch_intensity: f32,
    pub orb_intensity: f32,
}

impl ScoringRules {
    pub fn new(profile: &ModeProfile, tuning: &SessionTuning) -> Self {
        Self {
            distance_score_per_sec: tuning.base_run_speed
                * profile.run_speed_multiplier
                * DISTANCE_SCORE_FACTOR,
            intensity_decay_rate: profile.intensity_decay_rate,
            calorie_multiplier: profile.calorie_multiplier,
            lane_switch_intensity: tuning.lane_switch_intensity * profile.input_sensitivity,
            orb_intensity: tuning.orb_intensity,
        }
    }
}

/// Fractional passive-score accumulator.
///
/// Each tick credits the rounded amount due; the rounding remainder, kept in
/// [-0.5, 0.5), carries into the next tick so the total does not depend on how
/// time was sliced.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreCarry(f32);

impl ScoreCarry {
    /// Add `amount` points and return the whole points now due
    pub fn credit(&mut self, amount: f32) -> u64 {
        self.0 += amount.max(0.0);
        let whole = self.0.round().max(0.0);
        self.0 -= whole;
        whole as u64
    }

    pub fn clear(&mut self) {
        self.0 = 0.0;
    }
}

impl SessionLedger {
    /// Zero everything (session start)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Continuous per-tick accrual: time, passive score, intensity decay, calories
    pub fn accrue(&mut self, rules: &ScoringRules, carry: &mut ScoreCarry, dt: f32) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.score += carry.credit(rules.distance_score_per_sec * dt);
        self.intensity = clamp01(self.intensity - rules.intensity_decay_rate * dt);

        let passive = BASE_CALORIES_PER_SEC
            + INTENSITY_CALORIES_PER_SEC * self.intensity * rules.calorie_multiplier;
        self.calories += passive * dt;
    }

    /// Player moved to `lane`. Returns the points awarded.
    pub fn lane_changed(&mut self, rules: &ScoringRules, lane: usize) -> u64 {
        self.intensity = clamp01(self.intensity + rules.lane_switch_intensity);
        let points = LANE_CHANGE_SCORE + lane as u64 * LANE_CHANGE_SCORE_PER_LANE;
        self.score += points;
        points
    }

    /// Orb picked up. Returns the points awarded.
    pub fn orb_collected(&mut self, rules: &ScoringRules) -> u64 {
        self.orbs_collected += 1;
        self.combo = (self.combo + 1).min(MAX_COMBO);
        let points = ORB_SCORE + self.combo as u64 * ORB_SCORE_PER_COMBO;
        self.score += points;
        self.calories += ORB_CALORIES * rules.calorie_multiplier;
        self.intensity = clamp01(self.intensity + rules.orb_intensity);
        points
    }

    /// Orb went past the player. Returns the combo that was lost.
    pub fn orb_missed(&mut self) -> u32 {
        std::mem::take(&mut self.combo)
    }

    /// Session completion in [0, 1]
    pub fn progress(&self, max_duration: f32) -> f32 {
        if max_duration <= 0.0 {
            return 1.0;
        }
        clamp01(self.elapsed / max_duration)
    }
}
