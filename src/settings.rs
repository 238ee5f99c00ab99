//! Game tuning
//!
//! Every tunable the simulation reads lives here, grouped by subsystem.
//! Loaded from a JSON file; missing fields take the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Session pacing and scoring gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Session ends once this much play time has elapsed
    pub max_duration_secs: f32,
    /// Run speed before the mode multiplier (units/sec)
    pub base_run_speed: f32,
    /// Intensity gained per lane change (scaled by mode sensitivity)
    pub lane_switch_intensity: f32,
    /// Intensity gained per collected orb
    pub orb_intensity: f32,
    /// Whether the end input (Escape) may end a session early
    pub allow_escape_to_end: bool,
    /// Half-width of the pickup band around the player (x)
    pub pickup_half_width: f32,
    /// Half-depth of the pickup band around the player (z)
    pub pickup_half_depth: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            max_duration_secs: 180.0,
            base_run_speed: 14.0,
            lane_switch_intensity: 0.08,
            orb_intensity: 0.16,
            allow_escape_to_end: true,
            pickup_half_width: 1.0,
            pickup_half_depth: 0.9,
        }
    }
}

/// Lane motion feel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneTuning {
    pub lane_width: f32,
    /// Spring smoothing time at sensitivity 1.0
    pub switch_smooth_time: f32,
    /// Tilt at a full lane of offset (degrees)
    pub tilt_angle_deg: f32,
    /// Exponential tilt smoothing rate
    pub tilt_smoothing: f32,
}

impl Default for LaneTuning {
    fn default() -> Self {
        Self {
            lane_width: 2.8,
            switch_smooth_time: 0.16,
            tilt_angle_deg: 14.0,
            tilt_smoothing: 10.0,
        }
    }
}

/// Orb pool and spawn pacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub pool_size: usize,
    /// Depth at which orbs appear
    pub spawn_ahead: f32,
    /// Orbs further than this behind the player count as missed
    pub despawn_behind: f32,
    pub min_spacing: f32,
    pub max_spacing: f32,
    /// Speed used until the session configures the pool
    pub move_speed: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            pool_size: 30,
            spawn_ahead: 62.0,
            despawn_behind: 10.0,
            min_spacing: 5.0,
            max_spacing: 10.0,
            move_speed: 12.0,
            min_height: 1.05,
            max_height: 1.95,
        }
    }
}

/// Scrolling road ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadTuning {
    pub segment_count: usize,
    pub segment_length: f32,
}

impl Default for RoadTuning {
    fn default() -> Self {
        Self {
            segment_count: 4,
            segment_length: 40.0,
        }
    }
}

/// All game tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionTuning,
    pub lane: LaneTuning,
    pub spawn: SpawnTuning,
    pub road: RoadTuning,
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
