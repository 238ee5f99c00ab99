//! Pre-session calibration sequence
//!
//! Three timed prompts shown before play begins. Advanced once per tick as a
//! stage index plus time-in-stage, so it can be cancelled at any point.

/// Prompt text and how long it stays up (seconds)
pub const CALIBRATION_STAGES: [(&str, f32); 3] = [
    ("Calibration: hold neutral stance", 1.0),
    ("Calibration: keep shoulders level", 1.0),
    ("Calibration: locked", 0.8),
];

/// Result of advancing the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStep {
    /// Not running, or still within the current stage
    Holding,
    /// Moved on to a new stage with this prompt
    Stage(&'static str),
    /// Last stage elapsed
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibration {
    /// `None` when idle
    stage: Option<usize>,
    time_in_stage: f32,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the first stage, returning its prompt
    pub fn begin(&mut self) -> &'static str {
        self.stage = Some(0);
        self.time_in_stage = 0.0;
        CALIBRATION_STAGES[0].0
    }

    pub fn is_active(&self) -> bool {
        self.stage.is_some()
    }

    pub fn stage_index(&self) -> Option<usize> {
        self.stage
    }

    /// Prompt for the current stage
    pub fn text(&self) -> Option<&'static str> {
        self.stage.map(|i| CALIBRATION_STAGES[i].0)
    }

    /// Stop without finishing
    pub fn cancel(&mut self) {
        self.stage = None;
        self.time_in_stage = 0.0;
    }

    /// Advance by `dt`. At most one stage transition is reported per call.
    pub fn advance(&mut self, dt: f32) -> CalibrationStep {
        let Some(stage) = self.stage else {
            return CalibrationStep::Holding;
        };
        if dt <= 0.0 {
            return CalibrationStep::Holding;
        }

        self.time_in_stage += dt;
        let duration = CALIBRATION_STAGES[stage].1;
        if self.time_in_stage < duration {
            return CalibrationStep::Holding;
        }

        // A stage begins on the tick after the previous one ends
        self.time_in_stage = 0.0;
        let next = stage + 1;
        if next >= CALIBRATION_STAGES.len() {
            self.stage = None;
            CalibrationStep::Finished
        } else {
            self.stage = Some(next);
            CalibrationStep::Stage(CALIBRATION_STAGES[next].0)
        }
    }
}
