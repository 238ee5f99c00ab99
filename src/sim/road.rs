//! Endless road ring
//!
//! A handful of segments scroll toward the player; any segment fully behind the
//! player is moved to the far end, giving an unbroken road.

use crate::settings::RoadTuning;

#[derive(Debug, Clone)]
pub struct RoadScroller {
    /// Segment start depths
    segments: Vec<f32>,
    segment_length: f32,
    move_speed: f32,
    running: bool,
    /// Total distance scrolled while running
    distance: f32,
}

impl RoadScroller {
    pub fn new(tuning: RoadTuning) -> Self {
        let segment_length = tuning.segment_length.max(1.0);
        Self {
            segments: (0..tuning.segment_count)
                .map(|i| i as f32 * segment_length)
                .collect(),
            segment_length,
            move_speed: 12.0,
            running: false,
            distance: 0.0,
        }
    }

    pub fn configure(&mut self, speed: f32) {
        self.move_speed = speed.max(0.0);
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn segments(&self) -> &[f32] {
        &self.segments
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.running || self.segments.is_empty() {
            return;
        }
        let travel = self.move_speed * dt;
        if travel <= 0.0 {
            return;
        }
        self.distance += travel;

        let mut furthest = f32::MIN;
        for z in &mut self.segments {
            *z -= travel;
            furthest = furthest.max(*z);
        }

        for z in &mut self.segments {
            if *z < -self.segment_length {
                *z = furthest + self.segment_length;
                furthest = *z;
            }
        }
    }
}

impl Default for RoadScroller {
    fn default() -> Self {
        Self::new(RoadTuning::default())
    }
}
