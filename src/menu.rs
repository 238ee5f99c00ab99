//! Mode selection, gameplay HUD and session summary screens
//!
//! Screen logic only: what is selected, what text is shown, and which scene
//! each command leads to. Drawing is left to the presentation layer.

use glam::Vec4;

use crate::app::Scene;
use crate::context::GameContext;
use crate::input::{self, Key};
use crate::modes::{self, ModeProfile};
use crate::sim::{HudFrame, SessionLedger};
use crate::{clamp01, exp_blend};

/// Mode card picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSelect {
    selected: usize,
}

impl ModeSelect {
    pub const FOOTER_HINT: &'static str =
        "Press 1-4 or Click to choose. ENTER for calibration. SPACE to play.";

    /// Opens on the context's current mode and selects it
    pub fn new(ctx: &mut GameContext) -> Self {
        let mut menu = Self { selected: 0 };
        menu.select(ctx, modes::index_of(ctx.selected_mode()));
        menu
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn profile(&self) -> &'static ModeProfile {
        modes::by_index(self.selected)
    }

    /// Select a card (clamped to the catalog) and make it the active mode
    pub fn select(&mut self, ctx: &mut GameContext, index: usize) {
        self.selected = index.min(modes::all().len() - 1);
        ctx.select_mode(self.profile().mode);
    }

    /// Cards with their selection state, in display order
    pub fn cards(&self) -> impl Iterator<Item = (&'static ModeProfile, bool)> + '_ {
        modes::all()
            .iter()
            .enumerate()
            .map(move |(i, profile)| (profile, i == self.selected))
    }

    pub fn selected_label(&self) -> String {
        format!("Selected: {} Mode", self.profile().display_name)
    }

    /// Start with calibration
    pub fn confirm(&mut self, ctx: &mut GameContext) -> Scene {
        ctx.select_mode(self.profile().mode);
        ctx.set_calibration_requested(true);
        Scene::Gameplay
    }

    /// Start straight away, skipping calibration
    pub fn play(&mut self, ctx: &mut GameContext) -> Scene {
        ctx.select_mode(self.profile().mode);
        ctx.set_calibration_requested(false);
        Scene::Gameplay
    }

    pub fn handle_key(&mut self, ctx: &mut GameContext, key: Key) -> Option<Scene> {
        if let Some(index) = input::mode_hotkey(key) {
            if index < modes::all().len() {
                self.select(ctx, index);
            }
            return None;
        }
        match key {
            Key::Left | Key::A => {
                self.select(ctx, self.selected.saturating_sub(1));
                None
            }
            Key::Right | Key::D => {
                self.select(ctx, self.selected + 1);
                None
            }
            Key::Enter => Some(self.confirm(ctx)),
            Key::Space => Some(self.play(ctx)),
            _ => None,
        }
    }
}

/// In-game read-out. Meters and calories ease toward the live values.
#[derive(Debug, Clone, PartialEq)]
pub struct GameHud {
    profile: &'static ModeProfile,
    ledger: SessionLedger,
    intensity: f32,
    progress: f32,
    calories: f32,
    visible: bool,
}

impl GameHud {
    pub const INSTRUCTION: &'static str = "Keep shoulders, wrists, and hips visible.";
    /// Easing rate for the meters (per second)
    pub const SMOOTHING: f32 = 8.0;

    pub fn new(profile: &'static ModeProfile) -> Self {
        Self {
            profile,
            ledger: SessionLedger::default(),
            intensity: 0.0,
            progress: 0.0,
            calories: 0.0,
            visible: false,
        }
    }

    /// Take the latest session snapshot
    pub fn update(&mut self, frame: &HudFrame, dt: f32) {
        if frame.mode != self.profile.mode {
            *self = Self::new(modes::get(frame.mode));
        }
        let blend = exp_blend(Self::SMOOTHING, dt.max(0.0));
        self.intensity += (frame.ledger.intensity - self.intensity) * blend;
        self.progress += (frame.progress - self.progress) * blend;
        self.calories += (frame.ledger.calories - self.calories) * blend;
        self.ledger = frame.ledger;
        self.visible = frame.hud_visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn theme_color(&self) -> Vec4 {
        self.profile.theme_color
    }

    pub fn mode_label(&self) -> String {
        format!("{} Mode", self.profile.display_name)
    }

    pub fn combo_text(&self) -> String {
        format!("Combo: {}", self.ledger.combo)
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.ledger.score)
    }

    pub fn timer_text(&self) -> String {
        format_time(self.ledger.elapsed)
    }

    pub fn calories_text(&self) -> String {
        format!("Calories Burned: {:.0} kcal", self.calories)
    }

    pub fn intensity_fill(&self) -> f32 {
        clamp01(self.intensity)
    }

    pub fn progress_fill(&self) -> f32 {
        clamp01(self.progress)
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            self.mode_label(),
            self.score_text(),
            self.combo_text(),
            self.calories_text(),
            self.timer_text(),
            Self::INSTRUCTION.to_string(),
        ]
    }
}

/// Read-out of the last committed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    ledger: SessionLedger,
    profile: &'static ModeProfile,
}

impl SessionSummary {
    pub fn from_context(ctx: &GameContext) -> Self {
        Self {
            ledger: *ctx.last_session(),
            profile: ctx.profile(),
        }
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn profile(&self) -> &'static ModeProfile {
        self.profile
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.ledger.score)
    }

    pub fn best_score_text(&self) -> String {
        format!("Best Score: {}", self.ledger.best_score)
    }

    pub fn calories_text(&self) -> String {
        format!("Calories Burned: {:.0} kcal", self.ledger.calories)
    }

    pub fn time_text(&self) -> String {
        format!("Session Time: {}", format_time(self.ledger.elapsed))
    }

    pub fn mode_text(&self) -> String {
        format!("{} Mode", self.profile.display_name)
    }

    /// Intensity meter fill in [0, 1]
    pub fn intensity_fill(&self) -> f32 {
        clamp01(self.ledger.intensity)
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            self.mode_text(),
            self.score_text(),
            self.best_score_text(),
            self.calories_text(),
            self.time_text(),
        ]
    }

    /// Play the same mode again, without calibration
    pub fn replay(&self, ctx: &mut GameContext) -> Scene {
        ctx.set_calibration_requested(false);
        Scene::Gameplay
    }

    pub fn change_mode(&self) -> Scene {
        Scene::ModeSelection
    }

    pub fn handle_key(&self, ctx: &mut GameContext, key: Key) -> Option<Scene> {
        match key {
            Key::Enter | Key::Space => Some(self.replay(ctx)),
            Key::Escape => Some(self.change_mode()),
            _ => None,
        }
    }
}

/// `mm:ss`, whole seconds, never negative
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
