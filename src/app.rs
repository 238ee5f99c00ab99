//! Application composition root
//!
//! Owns the game context and the active screen, and acts as the scene router:
//! screens and sessions request a [`Scene`], the app builds it.

use std::path::PathBuf;

use crate::context::GameContext;
use crate::input::{self, Key};
use crate::menu::{ModeSelect, SessionSummary};
use crate::settings::Settings;
use crate::sim::{HudFrame, Session};

/// Navigation destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    ModeSelection,
    Gameplay,
    SessionSummary,
}

/// The screen currently shown
#[derive(Debug)]
pub enum Screen {
    /// Menu plus the session it will start
    ModeSelection(ModeSelect, Box<Session>),
    Gameplay(Box<Session>),
    Summary(SessionSummary),
}

impl Screen {
    pub fn scene(&self) -> Scene {
        match self {
            Screen::ModeSelection(..) => Scene::ModeSelection,
            Screen::Gameplay(_) => Scene::Gameplay,
            Screen::Summary(_) => Scene::SessionSummary,
        }
    }
}

/// Input gathered for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Keys pressed since the last frame
    pub keys: Vec<Key>,
    /// Gesture steering in [-1, 1], if a tracker is connected
    pub steer: Option<f32>,
}

#[derive(Debug)]
pub struct App {
    ctx: GameContext,
    settings: Settings,
    seed: u64,
    sessions_created: u64,
    scores_path: Option<PathBuf>,
    screen: Screen,
}

impl App {
    /// App on the mode selection screen
    pub fn new(settings: Settings, ctx: GameContext, seed: u64) -> Self {
        let mut ctx = ctx;
        let menu = ModeSelect::new(&mut ctx);
        let summary = SessionSummary::from_context(&ctx);
        let mut app = Self {
            ctx,
            settings,
            seed,
            sessions_created: 0,
            scores_path: None,
            screen: Screen::Summary(summary),
        };
        let session = app.create_session();
        app.screen = Screen::ModeSelection(menu, session);
        app
    }

    /// Save best scores to `path` after every session
    pub fn with_scores_path(mut self, path: PathBuf) -> Self {
        self.scores_path = Some(path);
        self
    }

    pub fn ctx(&self) -> &GameContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn scene(&self) -> Scene {
        self.screen.scene()
    }

    /// The running session (gameplay screen only)
    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Gameplay(session) => Some(&**session),
            _ => None,
        }
    }

    /// The running or about-to-start session, for subscribing to its events
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.screen {
            Screen::Gameplay(session) | Screen::ModeSelection(_, session) => Some(&mut **session),
            Screen::Summary(_) => None,
        }
    }

    pub fn hud_frame(&self) -> Option<HudFrame> {
        self.session().map(Session::hud_frame)
    }

    /// Advance the current screen by one frame
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        let route = match &mut self.screen {
            Screen::ModeSelection(menu, _) => input
                .keys
                .iter()
                .find_map(|&key| menu.handle_key(&mut self.ctx, key)),
            Screen::Gameplay(session) => {
                let tick = input::gameplay_input(&input.keys, input.steer);
                session.tick(&mut self.ctx, &tick, dt);
                session.take_route()
            }
            Screen::Summary(summary) => input
                .keys
                .iter()
                .find_map(|&key| summary.handle_key(&mut self.ctx, key)),
        };

        if let Some(scene) = route {
            self.navigate(scene);
        }
    }

    /// Switch screens
    pub fn navigate(&mut self, scene: Scene) {
        log::info!("Navigate {:?} -> {:?}", self.scene(), scene);
        let placeholder = Screen::Summary(SessionSummary::from_context(&self.ctx));
        let previous = std::mem::replace(&mut self.screen, placeholder);

        self.screen = match scene {
            Scene::ModeSelection => {
                let menu = ModeSelect::new(&mut self.ctx);
                Screen::ModeSelection(menu, self.create_session())
            }
            Scene::Gameplay => {
                let mut session = match previous {
                    Screen::ModeSelection(_, session) => session,
                    Screen::Gameplay(mut session) => {
                        session.shutdown();
                        self.create_session()
                    }
                    Screen::Summary(_) => self.create_session(),
                };
                session.start(&self.ctx);
                Screen::Gameplay(session)
            }
            Scene::SessionSummary => {
                if let Screen::Gameplay(mut session) = previous {
                    session.shutdown();
                }
                self.save_scores();
                Screen::Summary(SessionSummary::from_context(&self.ctx))
            }
        };
    }

    fn create_session(&mut self) -> Box<Session> {
        // Distinct, reproducible orb layout per session
        let seed = self
            .seed
            .wrapping_add(self.sessions_created.wrapping_mul(2654435761));
        self.sessions_created += 1;
        let mut session = Box::new(Session::new(&self.settings, seed));
        session.open_mode_selection();
        session
    }

    fn save_scores(&self) {
        let Some(path) = &self.scores_path else {
            return;
        };
        if let Err(err) = self.ctx.best_scores().save(path) {
            log::warn!("Could not save best scores to {}: {}", path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::GameMode;
    use crate::sim::SessionPhase;

    fn keys(keys: &[Key]) -> FrameInput {
        FrameInput {
            keys: keys.to_vec(),
            steer: None,
        }
    }

    fn short_settings() -> Settings {
        let mut settings = Settings::default();
        settings.session.max_duration_secs = 2.0;
        settings
    }

    #[test]
    fn test_starts_on_mode_selection() {
        let mut app = App::new(Settings::default(), GameContext::new(), 1);
        assert_eq!(app.scene(), Scene::ModeSelection);
        assert_eq!(app.session_mut().unwrap().phase(), SessionPhase::ModeSelection);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_full_loop_through_summary() {
        let mut app = App::new(short_settings(), GameContext::new(), 7);
        app.update(&keys(&[Key::Digit(3), Key::Enter]), 0.0);
        assert_eq!(app.scene(), Scene::Gameplay);
        assert_eq!(app.ctx().selected_mode(), GameMode::LegFree);
        assert_eq!(app.session().unwrap().phase(), SessionPhase::Calibrating);

        for _ in 0..(60 * 6) {
            app.update(&FrameInput::default(), 1.0 / 60.0);
            if app.scene() != Scene::Gameplay {
                break;
            }
        }
        assert_eq!(app.scene(), Scene::SessionSummary);
        assert!(!app.ctx().calibration_requested());
        let best = app.ctx().best_score(GameMode::LegFree);
        assert!(best > 0);
        assert_eq!(app.ctx().last_session().best_score, best);

        // Replay skips calibration
        app.update(&keys(&[Key::Enter]), 0.0);
        assert_eq!(app.scene(), Scene::Gameplay);
        assert_eq!(app.session().unwrap().phase(), SessionPhase::Playing);

        app.update(&keys(&[Key::Escape]), 1.0 / 60.0);
        assert_eq!(app.scene(), Scene::SessionSummary);
        assert_eq!(app.ctx().best_score(GameMode::LegFree), best);

        app.update(&keys(&[Key::Escape]), 0.0);
        assert_eq!(app.scene(), Scene::ModeSelection);
    }

    #[test]
    fn test_sessions_get_distinct_seeds() {
        let mut app = App::new(Settings::default(), GameContext::new(), 99);
        app.update(&keys(&[Key::Space]), 0.0);
        app.update(&FrameInput::default(), 1.0 / 60.0);
        let first: Vec<_> = app.session().unwrap().orbs().unwrap().active().map(|(_, o)| o.pos).collect();

        app.navigate(Scene::Gameplay);
        app.update(&FrameInput::default(), 1.0 / 60.0);
        let second: Vec<_> = app.session().unwrap().orbs().unwrap().active().map(|(_, o)| o.pos).collect();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_ne!(first, second);
    }
}
