//! Session orchestrator
//!
//! Owns the ledger and the gameplay systems, drives the per-tick update and
//! turns lane/orb events into score, combo, intensity and calories.
//!
//! Phase flow: `Boot -> ModeSelection -> Calibrating -> Playing <-> Paused -> SessionEnded`.
//! Out-of-order requests (resume while playing, end twice) are no-ops.

use super::calibration::{Calibration, CalibrationStep};
use super::events::{EventChannel, ListenerId, SessionEvent};
use super::lane::LaneController;
use super::ledger::{ScoreCarry, ScoringRules, SessionLedger};
use super::orbs::{OrbEvent, OrbId, OrbPool, PickupProbe};
use super::road::RoadScroller;
use crate::app::Scene;
use crate::consts::DEFAULT_LANE_WIDTH;
use crate::context::GameContext;
use crate::modes::{self, GameMode, ModeProfile};
use crate::settings::{SessionTuning, Settings};

/// Lifecycle of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Created, not started
    Boot,
    /// Player is choosing a mode
    ModeSelection,
    /// Timed calibration prompts, gameplay disabled
    Calibrating,
    /// Active gameplay
    Playing,
    /// Gameplay suspended
    Paused,
    /// Ledger committed; terminal
    SessionEnded,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Discrete lane step (-1 left, +1 right)
    pub lane_shift: Option<i32>,
    /// Normalized steering in [-1, 1] from a gesture source
    pub steer: Option<f32>,
    /// Pause toggle
    pub pause: bool,
    /// Explicit end request (Escape / cancel)
    pub end: bool,
}

/// Read-only snapshot for the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudFrame {
    pub mode: GameMode,
    pub phase: SessionPhase,
    pub ledger: SessionLedger,
    pub progress: f32,
    pub lane: usize,
    pub player_x: f32,
    pub tilt: f32,
    pub hud_visible: bool,
}

#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    ledger: SessionLedger,
    carry: ScoreCarry,
    profile: ModeProfile,
    rules: ScoringRules,
    tuning: SessionTuning,
    lane: Option<LaneController>,
    orbs: Option<OrbPool>,
    road: Option<RoadScroller>,
    calibration: Calibration,
    /// Torn down by the router; nothing ticks, scores or commits after this
    shut_down: bool,
    progress: f32,
    hud_visible: bool,
    /// Scene requested at the last transition, until taken by the router
    route: Option<Scene>,
    events: EventChannel<SessionEvent>,
    /// Scratch buffer reused every tick
    orb_events: Vec<OrbEvent>,
}

impl Session {
    /// Session with every gameplay system present
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self::from_parts(
            settings.session,
            Some(LaneController::new(settings.lane)),
            Some(OrbPool::new(settings.spawn, seed)),
            Some(RoadScroller::new(settings.road)),
        )
    }

    /// Session from explicit parts. Absent systems are skipped every tick.
    pub fn from_parts(
        tuning: SessionTuning,
        lane: Option<LaneController>,
        orbs: Option<OrbPool>,
        road: Option<RoadScroller>,
    ) -> Self {
        let profile = *modes::by_index(0);
        Self {
            phase: SessionPhase::Boot,
            ledger: SessionLedger::default(),
            carry: ScoreCarry::default(),
            rules: ScoringRules::new(&profile, &tuning),
            profile,
            tuning,
            lane,
            orbs,
            road,
            calibration: Calibration::new(),
            shut_down: false,
            progress: 0.0,
            hud_visible: false,
            route: None,
            events: EventChannel::new(),
            orb_events: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn profile(&self) -> &ModeProfile {
        &self.profile
    }

    pub fn tuning(&self) -> &SessionTuning {
        &self.tuning
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn lane(&self) -> Option<&LaneController> {
        self.lane.as_ref()
    }

    pub fn orbs(&self) -> Option<&OrbPool> {
        self.orbs.as_ref()
    }

    pub fn road(&self) -> Option<&RoadScroller> {
        self.road.as_ref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn calibration_text(&self) -> Option<&'static str> {
        self.calibration.text()
    }

    pub fn hud_frame(&self) -> HudFrame {
        HudFrame {
            mode: self.profile.mode,
            phase: self.phase,
            ledger: self.ledger,
            progress: self.progress,
            lane: self.lane.as_ref().map_or(crate::consts::CENTER_LANE, |l| l.lane()),
            player_x: self.lane.as_ref().map_or(0.0, |l| l.x()),
            tilt: self.lane.as_ref().map_or(0.0, |l| l.tilt()),
            hud_visible: self.hud_visible,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Scene the session wants shown next, if any
    pub fn take_route(&mut self) -> Option<Scene> {
        self.route.take()
    }

    pub fn open_mode_selection(&mut self) {
        if self.phase == SessionPhase::Boot {
            self.set_phase(SessionPhase::ModeSelection);
        }
    }

    /// Configure systems for the selected mode and begin (via calibration if requested)
    pub fn start(&mut self, ctx: &GameContext) {
        if self.shut_down {
            log::warn!("Session start ignored after shutdown");
            return;
        }
        if !matches!(self.phase, SessionPhase::Boot | SessionPhase::ModeSelection) {
            log::warn!("Session start ignored in {:?}", self.phase);
            return;
        }

        self.profile = *ctx.profile();
        self.rules = ScoringRules::new(&self.profile, &self.tuning);
        let run_speed = self.tuning.base_run_speed * self.profile.run_speed_multiplier;

        if let Some(lane) = &mut self.lane {
            lane.configure(self.profile.input_sensitivity);
            lane.reset();
        }
        let lane_width = self
            .lane
            .as_ref()
            .map_or(DEFAULT_LANE_WIDTH, |l| l.lane_width());
        if let Some(orbs) = &mut self.orbs {
            orbs.configure(run_speed, lane_width);
            orbs.reset();
        }
        if let Some(road) = &mut self.road {
            road.configure(run_speed);
        }

        self.ledger.reset();
        self.carry.clear();
        self.progress = 0.0;
        log::info!(
            "Session start: mode={} run_speed={:.2} calibrate={}",
            self.profile.display_name,
            run_speed,
            ctx.calibration_requested()
        );

        if ctx.calibration_requested() {
            self.set_phase(SessionPhase::Calibrating);
            self.set_systems_enabled(false);
            let text = self.calibration.begin();
            self.events.emit(&SessionEvent::CalibrationText(text));
        } else {
            self.begin_gameplay();
        }
    }

    pub fn pause(&mut self) {
        if self.shut_down || self.phase != SessionPhase::Playing {
            return;
        }
        self.set_phase(SessionPhase::Paused);
        self.set_systems_enabled(false);
    }

    pub fn resume(&mut self) {
        if self.shut_down || self.phase != SessionPhase::Paused {
            return;
        }
        self.begin_gameplay();
    }

    /// Stop gameplay, commit the ledger and request the summary. Idempotent.
    pub fn end_session(&mut self, ctx: &mut GameContext) {
        if self.shut_down {
            return;
        }
        match self.phase {
            SessionPhase::SessionEnded => return,
            SessionPhase::Boot | SessionPhase::ModeSelection => {
                log::warn!("Session end ignored in {:?}: nothing to commit", self.phase);
                return;
            }
            _ => {}
        }

        self.calibration.cancel();
        self.set_phase(SessionPhase::SessionEnded);
        self.set_systems_enabled(false);

        let outcome = ctx.commit_session(&self.ledger);
        log::info!(
            "Session ended: score={} best={} orbs={} kcal={:.1}{}",
            self.ledger.score,
            outcome.best_score,
            self.ledger.orbs_collected,
            self.ledger.calories,
            if outcome.new_record { " (new best)" } else { "" }
        );
        self.events
            .emit(&SessionEvent::SessionCommitted(*ctx.last_session()));
        self.navigate(Scene::SessionSummary);
    }

    /// Tear down without committing. Cancels a running calibration; every later
    /// request (tick, pause, resume, end, collect) is ignored.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.calibration.cancel();
        self.set_systems_enabled(false);
        log::info!("Session shut down in {:?}", self.phase);
    }

    /// Orb collected by an external collision check
    pub fn orb_collected(&mut self, id: OrbId) {
        if self.shut_down {
            return;
        }
        let removed = self
            .orbs
            .as_mut()
            .is_some_and(|orbs| orbs.notify_collected(id));
        if removed {
            self.on_orb_collected(Some(id));
        }
    }

    /// Advance the session by `dt` seconds
    pub fn tick(&mut self, ctx: &mut GameContext, input: &TickInput, dt: f32) {
        let dt = dt.max(0.0);
        if self.shut_down {
            return;
        }

        match self.phase {
            SessionPhase::Boot | SessionPhase::ModeSelection | SessionPhase::SessionEnded => {
                return;
            }
            _ => {}
        }

        if input.pause {
            match self.phase {
                SessionPhase::Playing => self.pause(),
                SessionPhase::Paused => self.resume(),
                _ => {}
            }
        }

        match self.phase {
            SessionPhase::Calibrating => {
                self.tick_lane(None, dt);
                self.advance_calibration(ctx, dt);
            }
            SessionPhase::Playing => {
                self.tick_lane(Some(input), dt);
                self.tick_playing(ctx, dt);
                if input.end && self.tuning.allow_escape_to_end {
                    self.end_session(ctx);
                }
            }
            SessionPhase::Paused => self.tick_lane(None, dt),
            _ => {}
        }
    }

    fn tick_lane(&mut self, input: Option<&TickInput>, dt: f32) {
        let Some(lane) = &mut self.lane else {
            return;
        };

        let mut changes = [None, None];
        if let Some(input) = input {
            if let Some(direction) = input.lane_shift {
                changes[0] = lane.shift(direction);
            }
            if let Some(value) = input.steer {
                changes[1] = lane.steer(value);
            }
        }
        lane.tick(dt);

        for lane_index in changes.into_iter().flatten() {
            self.on_lane_changed(lane_index);
        }
    }

    fn tick_playing(&mut self, ctx: &mut GameContext, dt: f32) {
        if let Some(road) = &mut self.road {
            road.tick(dt);
        }

        let mut orb_events = std::mem::take(&mut self.orb_events);
        orb_events.clear();
        if let Some(orbs) = &mut self.orbs {
            orbs.tick(dt, &mut orb_events);
        }
        for event in &orb_events {
            match *event {
                OrbEvent::Spawned { id, lane } => {
                    self.events.emit(&SessionEvent::OrbSpawned { id, lane });
                }
                OrbEvent::Missed { id } => self.on_orb_missed(id),
            }
        }
        self.orb_events = orb_events;

        self.check_pickups();

        self.ledger.accrue(&self.rules, &mut self.carry, dt);
        self.progress = self.ledger.progress(self.tuning.max_duration_secs);

        if self.ledger.elapsed >= self.tuning.max_duration_secs {
            self.end_session(ctx);
        }
    }

    fn check_pickups(&mut self) {
        let (Some(lane), Some(orbs)) = (&self.lane, &mut self.orbs) else {
            return;
        };
        let probe = PickupProbe {
            x: lane.x(),
            half_width: self.tuning.pickup_half_width,
            half_depth: self.tuning.pickup_half_depth,
        };

        let collected: Vec<OrbId> = orbs
            .pickups(&probe)
            .into_iter()
            .filter(|&id| orbs.notify_collected(id))
            .collect();
        for id in collected {
            self.on_orb_collected(Some(id));
        }
    }

    fn advance_calibration(&mut self, ctx: &mut GameContext, dt: f32) {
        match self.calibration.advance(dt) {
            CalibrationStep::Holding => {}
            CalibrationStep::Stage(text) => {
                self.events.emit(&SessionEvent::CalibrationText(text));
            }
            CalibrationStep::Finished => {
                ctx.set_calibration_requested(false);
                self.events.emit(&SessionEvent::CalibrationText(""));
                self.begin_gameplay();
            }
        }
    }

    fn begin_gameplay(&mut self) {
        self.set_phase(SessionPhase::Playing);
        self.set_systems_enabled(true);
        self.hud_visible = true;
        self.events.emit(&SessionEvent::HudVisible(true));
    }

    fn set_systems_enabled(&mut self, enabled: bool) {
        if let Some(lane) = &mut self.lane {
            lane.set_input_enabled(enabled);
        }
        if let Some(road) = &mut self.road {
            road.set_running(enabled);
        }
        if let Some(orbs) = &mut self.orbs {
            orbs.set_running(enabled);
        }
    }

    fn on_lane_changed(&mut self, lane: usize) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let points = self.ledger.lane_changed(&self.rules, lane);
        log::debug!("Lane {} (+{})", lane, points);
        self.events.emit(&SessionEvent::LaneChanged { lane, points });
    }

    fn on_orb_collected(&mut self, id: Option<OrbId>) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let points = self.ledger.orb_collected(&self.rules);
        let combo = self.ledger.combo;
        log::debug!("Orb collected: combo {} (+{})", combo, points);
        self.events
            .emit(&SessionEvent::OrbCollected { id, combo, points });
    }

    fn on_orb_missed(&mut self, id: OrbId) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let lost_combo = self.ledger.orb_missed();
        if lost_combo > 0 {
            log::debug!("Orb missed, combo {} lost", lost_combo);
        }
        self.events.emit(&SessionEvent::OrbMissed { id, lost_combo });
    }

    fn navigate(&mut self, scene: Scene) {
        self.route = Some(scene);
        self.events.emit(&SessionEvent::Navigate(scene));
    }

    fn set_phase(&mut self, to: SessionPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("Session phase {:?} -> {:?}", from, to);
        self.events.emit(&SessionEvent::PhaseChanged { from, to });
    }
}
