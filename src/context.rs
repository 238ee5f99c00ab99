//! Cross-session game context
//!
//! Created once by the composition root and handed to whoever needs it by
//! reference. Holds the selected mode, the calibration request, best scores,
//! and a copy of the last committed session for the summary screen.

use crate::best_scores::BestScores;
use crate::modes::{self, GameMode, ModeProfile};
use crate::sim::SessionLedger;

/// Result of committing a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub best_score: u64,
    pub new_record: bool,
}

#[derive(Debug, Clone)]
pub struct GameContext {
    selected_mode: GameMode,
    calibration_requested: bool,
    best_scores: BestScores,
    last_session: SessionLedger,
}

impl GameContext {
    /// Mode selected before the player picks one
    pub const DEFAULT_MODE: GameMode = GameMode::Elderly;

    pub fn new() -> Self {
        Self {
            selected_mode: Self::DEFAULT_MODE,
            calibration_requested: false,
            best_scores: BestScores::new(),
            last_session: SessionLedger::default(),
        }
    }

    /// Context seeded with previously saved best scores
    pub fn with_best_scores(best_scores: BestScores) -> Self {
        Self {
            best_scores,
            ..Self::new()
        }
    }

    pub fn select_mode(&mut self, mode: GameMode) {
        self.selected_mode = mode;
    }

    pub fn selected_mode(&self) -> GameMode {
        self.selected_mode
    }

    /// Profile of the selected mode
    pub fn profile(&self) -> &'static ModeProfile {
        modes::get(self.selected_mode)
    }

    pub fn set_calibration_requested(&mut self, requested: bool) {
        self.calibration_requested = requested;
    }

    pub fn calibration_requested(&self) -> bool {
        self.calibration_requested
    }

    pub fn best_score(&self, mode: GameMode) -> u64 {
        self.best_scores.get(mode)
    }

    pub fn best_scores(&self) -> &BestScores {
        &self.best_scores
    }

    pub fn restore_best_scores(&mut self, best_scores: BestScores) {
        self.best_scores = best_scores;
    }

    /// Snapshot of the most recent committed session
    pub fn last_session(&self) -> &SessionLedger {
        &self.last_session
    }

    /// Record a finished session against the selected mode.
    ///
    /// Stores a copy of `session` with `best_score` filled in; the caller's
    /// ledger is never retained.
    pub fn commit_session(&mut self, session: &SessionLedger) -> CommitOutcome {
        let new_record = self.best_scores.record(self.selected_mode, session.score);
        let best_score = self.best_scores.get(self.selected_mode);

        let mut snapshot = *session;
        snapshot.best_score = best_score;
        self.last_session = snapshot;

        CommitOutcome {
            best_score,
            new_record,
        }
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(score: u64) -> SessionLedger {
        SessionLedger {
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let ctx = GameContext::new();
        assert_eq!(ctx.selected_mode(), GameMode::Elderly);
        assert_eq!(ctx.profile().display_name, "Elderly");
        assert!(!ctx.calibration_requested());
        assert_eq!(ctx.best_score(GameMode::Kids), 0);
    }

    #[test]
    fn test_best_score_never_decreases() {
        let mut ctx = GameContext::new();
        ctx.select_mode(GameMode::Kids);

        let first = ctx.commit_session(&ledger(100));
        assert_eq!(first, CommitOutcome { best_score: 100, new_record: true });

        let second = ctx.commit_session(&ledger(80));
        assert_eq!(second, CommitOutcome { best_score: 100, new_record: false });
        assert_eq!(ctx.best_score(GameMode::Kids), 100);
        assert_eq!(ctx.last_session().score, 80);
        assert_eq!(ctx.last_session().best_score, 100);
    }

    #[test]
    fn test_modes_are_tracked_separately() {
        let mut ctx = GameContext::new();
        ctx.commit_session(&ledger(300));
        ctx.select_mode(GameMode::HandFree);
        ctx.commit_session(&ledger(50));
        assert_eq!(ctx.best_score(GameMode::Elderly), 300);
        assert_eq!(ctx.best_score(GameMode::HandFree), 50);
    }

    #[test]
    fn test_committed_snapshot_is_detached() {
        let mut ctx = GameContext::new();
        let mut live = ledger(10);
        ctx.commit_session(&live);
        live.score = 9999;
        live.combo = 5;
        assert_eq!(ctx.last_session().score, 10);
        assert_eq!(ctx.last_session().combo, 0);
    }
}
