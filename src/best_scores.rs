//! Best score per game mode
//!
//! The only state that outlives the process. Persisted as a small JSON map.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::modes::GameMode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScores {
    scores: BTreeMap<GameMode, u64>,
}

impl BestScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for `mode` (0 if never played)
    pub fn get(&self, mode: GameMode) -> u64 {
        self.scores.get(&mode).copied().unwrap_or(0)
    }

    /// Keep `score` if it beats the stored best. Returns true on a new record.
    pub fn record(&mut self, mode: GameMode, score: u64) -> bool {
        let best = self.scores.entry(mode).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameMode, u64)> + '_ {
        self.scores.iter().map(|(mode, score)| (*mode, *score))
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)?;
        let scores: Self = serde_json::from_str(&json)?;
        log::info!("Loaded best scores for {} modes", scores.scores.len());
        Ok(scores)
    }

    /// Load, starting fresh on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(scores) => scores,
            Err(err) => {
                log::info!("No best scores loaded ({}), starting fresh", err);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        log::info!("Best scores saved ({} modes)", self.scores.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_maximum() {
        let mut scores = BestScores::new();
        assert_eq!(scores.get(GameMode::Kids), 0);
        assert!(scores.record(GameMode::Kids, 100));
        assert!(!scores.record(GameMode::Kids, 80));
        assert_eq!(scores.get(GameMode::Kids), 100);
        assert_eq!(scores.get(GameMode::Elderly), 0);
    }

    #[test]
    fn test_json_shape() {
        let mut scores = BestScores::new();
        scores.record(GameMode::HandFree, 420);
        scores.record(GameMode::Kids, 7);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"Kids":7,"HandFree":420}"#);
        let back: BestScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("neon_runner_best_{}.json", std::process::id()));
        let mut scores = BestScores::new();
        scores.record(GameMode::LegFree, 1234);
        scores.save(&path).unwrap();
        assert_eq!(BestScores::load(&path).unwrap(), scores);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let path = std::env::temp_dir().join(format!("neon_runner_corrupt_{}.json", std::process::id()));
        fs::write(&path, "not json").unwrap();
        assert!(matches!(BestScores::load(&path), Err(StoreError::Json(_))));
        assert!(BestScores::load_or_default(&path).is_empty());
        let _ = fs::remove_file(&path);
    }
}
