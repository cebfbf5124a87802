//! Per-mode high scores and the coin purse
//!
//! Finished runs collect in a [`SessionLedger`] while a mode is being played
//! and are folded into the persisted [`Records`] once, when the session ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mode::GameMode;

/// Persisted player records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    /// Best score per mode, keyed by [`GameMode::as_str`]
    #[serde(default)]
    pub best: BTreeMap<String, u64>,
    /// Coins collected across all sessions
    #[serde(default)]
    pub coins: u64,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for a mode (0 if never played)
    pub fn best_for(&self, mode: GameMode) -> u64 {
        self.best.get(mode.as_str()).copied().unwrap_or(0)
    }

    /// Check if a score would beat the stored best for a mode
    pub fn qualifies(&self, mode: GameMode, score: u64) -> bool {
        score > 0 && score > self.best_for(mode)
    }

    /// Keep the higher of the stored best and `score`.
    /// Returns true if `score` set a new best.
    pub fn record_score(&mut self, mode: GameMode, score: u64) -> bool {
        if !self.qualifies(mode, score) {
            return false;
        }
        self.best.insert(mode.as_str().to_string(), score);
        true
    }

    pub fn add_coins(&mut self, coins: u64) {
        self.coins = self.coins.saturating_add(coins);
    }
}

/// A finished (or abandoned) run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub score: u64,
    pub coins: u32,
}

/// Runs of one mode session, not yet written to storage
#[derive(Debug, Clone, Default)]
pub struct SessionLedger {
    runs: Vec<RunResult>,
}

/// What a ledger flush changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushSummary {
    pub best_score: u64,
    pub coins_added: u64,
    pub new_high_score: bool,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&mut self, score: u64, coins: u32) {
        log::debug!("Run recorded: score {}, coins {}", score, coins);
        self.runs.push(RunResult { score, coins });
    }

    pub fn runs(&self) -> &[RunResult] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Best score of the session
    pub fn best_score(&self) -> u64 {
        self.runs.iter().map(|r| r.score).max().unwrap_or(0)
    }

    pub fn total_coins(&self) -> u64 {
        self.runs.iter().map(|r| u64::from(r.coins)).sum()
    }

    /// Fold the session into `records` and clear it
    pub fn flush_into(&mut self, records: &mut Records, mode: GameMode) -> FlushSummary {
        let best_score = self.best_score();
        let coins_added = self.total_coins();
        let new_high_score = records.record_score(mode, best_score);
        records.add_coins(coins_added);
        self.runs.clear();

        FlushSummary {
            best_score,
            coins_added,
            new_high_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_score_keeps_max() {
        let mut records = Records::new();
        assert!(records.record_score(GameMode::Normal, 120));
        assert!(!records.record_score(GameMode::Normal, 80));
        assert!(!records.record_score(GameMode::Normal, 120));
        assert_eq!(records.best_for(GameMode::Normal), 120);
        assert_eq!(records.best_for(GameMode::Lava), 0);
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let records = Records::new();
        assert!(!records.qualifies(GameMode::Ice, 0));
    }

    #[test]
    fn test_ledger_flush() {
        let mut records = Records::new();
        records.record_score(GameMode::Lava, 300);
        records.add_coins(5);

        let mut ledger = SessionLedger::new();
        ledger.record_run(150, 2);
        ledger.record_run(420, 1);
        ledger.record_run(90, 0);

        let summary = ledger.flush_into(&mut records, GameMode::Lava);
        assert_eq!(
            summary,
            FlushSummary {
                best_score: 420,
                coins_added: 3,
                new_high_score: true,
            }
        );
        assert_eq!(records.best_for(GameMode::Lava), 420);
        assert_eq!(records.coins, 8);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_empty_flush_changes_nothing() {
        let mut records = Records::new();
        records.record_score(GameMode::Normal, 10);
        let before = records.clone();

        let summary = SessionLedger::new().flush_into(&mut records, GameMode::Normal);
        assert!(!summary.new_high_score);
        assert_eq!(records, before);
    }

    #[test]
    fn test_records_json_shape() {
        let mut records = Records::new();
        records.record_score(GameMode::Ice, 77);
        records.add_coins(4);
        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json["best"]["ice"], 77);
        assert_eq!(json["coins"], 4);

        let parsed: Records = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Records::new());
    }
}
