//! Score, difficulty tier and best-score tracking for one session

use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyTable, Tier};
use crate::storage::ScoreStore;

/// What changed when an obstacle pair was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Score after the clear
    pub score: u32,
    /// Set when this clear moved the session into a higher tier
    pub new_tier: Option<Tier>,
}

/// Session progression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progression {
    score: u32,
    tier: Tier,
    /// Last known durable best score
    best_score: u32,
}

impl Progression {
    /// Fresh session state, carrying over the stored best score
    pub fn new(best_score: u32) -> Self {
        Self {
            score: 0,
            tier: Tier::Easy,
            best_score,
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[inline]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Count one cleared pair and advance the tier if a threshold was reached
    pub fn on_pair_cleared(&mut self, table: &DifficultyTable) -> ClearOutcome {
        self.score += 1;
        let new_tier = self.advance_tier(table);
        ClearOutcome {
            score: self.score,
            new_tier,
        }
    }

    /// Tier for the current score
    pub fn current_tier(&self, table: &DifficultyTable) -> Tier {
        table.tier_for_score(self.score)
    }

    /// Move up to the tier the score earns; never moves down
    pub fn advance_tier(&mut self, table: &DifficultyTable) -> Option<Tier> {
        let earned = self.current_tier(table);
        if earned > self.tier {
            log::info!(
                "Difficulty {} -> {} at score {}",
                self.tier.as_str(),
                earned.as_str(),
                self.score
            );
            self.tier = earned;
            Some(earned)
        } else {
            None
        }
    }

    /// Write the score to the store if it beats the stored best.
    ///
    /// Returns true when a new best was written.
    pub fn persist_best_score(&mut self, store: &mut dyn ScoreStore) -> bool {
        let stored = store.read().unwrap_or(0);
        self.best_score = self.best_score.max(stored);
        if self.score > stored {
            store.write(self.score);
            self.best_score = self.score;
            log::info!("New best score: {}", self.score);
            true
        } else {
            false
        }
    }

    /// HUD text for the current score
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// HUD text for the best score
    pub fn best_score_text(&self) -> String {
        format!("Best Score: {}", self.best_score)
    }
}
