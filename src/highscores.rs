//! Best-score board
//!
//! Persisted to LocalStorage, tracks the top 10 finished runs. Filled by the
//! browser glue from the final snapshot once a run is over; the simulation
//! never calls into it.

use serde::{Deserialize, Serialize};

use crate::sim::GameSnapshot;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Coins picked up during the run
    pub coins: u32,
    /// Distance covered
    pub distance: f32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "coin_dash_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed), or None
    /// if the run is still in progress or did not qualify.
    pub fn record(&mut self, snapshot: &GameSnapshot, timestamp: f64) -> Option<usize> {
        if !snapshot.is_game_over || !self.qualifies(snapshot.score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: snapshot.score,
            coins: snapshot.coins,
            distance: snapshot.distance,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| snapshot.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(score: u64) -> GameSnapshot {
        GameSnapshot {
            is_game_over: true,
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&finished(100), 0.0), Some(1));
        assert_eq!(scores.record(&finished(300), 0.0), Some(1));
        assert_eq!(scores.record(&finished(200), 0.0), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_ignores_unfinished_and_zero() {
        let mut scores = HighScores::new();
        let running = GameSnapshot {
            is_playing: true,
            score: 50,
            ..Default::default()
        };
        assert_eq!(scores.record(&running, 0.0), None);
        assert_eq!(scores.record(&finished(0), 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut scores = HighScores::new();
        for s in 1..=12 {
            scores.record(&finished(s * 10), 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(20));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
    }
}
