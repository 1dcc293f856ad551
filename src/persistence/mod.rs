//! Score store seam
//!
//! Storage itself belongs to the host. The core only hands over a
//! `HighScoreRecord` to append and reads records back for display.

use crate::highscores::{HighScoreRecord, HighScores, SortOrder};

/// Load/save an ordered list of score records
pub trait ScoreStore {
    fn load(&self) -> Vec<HighScoreRecord>;

    fn append(&mut self, record: HighScoreRecord);

    /// Top qualifying records, sorted for display
    fn leaderboard(&self, order: SortOrder) -> HighScores {
        let mut scores = HighScores::new();
        for record in self.load() {
            scores.add(record);
        }
        scores.sort(order);
        scores
    }
}

/// Keeps records for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<HighScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Vec<HighScoreRecord> {
        self.records.clone()
    }

    fn append(&mut self, record: HighScoreRecord) {
        log::debug!("Storing score {} for {}", record.score, record.name);
        self.records.push(record);
    }
}
