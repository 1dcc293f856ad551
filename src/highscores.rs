//! High score leaderboard
//!
//! The session only produces records; storing them is the score store's job.
//! Three orderings are offered for display.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: u32,
    pub name: String,
    /// 1-based level reached
    pub level: u32,
}

impl HighScoreRecord {
    pub fn new(score: u32, name: impl Into<String>, level: u32) -> Self {
        Self {
            score,
            name: name.into(),
            level,
        }
    }
}

/// Leaderboard orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Score high to low, then name, then level high to low
    #[default]
    Score,
    /// Level high to low, then score high to low, then name
    Level,
    /// Name, then score high to low, then level high to low
    Name,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Score => "score",
            SortOrder::Level => "level",
            SortOrder::Name => "name",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "score" => Some(SortOrder::Score),
            "level" => Some(SortOrder::Level),
            "name" => Some(SortOrder::Name),
            _ => None,
        }
    }

    pub fn compare(&self, a: &HighScoreRecord, b: &HighScoreRecord) -> Ordering {
        let by_score = b.score.cmp(&a.score);
        let by_level = b.level.cmp(&a.level);
        let by_name = compare_names(&a.name, &b.name);
        match self {
            SortOrder::Score => by_score.then(by_name).then(by_level),
            SortOrder::Level => by_level.then(by_score).then(by_name),
            SortOrder::Name => by_name.then(by_score).then(by_level),
        }
    }
}

/// Case-insensitive name order
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .iter()
            .map(|entry| entry.score)
            .min()
            .is_none_or(|lowest| score > lowest)
    }

    /// Add a record if it qualifies. Returns the rank achieved (1-indexed).
    pub fn add(&mut self, record: HighScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        let record_score = record.score;
        self.sort(SortOrder::Score);
        let pos = self
            .entries
            .iter()
            .position(|entry| SortOrder::Score.compare(&record, entry) == Ordering::Less)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record);
        self.entries.truncate(MAX_HIGH_SCORES);

        log::debug!("High score {} at rank {}", record_score, pos + 1);
        Some(pos + 1)
    }

    /// Reorder in place; stable for equal keys
    pub fn sort(&mut self, order: SortOrder) {
        self.entries.sort_by(|a, b| order.compare(a, b));
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.iter().map(|entry| entry.score).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(scores: &HighScores) -> Vec<&str> {
        scores.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn board() -> HighScores {
        HighScores {
            entries: vec![
                HighScoreRecord::new(300, "carol", 2),
                HighScoreRecord::new(500, "Bob", 1),
                HighScoreRecord::new(300, "alice", 3),
                HighScoreRecord::new(300, "Alice", 1),
            ],
        }
    }

    #[test]
    fn test_default_order_is_score_then_name_then_level() {
        let mut scores = board();
        scores.sort(SortOrder::Score);
        assert_eq!(names(&scores), vec!["Bob", "alice", "Alice", "carol"]);
        assert_eq!(scores.entries[1].level, 3);
    }

    #[test]
    fn test_level_order() {
        let mut scores = board();
        scores.sort(SortOrder::Level);
        assert_eq!(names(&scores), vec!["alice", "carol", "Bob", "Alice"]);
    }

    #[test]
    fn test_name_order_ignores_case() {
        let mut scores = board();
        scores.sort(SortOrder::Name);
        assert_eq!(names(&scores), vec!["alice", "Alice", "Bob", "carol"]);
    }

    #[test]
    fn test_add_ranks_and_truncates() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(HighScoreRecord::new(0, "zero", 1)), None);
        for i in 1..=MAX_HIGH_SCORES as u32 {
            scores.add(HighScoreRecord::new(i * 100, format!("p{i}"), 1));
        }
        assert!(!scores.qualifies(50));
        assert_eq!(scores.add(HighScoreRecord::new(550, "mid", 2)), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1000));
        assert!(scores.entries.iter().all(|e| e.score != 100));
    }

    #[test]
    fn test_sort_order_names() {
        assert_eq!(SortOrder::from_str("LEVEL"), Some(SortOrder::Level));
        assert_eq!(SortOrder::Name.as_str(), "name");
        assert_eq!(SortOrder::from_str("date"), None);
    }
}
