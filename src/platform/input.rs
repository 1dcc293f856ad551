//! Input mapping
//!
//! Raw key capture belongs to the host; this only turns key names into move
//! commands and replays timed command scripts.

use std::collections::VecDeque;

use crate::sim::MoveCommand;

/// Map a key name (browser `KeyboardEvent.key` style or WASD) to a command
pub fn command_for_key(key: &str) -> Option<MoveCommand> {
    match key {
        "ArrowLeft" | "Left" | "a" | "A" => Some(MoveCommand::MoveLeft),
        "ArrowRight" | "Right" | "d" | "D" => Some(MoveCommand::MoveRight),
        "ArrowUp" | "Up" | "w" | "W" => Some(MoveCommand::MoveUp),
        "ArrowDown" | "Down" | "s" | "S" => Some(MoveCommand::MoveDown),
        _ => None,
    }
}

/// Commands scheduled at virtual times
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    steps: VecDeque<(u64, MoveCommand)>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse whitespace-separated keys, one command every `spacing_ms`
    /// starting at `spacing_ms`. Unknown keys are skipped with a warning.
    pub fn from_keys(keys: &str, spacing_ms: u64) -> Self {
        let mut script = Self::new();
        let mut at_ms = 0;
        for key in keys.split_whitespace() {
            match command_for_key(key) {
                Some(command) => {
                    at_ms += spacing_ms;
                    script.push(at_ms, command);
                }
                None => log::warn!("Ignoring unknown key {key:?}"),
            }
        }
        script
    }

    /// Append a command; times must not go backwards
    pub fn push(&mut self, at_ms: u64, command: MoveCommand) {
        debug_assert!(self.steps.back().is_none_or(|(last, _)| *last <= at_ms));
        self.steps.push_back((at_ms, command));
    }

    pub fn next_at_ms(&self) -> Option<u64> {
        self.steps.front().map(|(at_ms, _)| *at_ms)
    }

    /// Pop the next command if it is due by `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<MoveCommand> {
        if self.next_at_ms()? > now_ms {
            return None;
        }
        self.steps.pop_front().map(|(_, command)| command)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
