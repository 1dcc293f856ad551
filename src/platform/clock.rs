//! Tick sources
//!
//! A tick source runs repeating timers identified by `TimerKind`. The
//! simulation never blocks on it; it only asks for timers to be started or
//! stopped and reacts to ticks.

use crate::sim::TimerKind;

/// Repeating timers keyed by kind
pub trait TickSource {
    /// Start `timer`, restarting its interval if it already runs
    fn register(&mut self, timer: TimerKind, interval_ms: u32);

    fn cancel(&mut self, timer: TimerKind);

    fn is_registered(&self, timer: TimerKind) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    timer: TimerKind,
    interval_ms: u64,
    due_ms: u64,
    /// Registration order, breaks ties between timers due together
    seq: u64,
}

/// Deterministic clock over virtual milliseconds
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ms: u64,
    timers: Vec<Scheduled>,
    next_seq: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.iter().map(|scheduled| scheduled.due_ms).min()
    }

    /// Jump to the earliest due time not after `limit_ms` and return every
    /// timer due at that instant in registration order. Each returned timer
    /// is rescheduled one interval later. `None` when nothing is due.
    pub fn advance_to_next(&mut self, limit_ms: u64) -> Option<Vec<TimerKind>> {
        let due_ms = self.next_due_ms().filter(|due| *due <= limit_ms)?;
        self.now_ms = self.now_ms.max(due_ms);

        let mut due: Vec<&mut Scheduled> = self
            .timers
            .iter_mut()
            .filter(|scheduled| scheduled.due_ms == due_ms)
            .collect();
        due.sort_by_key(|scheduled| scheduled.seq);

        let mut fired = Vec::with_capacity(due.len());
        for scheduled in due {
            scheduled.due_ms += scheduled.interval_ms;
            fired.push(scheduled.timer);
        }
        Some(fired)
    }

    /// Move time forward without firing anything
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

impl TickSource for VirtualClock {
    fn register(&mut self, timer: TimerKind, interval_ms: u32) {
        self.cancel(timer);
        let interval_ms = u64::from(interval_ms.max(1));
        self.timers.push(Scheduled {
            timer,
            interval_ms,
            due_ms: self.now_ms + interval_ms,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    fn cancel(&mut self, timer: TimerKind) {
        self.timers.retain(|scheduled| scheduled.timer != timer);
    }

    fn is_registered(&self, timer: TimerKind) -> bool {
        self.timers.iter().any(|scheduled| scheduled.timer == timer)
    }
}
