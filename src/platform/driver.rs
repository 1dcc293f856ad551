//! Session driver
//!
//! Owns a session and its collaborators. Timer ticks come from a
//! `VirtualClock`; outbound traffic is routed after every session call:
//! sounds to the audio sink, timer requests to the clock, notifications to
//! the event log. A frame is presented after every tick and command.

use super::clock::{TickSource, VirtualClock};
use super::input::InputScript;
use crate::audio::AudioSink;
use crate::renderer::RenderSink;
use crate::sim::{GameEvent, MoveCommand, Outbound, Session, TimerKind};

pub struct Driver<A: AudioSink, R: RenderSink> {
    session: Session,
    clock: VirtualClock,
    audio: A,
    renderer: R,
    events: Vec<GameEvent>,
}

impl<A: AudioSink, R: RenderSink> Driver<A, R> {
    /// Take over a freshly built session and apply its startup requests
    pub fn new(session: Session, audio: A, renderer: R) -> Self {
        let mut driver = Self {
            session,
            clock: VirtualClock::new(),
            audio,
            renderer,
            events: Vec::new(),
        };
        driver.pump();
        driver.session.render(&mut driver.renderer);
        driver
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Every notification so far, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Deliver a player command at the current virtual time
    pub fn send(&mut self, command: MoveCommand) {
        self.session.handle_command(command);
        self.pump();
        self.session.render(&mut self.renderer);
    }

    /// Run every timer due in the next `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.advance_to(self.clock.now_ms() + ms);
    }

    /// Run every timer due up to `target_ms`, then park the clock there
    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some(due) = self.clock.advance_to_next(target_ms) {
            for timer in due {
                self.dispatch(timer);
            }
        }
        self.clock.advance_to(target_ms);
    }

    /// Run timers until `done` holds or `limit_ms` elapses. Returns whether
    /// `done` was reached.
    pub fn run_until(&mut self, limit_ms: u64, mut done: impl FnMut(&Session) -> bool) -> bool {
        let deadline = self.clock.now_ms() + limit_ms;
        while !done(&self.session) {
            match self.clock.advance_to_next(deadline) {
                Some(due) => {
                    for timer in due {
                        self.dispatch(timer);
                    }
                }
                None => {
                    self.clock.advance_to(deadline);
                    return false;
                }
            }
        }
        true
    }

    /// Replay `script` until it runs out, the game ends or `until_ms` is
    /// reached
    pub fn run_script(&mut self, script: &mut InputScript, until_ms: u64) {
        while !self.session.is_game_over() {
            let Some(at_ms) = script.next_at_ms().filter(|at_ms| *at_ms <= until_ms) else {
                break;
            };
            self.advance_to(at_ms);
            if let Some(command) = script.pop_due(self.clock.now_ms()) {
                self.send(command);
            }
        }
        if !self.session.is_game_over() {
            self.advance_to(until_ms);
        }
    }

    fn dispatch(&mut self, timer: TimerKind) {
        self.session.on_timer(timer);
        self.pump();
        self.session.render(&mut self.renderer);
    }

    /// Route everything the session queued
    fn pump(&mut self) {
        for message in self.session.drain_outbound() {
            match message {
                Outbound::Event(event) => {
                    log::trace!("[{}ms] {:?}", self.clock.now_ms(), event);
                    self.events.push(event);
                }
                Outbound::Sound(effect) => self.audio.play(effect),
                Outbound::StartTimer { timer, interval_ms } => self.clock.register(timer, interval_ms),
                Outbound::StopTimer(timer) => self.clock.cancel(timer),
            }
        }
    }
}
