// SPDX-License-Identifier: GPL-3.0-only

//! Self-timer countdown
//!
//! Counts down once per tick from a start value to zero and completes exactly
//! once. Every `start` creates a new generation and returns its handle; ticks
//! carry the handle they were scheduled for, so a tick from a superseded or
//! cancelled countdown is recognised and dropped. At most one countdown is
//! ever active.

/// Identifies one started countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownHandle(u64);

/// Outcome of delivering a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The tick belongs to a superseded or cancelled countdown
    Stale,
    /// Still counting; holds the new remaining value
    Running(u32),
    /// Reached zero; reported once per countdown
    Completed,
}

/// Countdown state
#[derive(Debug, Default)]
pub struct Countdown {
    generation: u64,
    active: Option<CountdownHandle>,
    remaining: u32,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `seconds`, superseding any running countdown
    ///
    /// `remaining` shows `seconds` right away; the first tick decrements it.
    pub fn start(&mut self, seconds: u32) -> CountdownHandle {
        self.generation = self.generation.wrapping_add(1);
        let handle = CountdownHandle(self.generation);
        self.active = Some(handle);
        self.remaining = seconds;
        handle
    }

    /// Deliver one tick
    pub fn tick(&mut self, handle: CountdownHandle) -> Tick {
        if self.active != Some(handle) {
            return Tick::Stale;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = None;
            Tick::Completed
        } else {
            Tick::Running(self.remaining)
        }
    }

    /// Stop without completing
    ///
    /// Returns `true` if a countdown was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.active.take().is_some();
        self.remaining = 0;
        was_running
    }

    /// Whether a countdown is active
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Seconds left on the active countdown (0 when idle)
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
