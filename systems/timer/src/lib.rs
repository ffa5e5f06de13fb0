#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round timer that counts whole seconds and announces when time runs out.

use std::time::Duration;

use shroom_sniff_core::{Event, EventBus};

const SECOND: Duration = Duration::from_secs(1);

/// Per-round countdown advanced once per frame.
#[derive(Debug)]
pub struct RoundTimer {
    limit_seconds: u32,
    elapsed_seconds: u32,
    accumulator: Duration,
    paused: bool,
    cancelled: bool,
    expired: bool,
}

impl RoundTimer {
    /// Creates a timer; a limit of zero never expires.
    #[must_use]
    pub const fn new(limit_seconds: u32) -> Self {
        Self {
            limit_seconds,
            elapsed_seconds: 0,
            accumulator: Duration::ZERO,
            paused: false,
            cancelled: false,
            expired: false,
        }
    }

    /// Accumulates `dt` and publishes one event per completed second.
    ///
    /// Publishes [`Event::TimeUp`] once when the limit is reached. Paused,
    /// cancelled and expired timers ignore the tick.
    pub fn tick(&mut self, dt: Duration, bus: &mut EventBus) {
        if self.paused || self.cancelled || self.expired {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        while self.accumulator >= SECOND {
            self.accumulator -= SECOND;
            self.elapsed_seconds += 1;
            bus.publish(Event::TimerAdvanced {
                elapsed_seconds: self.elapsed_seconds,
                remaining_seconds: self.remaining_seconds(),
            });

            if self.limit_seconds > 0 && self.elapsed_seconds >= self.limit_seconds {
                self.expired = true;
                bus.publish(Event::TimeUp {
                    elapsed_seconds: self.elapsed_seconds,
                });
                return;
            }
        }
    }

    /// Stops the countdown until [`RoundTimer::resume`].
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continues a paused countdown.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Stops the countdown for good.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whole seconds elapsed.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Whole seconds left, or `None` for an unlimited round.
    #[must_use]
    pub const fn remaining_seconds(&self) -> Option<u32> {
        if self.limit_seconds == 0 {
            None
        } else {
            Some(self.limit_seconds.saturating_sub(self.elapsed_seconds))
        }
    }

    /// Reports whether the countdown is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reports whether the countdown was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Reports whether the limit has been reached.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }
}
