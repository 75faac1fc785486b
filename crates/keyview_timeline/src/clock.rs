// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame tick source.
//!
//! The host calls [`FrameClock::tick`] once per rendered frame with its
//! monotonic timestamp. Subscribers get both the absolute time (for timers
//! measured from a start instant) and the delta since the previous frame
//! (for accumulating clocks such as an animation mixer).

use std::time::Duration;

/// One display-refresh tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTick {
    /// Host timestamp of this frame
    pub now: Duration,
    /// Time since the previous frame (zero on the first frame)
    pub delta: Duration,
    /// Frames produced so far, including this one
    pub frame: u64,
}

impl FrameTick {
    /// Delta in seconds, as mixers expect it
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Turns host timestamps into ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Duration>,
    frame: u64,
}

impl FrameClock {
    /// Create a clock that has not ticked yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the tick for a frame at `now`.
    ///
    /// Timestamps going backwards yield a zero delta.
    pub fn tick(&mut self, now: Duration) -> FrameTick {
        let delta = self
            .last
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        self.last = Some(now);
        self.frame += 1;
        FrameTick {
            now,
            delta,
            frame: self.frame,
        }
    }
}
