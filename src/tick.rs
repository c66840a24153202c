//! Monotonic millisecond tick.
//!
//! All controller timing is expressed as a [`Tick`], a wrapping 32-bit
//! millisecond counter.  The counter rolls over after ~49.7 days of uptime,
//! so durations are always computed with wrapping subtraction and never by
//! comparing two absolute tick values.

/// A point on the monotonic millisecond timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tick(pub u32);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, correct across a
    /// counter rollover.
    pub const fn elapsed_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `true` once strictly more than `limit_ms` has passed since `start`.
    pub const fn exceeded(self, start: Tick, limit_ms: u32) -> bool {
        self.elapsed_since(start) > limit_ms
    }

    /// This tick advanced by `ms`, wrapping at `u32::MAX`.
    #[must_use]
    pub const fn after(self, ms: u32) -> Tick {
        Tick(self.0.wrapping_add(ms))
    }
}
