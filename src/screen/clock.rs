use std::time::{Duration, Instant};

/// Frame clock - tracks delta and elapsed time across render ticks
///
/// Timestamps are measured from the clock's origin. Elapsed time is the sum of
/// all deltas, so it never decreases even when the time source jumps back.
#[derive(Debug)]
pub struct FrameClock {
    origin: Instant,
    last: Option<Duration>,
    delta: f32,
    elapsed: f32,
}

impl FrameClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last: None,
            delta: 0.0,
            elapsed: 0.0,
        }
    }

    /// Advance using the wall clock
    pub fn advance(&mut self) {
        self.advance_to(self.origin.elapsed());
    }

    /// Advance to an explicit timestamp measured from the origin
    ///
    /// The first call yields a zero delta and establishes the epoch. A timestamp
    /// earlier than the previous one yields a zero delta.
    pub fn advance_to(&mut self, now: Duration) {
        self.delta = match self.last {
            Some(last) => now.saturating_sub(last).as_secs_f32(),
            None => 0.0,
        };
        self.elapsed += self.delta;
        self.last = Some(now);
    }

    /// Forget the previous timestamp so the next tick starts a fresh delta
    /// while keeping the accumulated elapsed time
    pub fn suspend(&mut self) {
        self.last = None;
        self.delta = 0.0;
    }

    /// Timestamp of "now" relative to the origin
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Seconds between the two most recent ticks
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Seconds accumulated since the first tick
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
