//! Clocks.rs
//!
//! the clocks module counts simulated time. Wall-clock time belongs to the
//! caller; this only knows about ticks and the seconds they covered.

/// SimClock struct
///
/// - elapsed = simulated seconds since the last (re)start
/// - ticks = sub-steps run
/// - frames = rendered frames advanced
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SimClock {
    pub elapsed: f64,
    pub ticks: u64,
    pub frames: u64,
}

impl SimClock {
    pub fn new() -> Self {
        SimClock::default()
    }

    pub fn tick(&mut self, dt: f64) {
        self.elapsed += dt;
        self.ticks += 1;
    }

    pub fn frame(&mut self) {
        self.frames += 1;
    }

    pub fn reset(&mut self) {
        *self = SimClock::default();
    }
}
