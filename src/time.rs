//! Frame timing.
//!
//! The simulation step is driven by wall-clock deltas between frames. A
//! long stall (window drag, breakpoint, tab in background) would otherwise
//! produce one huge advection step, so deltas are capped.
//!
//! # Example
//!
//! ```ignore
//! use splatflow::time::FrameClock;
//!
//! let mut clock = FrameClock::new(1.0 / 60.0);
//!
//! // In your frame loop:
//! let dt = clock.tick();
//! sim.update(dt);
//! ```

use std::time::Instant;

/// Measures the time between frames.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    /// Largest delta [`tick`](Self::tick) will report, in seconds.
    max_delta: f32,
    /// Last reported delta.
    delta_secs: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock starting now.
    pub fn new(max_delta: f32) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            max_delta,
            delta_secs: 0.0,
            frame_count: 0,
        }
    }

    /// Mark a new frame and return the capped delta since the last one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta_secs = raw.min(self.max_delta);
        self.frame_count += 1;
        self.delta_secs
    }

    /// Delta returned by the last [`tick`](Self::tick).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
