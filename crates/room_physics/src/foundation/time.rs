//! Time management utilities
//!
//! The collision core itself only sees `dt`; these helpers are for drivers
//! that call [`Room::tick`](crate::room::Room::tick) from a real-time loop.

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-step accumulator: converts variable frame times into a whole
/// number of simulation ticks of `step` seconds.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
}

impl FixedTimestep {
    /// Create an accumulator producing ticks of `step` seconds
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps_per_frame: 8,
        }
    }

    /// Limit how many ticks one frame may produce (spiral-of-death guard)
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Tick length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed elapsed frame time and return how many ticks to run now
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        if self.step <= 0.0 {
            return 0;
        }
        self.accumulator += frame_time.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps_per_frame {
            // Drop the backlog instead of falling further behind
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep_accumulates() {
        let mut clock = FixedTimestep::new(0.25);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.2), 1);
        assert_eq!(clock.advance(0.5), 2);
    }

    #[test]
    fn test_fixed_timestep_caps_steps() {
        let mut clock = FixedTimestep::new(0.25).with_max_steps(2);
        assert_eq!(clock.advance(10.0), 2);
        assert_eq!(clock.advance(0.0), 1);
    }
}
