//! Fixed-timestep stepping with an accumulator.
//!
//! Frame times are clamped to a maximum before they are added, so one long
//! frame costs a bounded number of simulation steps.

use tracing::warn;

/// Accumulates frame time and releases it in fixed-size steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_frame_time: f32,
    accumulator: f32,
    total_sim_time: f32,
    update_count: u64,
}

impl FixedTimestep {
    /// Creates a stepper running `step`-second updates. Frame times above
    /// `max_frame_time` are clamped.
    pub fn new(step: f32, max_frame_time: f32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_frame_time: max_frame_time.max(step),
            accumulator: 0.0,
            total_sim_time: 0.0,
            update_count: 0,
        }
    }

    /// Adds `frame_time` seconds and calls `update_fn(step, total_sim_time)`
    /// once per whole step available. Returns the number of steps run.
    pub fn advance(&mut self, frame_time: f32, mut update_fn: impl FnMut(f32, f32)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > self.max_frame_time {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                self.max_frame_time * 1000.0
            );
            frame_time = self.max_frame_time;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step {
            update_fn(self.step, self.total_sim_time);
            self.total_sim_time += self.step;
            self.accumulator -= self.step;
            self.update_count += 1;
            steps += 1;
        }
        steps
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f32 {
        self.total_sim_time
    }
}
