use std::time::Duration;

use crate::constants::{INTRO_LENGTH, LOOP_LENGTH, SAMPLE_RATE, TICKS_PER_SECOND};

/// Settings of the demo scenario. `Default` is the fixed scenario the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    pub sample_rate: u32,
    /// Played once
    pub intro_length: Duration,
    /// Repeated forever after the intro
    pub loop_length: Duration,
    pub ticks_per_second: u32,
}

impl DemoConfig {
    /// Time budget of one frame-loop tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            intro_length: INTRO_LENGTH,
            loop_length: LOOP_LENGTH,
            ticks_per_second: TICKS_PER_SECOND,
        }
    }
}
