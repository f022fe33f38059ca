use std::time::{Duration, Instant};

const MEASURE_WINDOW: Duration = Duration::from_secs(1);

/// Measures how many frame-loop ticks actually happen per second.
///
/// The value is refreshed once per measuring window, so it reads as a
/// stable number on screen instead of jittering every tick.
#[derive(Debug, Clone, Copy)]
pub struct TickRateMeter {
    window_start: Option<Instant>,
    ticks_in_window: u64,
    current: f64,
}

impl TickRateMeter {
    pub fn new() -> Self {
        Self {
            window_start: None,
            ticks_in_window: 0,
            current: 0.0,
        }
    }

    /// Record one tick at `now`
    pub fn tick(&mut self, now: Instant) {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return;
        };

        self.ticks_in_window += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= MEASURE_WINDOW {
            self.current = self.ticks_in_window as f64 / elapsed.as_secs_f64();
            self.ticks_in_window = 0;
            self.window_start = Some(now);
        }
    }

    /// Ticks per second over the last complete window (0 until one completes)
    pub fn current(&self) -> f64 {
        self.current
    }
}

impl Default for TickRateMeter {
    fn default() -> Self {
        Self::new()
    }
}
