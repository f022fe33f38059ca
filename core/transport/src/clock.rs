use std::time::Duration;

use crate::format::FrameLayout;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Converts between byte counts of a PCM stream and wall-clock time.
///
/// The player counts the bytes it has pulled from its stream; this clock
/// turns that count into an elapsed playback time, and turns durations into
/// frame-aligned byte offsets for building loop points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackClock {
    sample_rate: u32,
    layout: FrameLayout,
}

impl PlaybackClock {
    pub fn new(sample_rate: u32, layout: FrameLayout) -> Self {
        Self {
            sample_rate,
            layout,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Bytes consumed per second of playback
    pub fn bytes_per_second(&self) -> u64 {
        u64::from(self.sample_rate) * self.layout.frame_size()
    }

    pub fn frames_to_duration(&self, frames: u64) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let nanos = u128::from(frames) * NANOS_PER_SEC / u128::from(self.sample_rate);
        Duration::from_nanos(nanos.min(u128::from(u64::MAX)) as u64)
    }

    /// Elapsed time represented by `bytes` of PCM data. Partial frames are ignored.
    pub fn bytes_to_duration(&self, bytes: u64) -> Duration {
        self.frames_to_duration(self.layout.bytes_to_frames(bytes))
    }

    /// Whole frames covered by `duration`, rounded down.
    pub fn duration_to_frames(&self, duration: Duration) -> u64 {
        let frames = duration.as_nanos() * u128::from(self.sample_rate) / NANOS_PER_SEC;
        frames.min(u128::from(u64::MAX)) as u64
    }

    /// Frame-aligned byte offset reached after playing `duration`.
    pub fn duration_to_bytes(&self, duration: Duration) -> u64 {
        self.layout
            .frames_to_bytes(self.duration_to_frames(duration))
    }
}
