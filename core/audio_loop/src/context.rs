use transport::{clock::PlaybackClock, format::FrameLayout};

use crate::{constants::OUTPUT_LAYOUT, error::ContextError};

/// Shared audio settings, created once at startup and passed by reference
/// to whatever decodes or plays audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioContext {
    sample_rate: u32,
    layout: FrameLayout,
}

impl AudioContext {
    pub fn new(sample_rate: u32) -> Result<Self, ContextError> {
        if sample_rate == 0 {
            return Err(ContextError::ZeroSampleRate);
        }

        log::info!("audio context created at {sample_rate} Hz");
        Ok(Self {
            sample_rate,
            layout: OUTPUT_LAYOUT,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Layout of every decoded stream in this context
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn clock(&self) -> PlaybackClock {
        PlaybackClock::new(self.sample_rate, self.layout)
    }
}
