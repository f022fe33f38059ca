use std::time::Duration;

use transport::format::FrameLayout;

/// Output sample rate of the demo context (Hz)
pub const SAMPLE_RATE: u32 = 22050;

/// Every decoded stream is interleaved stereo, signed 16-bit little-endian
pub const OUTPUT_LAYOUT: FrameLayout = FrameLayout::STEREO_I16;

pub const INTRO_LENGTH: Duration = Duration::from_secs(5);
pub const LOOP_LENGTH: Duration = Duration::from_secs(4);

/// Frame-loop rate of the overlay
pub const TICKS_PER_SECOND: u32 = 60;

/// Capacity of the control -> render command ring
pub const PLAYER_COMMAND_CAPACITY: usize = 16;

pub const AUDIO_SAMPLE_EPSILON: f32 = 1e-4;
