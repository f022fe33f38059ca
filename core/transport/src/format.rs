/// Byte layout of one interleaved PCM frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub channels: u16,
    pub bytes_per_sample: u16,
}

impl FrameLayout {
    /// Interleaved stereo, signed 16-bit little-endian.
    pub const STEREO_I16: Self = Self {
        channels: 2,
        bytes_per_sample: 2,
    };

    pub const fn new(channels: u16, bytes_per_sample: u16) -> Self {
        Self {
            channels,
            bytes_per_sample,
        }
    }

    /// Bytes occupied by a single frame (one sample per channel)
    pub fn frame_size(&self) -> u64 {
        u64::from(self.channels) * u64::from(self.bytes_per_sample)
    }

    pub fn is_aligned(&self, byte_offset: u64) -> bool {
        let frame_size = self.frame_size();
        frame_size != 0 && byte_offset % frame_size == 0
    }

    pub fn bytes_to_frames(&self, bytes: u64) -> u64 {
        match self.frame_size() {
            0 => 0,
            frame_size => bytes / frame_size,
        }
    }

    pub fn frames_to_bytes(&self, frames: u64) -> u64 {
        frames * self.frame_size()
    }
}
