use transport::format::FrameLayout;

use crate::error::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    PlayingIntro,
    Looping,
}

/// Byte offsets of an intro + loop layout: `[0, intro_end)` plays once,
/// `[intro_end, loop_end)` repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopRegion {
    intro_end: u64,
    loop_end: u64,
}

impl LoopRegion {
    /// Validate a region against a source of `length` bytes.
    pub fn new(
        intro_end: u64,
        loop_end: u64,
        length: u64,
        layout: FrameLayout,
    ) -> Result<Self, StreamError> {
        if intro_end > loop_end || loop_end > length {
            return Err(StreamError::InvalidRange {
                intro_end,
                loop_end,
                length,
            });
        }

        for offset in [intro_end, loop_end] {
            if !layout.is_aligned(offset) {
                return Err(StreamError::Misaligned {
                    offset,
                    frame_size: layout.frame_size(),
                });
            }
        }

        if intro_end == loop_end {
            return Err(StreamError::EmptyLoop(loop_end));
        }

        Ok(Self {
            intro_end,
            loop_end,
        })
    }

    pub fn intro_end(&self) -> u64 {
        self.intro_end
    }

    pub fn loop_end(&self) -> u64 {
        self.loop_end
    }

    pub fn loop_length(&self) -> u64 {
        self.loop_end - self.intro_end
    }

    /// Fold a logical offset of the infinite stream into `[0, loop_end)`.
    /// Intro offsets map to themselves.
    pub fn normalize(&self, offset: u64) -> u64 {
        if offset < self.intro_end {
            offset
        } else {
            self.intro_end + (offset - self.intro_end) % self.loop_length()
        }
    }

    pub fn state_at(&self, offset: u64) -> LoopState {
        if offset < self.intro_end {
            LoopState::PlayingIntro
        } else {
            LoopState::Looping
        }
    }
}
