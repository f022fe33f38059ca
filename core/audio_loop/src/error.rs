//! Error types, one enum per concern.

use std::io;

use thiserror::Error;

/// Failures of [`InfiniteLoopWithIntro`](crate::stream::infinite_loop::InfiniteLoopWithIntro).
///
/// Construction returns these directly. The `Read`/`Seek` impls wrap them in an
/// [`io::Error`] that can be recovered with [`StreamError::from_io`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error(
        "invalid loop range: intro end {intro_end} / loop end {loop_end} for a source of {length} bytes"
    )]
    InvalidRange {
        intro_end: u64,
        loop_end: u64,
        length: u64,
    },

    #[error("offset {offset} is not aligned to the {frame_size}-byte frame size")]
    Misaligned { offset: u64, frame_size: u64 },

    #[error("loop region is empty (intro end == loop end == {0})")]
    EmptyLoop(u64),

    #[error("seek to a negative position (from {from} by {delta})")]
    InvalidSeek { from: u64, delta: i64 },

    #[error("seeking relative to the end is not supported on an infinite stream")]
    UnsupportedWhence,

    #[error("stream is closed")]
    Closed,

    #[error("source ended at byte {0}, before the loop end")]
    UnexpectedEof(u64),
}

impl StreamError {
    /// Recover a stream error carried inside an [`io::Error`].
    pub fn from_io(err: &io::Error) -> Option<&Self> {
        err.get_ref().and_then(|inner| inner.downcast_ref::<Self>())
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::InvalidRange { .. }
            | Self::Misaligned { .. }
            | Self::EmptyLoop(_)
            | Self::InvalidSeek { .. } => io::ErrorKind::InvalidInput,
            Self::UnsupportedWhence => io::ErrorKind::Unsupported,
            Self::Closed => io::ErrorKind::NotConnected,
            Self::UnexpectedEof(_) => io::ErrorKind::UnexpectedEof,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        Self::new(err.io_kind(), err)
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to parse WAV data: {0}")]
    Wav(#[from] hound::Error),

    #[error("only mono or stereo audio is supported, got {0} channels")]
    UnsupportedChannels(u16),

    #[error("unsupported sample format: {bits}-bit {format:?}")]
    UnsupportedSampleFormat {
        bits: u16,
        format: hound::SampleFormat,
    },

    #[error("sample rate {actual} Hz does not match the context rate {expected} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("sample rate must be greater than zero")]
    ZeroSampleRate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioDeviceError {
    #[error("no default output device found")]
    DeviceNotFound,

    #[error("failed to build output stream: {0}")]
    StreamBuildFailed(String),

    #[error("failed to start output stream: {0}")]
    StreamStartFailed(String),

    #[error("cannot play a {from} Hz stream at {to} Hz: {reason}")]
    UnsupportedRate { from: u32, to: u32, reason: String },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerError {
    #[error("player command queue is full")]
    CommandQueueFull,
}
