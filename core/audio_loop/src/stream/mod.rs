use std::{
    fmt,
    io::{Read, Seek},
};

pub mod bytes;
pub mod infinite_loop;
pub mod region;

/// A seekable stream of decoded PCM bytes that owns a releasable resource.
/// Implemented by `BytesReadSeekCloser` and `InfiniteLoopWithIntro`.
pub trait AudioStream: Read + Seek + Send + fmt::Debug {
    /// Release the underlying resource. Calling it again is a no-op.
    fn close(&mut self) -> std::io::Result<()>;
}

impl<S: AudioStream + ?Sized> AudioStream for Box<S> {
    fn close(&mut self) -> std::io::Result<()> {
        (**self).close()
    }
}
