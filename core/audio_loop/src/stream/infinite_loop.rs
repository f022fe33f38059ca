use std::{
    io::{self, Read, Seek, SeekFrom},
    time::Duration,
};

use transport::{clock::PlaybackClock, format::FrameLayout};

use crate::{
    error::StreamError,
    stream::{
        AudioStream,
        region::{LoopRegion, LoopState},
    },
};

/// Presents a finite "intro + loop" source as an endless stream.
///
/// Bytes before `intro_end` are read once; bytes in `[intro_end, loop_end)`
/// repeat forever. Reads always fill the whole buffer and never report end
/// of stream. The read cursor always stays in `[0, loop_end)`.
///
/// # Example
/// ```
/// use std::io::Read;
/// use audio_loop::stream::{bytes::BytesReadSeekCloser, infinite_loop::InfiniteLoopWithIntro};
/// use transport::format::FrameLayout;
///
/// let source = BytesReadSeekCloser::new((0u8..16).collect());
/// let mut stream = InfiniteLoopWithIntro::new(source, 4, 12, FrameLayout::STEREO_I16).unwrap();
///
/// let mut buf = [0u8; 16];
/// stream.read_exact(&mut buf).unwrap();
/// assert_eq!(&buf[12..], &[4, 5, 6, 7]);
/// ```
#[derive(Debug)]
pub struct InfiniteLoopWithIntro<S> {
    /// `None` once closed
    source: Option<S>,
    region: LoopRegion,
    /// Read cursor, mirrors the source position unless `resync` is set
    position: u64,
    /// The source did not land where `position` says after a failed seek
    resync: bool,
}

impl<S: Read + Seek> InfiniteLoopWithIntro<S> {
    /// Wrap `source`, looping `[intro_end, loop_end)` after the intro.
    ///
    /// Both offsets are in bytes and must sit on `layout` frame boundaries.
    pub fn new(
        mut source: S,
        intro_end: u64,
        loop_end: u64,
        layout: FrameLayout,
    ) -> Result<Self, io::Error> {
        let length = source.seek(SeekFrom::End(0))?;
        let region = LoopRegion::new(intro_end, loop_end, length, layout)?;
        source.seek(SeekFrom::Start(0))?;

        log::debug!(
            "infinite loop stream: intro [0, {intro_end}), loop [{intro_end}, {loop_end}) of {length} bytes"
        );

        Ok(Self {
            source: Some(source),
            region,
            position: 0,
            resync: false,
        })
    }

    /// Wrap `source` with loop points given as durations of the intro and
    /// the loop, converted to frame-aligned byte offsets by `clock`.
    pub fn with_durations(
        source: S,
        clock: &PlaybackClock,
        intro: Duration,
        loop_length: Duration,
    ) -> Result<Self, io::Error> {
        let intro_end = clock.duration_to_bytes(intro);
        let loop_end = intro_end + clock.duration_to_bytes(loop_length);
        Self::new(source, intro_end, loop_end, clock.layout())
    }
}

impl<S> InfiniteLoopWithIntro<S> {
    pub fn intro_end(&self) -> u64 {
        self.region.intro_end()
    }

    pub fn loop_end(&self) -> u64 {
        self.region.loop_end()
    }

    pub fn region(&self) -> LoopRegion {
        self.region
    }

    /// Current read offset inside the source
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn state(&self) -> LoopState {
        self.region.state_at(self.position)
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }
}

impl<S: Read + Seek> Read for InfiniteLoopWithIntro<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let source = self.source.as_mut().ok_or(StreamError::Closed)?;

        if self.resync {
            source.seek(SeekFrom::Start(self.position))?;
            self.resync = false;
        }

        let mut filled = 0;
        while filled < buf.len() {
            let until_wrap = self.region.loop_end() - self.position;
            let chunk_len =
                (buf.len() - filled).min(usize::try_from(until_wrap).unwrap_or(usize::MAX));

            let n = source.read(&mut buf[filled..filled + chunk_len])?;
            if n == 0 {
                return Err(StreamError::UnexpectedEof(self.position).into());
            }
            filled += n;
            self.position += n as u64;

            if self.position == self.region.loop_end() {
                self.position = self.region.intro_end();
                if let Err(err) = source.seek(SeekFrom::Start(self.position)) {
                    self.resync = true;
                    return Err(err);
                }
                log::trace!("loop wrapped back to byte {}", self.position);
            }
        }

        Ok(filled)
    }
}

impl<S: Read + Seek> Seek for InfiniteLoopWithIntro<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let source = self.source.as_mut().ok_or(StreamError::Closed)?;

        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(delta) => {
                self.position
                    .checked_add_signed(delta)
                    .ok_or(StreamError::InvalidSeek {
                        from: self.position,
                        delta,
                    })?
            }
            SeekFrom::End(_) => return Err(StreamError::UnsupportedWhence.into()),
        };

        let normalized = self.region.normalize(target);
        match source.seek(SeekFrom::Start(normalized)) {
            Ok(offset) => {
                self.position = offset;
                self.resync = false;
                Ok(offset)
            }
            Err(err) => {
                self.resync = true;
                Err(err)
            }
        }
    }
}

impl<S: AudioStream> AudioStream for InfiniteLoopWithIntro<S> {
    fn close(&mut self) -> io::Result<()> {
        match self.source.take() {
            Some(mut source) => source.close(),
            None => Ok(()),
        }
    }
}
