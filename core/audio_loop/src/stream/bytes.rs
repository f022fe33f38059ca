use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::{error::StreamError, stream::AudioStream};

/// In-memory [`AudioStream`] over a byte buffer. Closing frees the buffer.
#[derive(Debug)]
pub struct BytesReadSeekCloser {
    inner: Option<Cursor<Vec<u8>>>,
}

impl BytesReadSeekCloser {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            inner: Some(Cursor::new(bytes)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    fn cursor(&mut self) -> io::Result<&mut Cursor<Vec<u8>>> {
        self.inner.as_mut().ok_or_else(|| StreamError::Closed.into())
    }
}

impl Read for BytesReadSeekCloser {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor()?.read(buf)
    }
}

impl Seek for BytesReadSeekCloser {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor()?.seek(pos)
    }
}

impl AudioStream for BytesReadSeekCloser {
    fn close(&mut self) -> io::Result<()> {
        self.inner = None;
        Ok(())
    }
}
