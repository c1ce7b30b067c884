//! Origins of raw container bytes.
//!
//! [`SwfReader`](crate::SwfReader) is agnostic to where its input comes from;
//! anything that can fill a staging buffer on demand works. Three variants
//! cover the usual origins: a file on disk, an in-memory buffer, and the
//! consumer half of a [`byte_channel`](crate::byte_channel) fed by another
//! thread.

use core::cmp::min;
use std::fs::File;
use std::io::{Read, Result};
use std::path::Path;

use crate::channel::ChannelReader;

/// A pull-based origin of raw bytes.
pub trait ChunkSource {
    /// Delivers up to `staging.len()` bytes into `staging` and returns the
    /// count actually delivered. `Ok(0)` means the origin is exhausted.
    ///
    /// Short deliveries are normal and carry no meaning beyond "that is what
    /// was available right now"; only `Ok(0)` terminates the stream.
    fn provide(&mut self, staging: &mut [u8]) -> Result<usize>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn provide(&mut self, staging: &mut [u8]) -> Result<usize> {
        (**self).provide(staging)
    }
}

/// [`ChunkSource`] reading from an open file.
pub struct FileSource {
    file: File,
}

impl FileSource {
    /// Opens the file at `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }
}

impl From<File> for FileSource {
    fn from(file: File) -> Self {
        Self { file }
    }
}

impl ChunkSource for FileSource {
    fn provide(&mut self, staging: &mut [u8]) -> Result<usize> {
        self.file.read(staging)
    }
}

/// [`ChunkSource`] over an in-memory buffer, tracking an offset cursor.
pub struct MemorySource<B> {
    buf: B,
    offset: usize,
}

impl<B: AsRef<[u8]>> MemorySource<B> {
    /// Wraps `buf` with the cursor at its start.
    pub fn new(buf: B) -> Self {
        Self { buf, offset: 0 }
    }
}

impl<B: AsRef<[u8]>> ChunkSource for MemorySource<B> {
    fn provide(&mut self, staging: &mut [u8]) -> Result<usize> {
        let remaining = &self.buf.as_ref()[self.offset..];
        let len = min(staging.len(), remaining.len());
        staging[..len].copy_from_slice(&remaining[..len]);
        self.offset += len;
        Ok(len)
    }
}

/// The channel-backed variant: delivery blocks until the producer thread has
/// written something or closed its half.
impl ChunkSource for ChannelReader {
    fn provide(&mut self, staging: &mut [u8]) -> Result<usize> {
        self.read(staging)
    }
}
