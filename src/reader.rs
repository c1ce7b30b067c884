//! Pull-based decompression adapter over a [`ChunkSource`].

use core::cmp::min;
use std::io::{BufRead, Error, ErrorKind, Read, Result, Seek, SeekFrom};

use log::{debug, warn};

use crate::codec::{Decode, IdentityDecoder, InflateDecoder};
use crate::signature::{Compression, Signature};
use crate::source::ChunkSource;

const WINDOW_SIZE: usize = 4096;
const STAGING_SIZE: usize = 4096;

enum State {
    /// Nothing pulled yet; the signature is read on first access.
    Header,
    Streaming,
    Done,
    /// A decode error was reported; the source is never touched again.
    Failed { kind: ErrorKind, message: String },
}

/// Lazily decompressing reader over an SWF container byte stream.
///
/// Wraps any [`ChunkSource`] and serves the container's logical bytes through
/// [`Read`]/[`BufRead`]. On the first pull it reads the 8-byte signature,
/// picks the passthrough or zlib engine accordingly, and exposes the
/// signature bytes verbatim as the start of the output; from then on each
/// window refill pulls just enough source bytes to produce up to 4 KiB of
/// output. Nothing is ever buffered beyond one input staging block and one
/// output window.
///
/// ```no_run
/// use std::io::Read;
/// use swf_stream::{FileSource, SwfReader};
///
/// # fn main() -> std::io::Result<()> {
/// let mut reader = SwfReader::new(FileSource::open("movie.swf")?);
/// let mut header = [0u8; 8];
/// reader.read_exact(&mut header)?;
/// # Ok(())
/// # }
/// ```
pub struct SwfReader<S> {
    source: S,
    decoder: Box<dyn Decode>,
    signature: Option<Signature>,
    state: State,
    staging: Box<[u8]>,
    staged_pos: usize,
    staged_len: usize,
    window: Box<[u8]>,
    window_pos: usize,
    window_len: usize,
    /// Bytes released to the consumer from retired windows.
    retired: u64,
}

impl<S: ChunkSource> SwfReader<S> {
    /// Wraps `source`. Nothing is pulled until the first read.
    pub fn new(source: S) -> Self {
        Self {
            source,
            decoder: Box::new(IdentityDecoder),
            signature: None,
            state: State::Header,
            staging: vec![0; STAGING_SIZE].into_boxed_slice(),
            staged_pos: 0,
            staged_len: 0,
            window: vec![0; WINDOW_SIZE].into_boxed_slice(),
            window_pos: 0,
            window_len: 0,
            retired: 0,
        }
    }

    /// Acquires a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Acquires a mutable reference to the underlying source.
    ///
    /// Pulling bytes from the source directly will desynchronize the decoder.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Total logical bytes released to the consumer so far, signature
    /// included.
    pub fn position(&self) -> u64 {
        self.retired + self.window_pos as u64
    }

    /// Parsed container signature, pulling it from the source first if
    /// nothing has been read yet.
    pub fn signature(&mut self) -> Result<&Signature> {
        if self.signature.is_none() {
            self.fill_buf()?;
        }
        match self.signature.as_ref() {
            Some(signature) => Ok(signature),
            None => Err(Error::new(
                ErrorKind::UnexpectedEof,
                "container signature unavailable",
            )),
        }
    }

    /// Reads and validates the 8 signature bytes, then exposes them verbatim
    /// as the initial output window. The signature is stored in the clear
    /// even for compressed containers.
    fn read_header(&mut self) -> Result<()> {
        let mut raw = [0u8; Signature::LEN];
        let mut filled = 0;
        while filled < raw.len() {
            let count = self.source.provide(&mut raw[filled..])?;
            if count == 0 {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    "stream ended inside the container signature",
                ));
            }
            filled += count;
        }

        let signature = Signature::parse(raw)?;
        debug!(
            "signature accepted: {:?} version {} declared length {}",
            signature.compression(),
            signature.version(),
            signature.file_length()
        );
        self.decoder = match signature.compression() {
            Compression::None => Box::new(IdentityDecoder),
            Compression::Zlib => Box::new(InflateDecoder::new()),
        };
        self.signature = Some(signature);

        self.window[..raw.len()].copy_from_slice(&raw);
        self.window_pos = 0;
        self.window_len = raw.len();
        self.state = State::Streaming;
        Ok(())
    }

    /// Retires the consumed window and produces the next one: pulls source
    /// chunks into the staging buffer and drives the engine until the window
    /// is full, the engine signals end of stream, or the source is exhausted.
    /// A short source simply yields a short window.
    fn refill_window(&mut self) -> Result<()> {
        self.retired += self.window_len as u64;
        self.window_pos = 0;
        self.window_len = 0;

        loop {
            if self.staged_pos == self.staged_len {
                let count = self.source.provide(&mut self.staging)?;
                if count == 0 {
                    let (_, produced) = self.decoder.flush(&mut self.window[self.window_len..])?;
                    self.window_len += produced;
                    self.state = State::Done;
                    return Ok(());
                }
                self.staged_pos = 0;
                self.staged_len = count;
            }

            let (done, consumed, produced) = self.decoder.decode(
                &self.staging[self.staged_pos..self.staged_len],
                &mut self.window[self.window_len..],
            )?;
            self.staged_pos += consumed;
            self.window_len += produced;

            if done {
                self.state = State::Done;
                return Ok(());
            }
            if self.window_len == self.window.len() {
                return Ok(());
            }
        }
    }

    fn failure(&self) -> Error {
        match &self.state {
            State::Failed { kind, message } => Error::new(*kind, message.clone()),
            _ => Error::new(ErrorKind::Other, "stream is not in a failed state"),
        }
    }
}

impl<S: ChunkSource> BufRead for SwfReader<S> {
    fn fill_buf(&mut self) -> Result<&[u8]> {
        if let State::Failed { .. } = self.state {
            return Err(self.failure());
        }
        if self.window_pos == self.window_len {
            let step = match self.state {
                State::Header => self.read_header(),
                State::Streaming => self.refill_window(),
                State::Done => Ok(()),
                State::Failed { .. } => Err(self.failure()),
            };
            if let Err(err) = step {
                warn!("stream failed: {}", err);
                self.state = State::Failed {
                    kind: err.kind(),
                    message: err.to_string(),
                };
                return Err(err);
            }
        }
        Ok(&self.window[self.window_pos..self.window_len])
    }

    fn consume(&mut self, amt: usize) {
        self.window_pos = min(self.window_pos + amt, self.window_len);
    }
}

impl<S: ChunkSource> Read for SwfReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let available = self.fill_buf()?;
        let len = min(buf.len(), available.len());
        buf[..len].copy_from_slice(&available[..len]);
        self.consume(len);
        Ok(len)
    }
}

/// Only the current-position query is supported; the stream is forward-only.
impl<S: ChunkSource> Seek for SwfReader<S> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match pos {
            SeekFrom::Current(0) => Ok(self.position()),
            _ => Err(Error::new(
                ErrorKind::Unsupported,
                "SWF streams are forward-only; only SeekFrom::Current(0) is supported",
            )),
        }
    }
}
