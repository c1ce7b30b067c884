#![allow(unused)] // Different tests use a different subset of functions

use std::cmp::min;
use std::io::{self, Read, Write};

use proptest_derive::Arbitrary;
use swf_stream::ChunkSource;

/// Compresses `input` into a bare zlib stream with flate2.
pub fn zlib_compress(input: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(input).unwrap();
    encoder.finish().unwrap()
}

fn signature(marker: u8, body_len: usize) -> Vec<u8> {
    let declared = (body_len + 8) as u32;
    let mut out = vec![marker, b'W', b'S', 6];
    out.extend_from_slice(&declared.to_le_bytes());
    out
}

/// Builds an uncompressed `FWS` container around `body`.
pub fn raw_container(body: &[u8]) -> Vec<u8> {
    let mut out = signature(b'F', body.len());
    out.extend_from_slice(body);
    out
}

/// Builds a compressed `CWS` container whose body inflates to `plaintext`.
pub fn zlib_container(plaintext: &[u8]) -> Vec<u8> {
    let mut out = signature(b'C', plaintext.len());
    out.extend_from_slice(&zlib_compress(plaintext));
    out
}

/// The bytes a fully decoded container should yield: the 8 signature bytes in
/// the clear followed by the plaintext body.
pub fn decoded_container(plaintext: &[u8]) -> Vec<u8> {
    let mut out = signature(b'C', plaintext.len());
    out.extend_from_slice(plaintext);
    out
}

pub fn read_to_vec(mut read: impl Read) -> Vec<u8> {
    let mut output = vec![];
    read.read_to_end(&mut output).unwrap();
    output
}

/// Caps every delivery of the inner source at `chunk` bytes, so decoder loops
/// see arbitrary chunk boundaries.
pub struct ChunkedSource<S> {
    inner: S,
    chunk: usize,
}

impl<S> ChunkedSource<S> {
    pub fn new(inner: S, chunk: usize) -> Self {
        assert!(chunk > 0);
        Self { inner, chunk }
    }
}

impl<S: ChunkSource> ChunkSource for ChunkedSource<S> {
    fn provide(&mut self, staging: &mut [u8]) -> io::Result<usize> {
        let limit = min(self.chunk, staging.len());
        self.inner.provide(&mut staging[..limit])
    }
}

/// Counts deliveries, to observe whether a failed reader keeps pulling.
pub struct CountingSource<S> {
    inner: S,
    pub provides: usize,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, provides: 0 }
    }
}

impl<S: ChunkSource> ChunkSource for CountingSource<S> {
    fn provide(&mut self, staging: &mut [u8]) -> io::Result<usize> {
        self.provides += 1;
        self.inner.provide(staging)
    }
}

#[derive(Arbitrary, Debug)]
pub struct InputStream(Vec<Vec<u8>>);

impl InputStream {
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.0
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.0.iter().flatten().cloned().collect()
    }
}

impl From<Vec<Vec<u8>>> for InputStream {
    fn from(input: Vec<Vec<u8>>) -> InputStream {
        InputStream(input)
    }
}
