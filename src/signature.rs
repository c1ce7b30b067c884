//! The fixed 8-byte container signature.
//!
//! Every SWF stream starts with 8 bytes stored in the clear even when the
//! rest of the file is compressed: a compression marker, the `WS` magic, the
//! format version, and the declared total uncompressed length.

use std::io::{Error, ErrorKind, Result};

/// How the container body after the signature is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// `F` marker, body stored verbatim.
    None,
    /// `C` marker, body is a zlib stream.
    Zlib,
}

/// Parsed view of the leading 8 bytes of a stream.
#[derive(Debug, Clone)]
pub struct Signature {
    compression: Compression,
    raw: [u8; 8],
}

impl Signature {
    /// Length of the on-wire signature in bytes.
    pub const LEN: usize = 8;

    /// Validates the signature bytes.
    ///
    /// Fails with [`ErrorKind::InvalidData`] when the magic is not `WS` or
    /// the compression marker is unrecognized.
    pub fn parse(raw: [u8; 8]) -> Result<Self> {
        if raw[1] != b'W' || raw[2] != b'S' {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("bad container magic {:02x}{:02x}", raw[1], raw[2]),
            ));
        }
        let compression = match raw[0] {
            b'F' => Compression::None,
            b'C' => Compression::Zlib,
            other => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("unrecognized compression marker {:02x}", other),
                ))
            }
        };
        Ok(Self { compression, raw })
    }

    /// How the body after the signature is encoded.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Format version byte.
    pub fn version(&self) -> u8 {
        self.raw[3]
    }

    /// Total uncompressed length declared in the header, signature included.
    pub fn file_length(&self) -> u32 {
        u32::from_le_bytes([self.raw[4], self.raw[5], self.raw[6], self.raw[7]])
    }

    /// The signature exactly as it appeared on the wire.
    pub fn raw_bytes(&self) -> &[u8; 8] {
        &self.raw
    }
}
