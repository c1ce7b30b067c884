//! Streaming reader for the SWF container format.
//!
//! An SWF stream opens with an 8-byte signature stored in the clear: an `F`
//! (raw) or `C` (zlib-compressed) marker, the `WS` magic, a version byte and
//! the declared uncompressed length. Everything after those 8 bytes is either
//! passed through or inflated on demand. This crate decodes such streams
//! lazily, one 4 KiB window at a time, without ever materializing the whole
//! payload in memory.
//!
//! Two building blocks:
//!
//! - [`byte_channel`]: a bounded single-producer/single-consumer byte channel
//!   for handing bytes from an ingestion thread (a network download, say) to
//!   the decoding thread. Writes block while the ring is full, reads block
//!   while it is empty, and bytes come out in exactly the order they went in.
//! - [`SwfReader`]: a pull-based decompression adapter over any
//!   [`ChunkSource`] — a file, an in-memory buffer, or the consumer half of a
//!   byte channel — exposing the container's logical bytes through
//!   [`std::io::Read`] and [`std::io::BufRead`].
//!
//! Decoding a container held in memory:
//!
//! ```
//! use std::io::Read;
//! use swf_stream::{MemorySource, SwfReader};
//!
//! # fn main() -> std::io::Result<()> {
//! let container = b"FWS\x06\x0c\x00\x00\x00abcd";
//! let mut reader = SwfReader::new(MemorySource::new(&container[..]));
//!
//! let mut contents = Vec::new();
//! reader.read_to_end(&mut contents)?;
//! assert_eq!(&contents[8..], b"abcd");
//! assert_eq!(reader.position(), container.len() as u64);
//! # Ok(())
//! # }
//! ```
//!
//! Malformed signatures and corrupt compressed data surface as
//! [`std::io::ErrorKind::InvalidData`] errors; a short source is not an error
//! but the natural end of the stream.

#![warn(missing_docs, rust_2018_idioms)]

mod channel;
mod codec;
mod reader;
mod signature;
mod source;

pub use crate::channel::{byte_channel, ChannelReader, ChannelWriter};
pub use crate::reader::SwfReader;
pub use crate::signature::{Compression, Signature};
pub use crate::source::{ChunkSource, FileSource, MemorySource};
