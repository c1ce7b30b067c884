//! Bounded single-producer/single-consumer byte channel.
//!
//! A fixed-capacity circular byte store shared between exactly one producer
//! and one consumer thread. The producer side blocks while the ring is full,
//! the consumer side blocks while it is empty; bytes come out in exactly the
//! order they went in.
//!
//! End-of-stream is explicit: [`ChannelWriter::close`] (also run on drop)
//! marks the channel closed, and a reader that has drained a closed channel
//! observes a zero-length read instead of blocking forever. Dropping the
//! reader releases a blocked writer with [`ErrorKind::BrokenPipe`].

use core::cmp::min;
use std::io::{Error, ErrorKind, Read, Result, Write};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use log::debug;

/// Creates a channel able to hold `capacity` bytes.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn byte_channel(capacity: usize) -> (ChannelWriter, ChannelReader) {
    assert!(capacity > 0, "byte channel capacity must be > 0");
    let shared = Arc::new(Shared {
        // One slot is kept permanently empty so that `head == tail` always
        // means empty and never full.
        ring: Mutex::new(Ring {
            storage: vec![0; capacity + 1].into_boxed_slice(),
            head: 0,
            tail: 0,
            write_closed: false,
            read_closed: false,
        }),
        not_full: Condvar::new(),
        ready: Condvar::new(),
    });
    (
        ChannelWriter {
            shared: shared.clone(),
        },
        ChannelReader { shared },
    )
}

struct Ring {
    storage: Box<[u8]>,
    head: usize,
    tail: usize,
    write_closed: bool,
    read_closed: bool,
}

impl Ring {
    fn occupied(&self) -> usize {
        let cap = self.storage.len();
        (self.tail + cap - self.head) % cap
    }

    fn free(&self) -> usize {
        self.storage.len() - 1 - self.occupied()
    }
}

struct Shared {
    ring: Mutex<Ring>,
    not_full: Condvar,
    ready: Condvar,
}

impl Shared {
    // The ring indices are only ever mutated after the copy they describe has
    // completed, so a poisoned lock still guards a consistent ring.
    fn lock(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Producer half of a [`byte_channel`].
pub struct ChannelWriter {
    shared: Arc<Shared>,
}

impl ChannelWriter {
    /// Writes the prefix of `buf` that fits, blocking first if the channel is
    /// full, and returns the number of bytes written.
    ///
    /// A return value smaller than `buf.len()` means the ring filled up; the
    /// caller retries with the remainder. Fails with
    /// [`ErrorKind::BrokenPipe`] if the reader has been dropped.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut ring = self.shared.lock();
        loop {
            if ring.read_closed {
                return Err(Error::new(
                    ErrorKind::BrokenPipe,
                    "byte channel reader was dropped",
                ));
            }
            if ring.free() > 0 {
                break;
            }
            ring = self
                .shared
                .not_full
                .wait(ring)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let was_empty = ring.occupied() == 0;
        let len = min(buf.len(), ring.free());
        let cap = ring.storage.len();
        let tail = ring.tail;
        if tail + len > cap {
            let first = cap - tail;
            ring.storage[tail..].copy_from_slice(&buf[..first]);
            ring.storage[..len - first].copy_from_slice(&buf[first..len]);
        } else {
            ring.storage[tail..tail + len].copy_from_slice(&buf[..len]);
        }
        ring.tail = (tail + len) % cap;

        if was_empty {
            self.shared.ready.notify_one();
        }
        Ok(len)
    }

    /// Marks the channel closed. The reader drains what is buffered and then
    /// observes zero-length reads.
    pub fn close(&mut self) {
        let mut ring = self.shared.lock();
        if !ring.write_closed {
            ring.write_closed = true;
            debug!("byte channel closed with {} byte(s) buffered", ring.occupied());
            self.shared.ready.notify_one();
        }
    }
}

impl Drop for ChannelWriter {
    fn drop(&mut self) {
        self.close();
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        ChannelWriter::write(self, buf)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Consumer half of a [`byte_channel`].
pub struct ChannelReader {
    shared: Arc<Shared>,
}

impl ChannelReader {
    /// Copies up to `buf.len()` buffered bytes out, blocking first if the
    /// channel is empty.
    ///
    /// Returns `Ok(0)` only once the writer has closed the channel and every
    /// buffered byte has been drained.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut ring = self.shared.lock();
        loop {
            if ring.occupied() > 0 {
                break;
            }
            if ring.write_closed {
                return Ok(0);
            }
            ring = self
                .shared
                .ready
                .wait(ring)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let was_full = ring.free() == 0;
        let len = min(buf.len(), ring.occupied());
        let cap = ring.storage.len();
        let head = ring.head;
        if head + len > cap {
            let first = cap - head;
            buf[..first].copy_from_slice(&ring.storage[head..]);
            buf[first..len].copy_from_slice(&ring.storage[..len - first]);
        } else {
            buf[..len].copy_from_slice(&ring.storage[head..head + len]);
        }
        ring.head = (head + len) % cap;

        if was_full {
            self.shared.not_full.notify_one();
        }
        Ok(len)
    }
}

impl Drop for ChannelReader {
    fn drop(&mut self) {
        let mut ring = self.shared.lock();
        ring.read_closed = true;
        self.shared.not_full.notify_one();
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        ChannelReader::read(self, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::byte_channel;

    #[test]
    fn wraparound_preserves_order() {
        let (mut tx, mut rx) = byte_channel(4);
        let mut out = [0u8; 4];

        assert_eq!(tx.write(&[1, 2, 3]).unwrap(), 3);
        assert_eq!(rx.read(&mut out[..2]).unwrap(), 2);
        assert_eq!(&out[..2], &[1, 2]);

        // Tail wraps past the end of storage here.
        assert_eq!(tx.write(&[4, 5, 6]).unwrap(), 3);
        assert_eq!(rx.read(&mut out).unwrap(), 4);
        assert_eq!(&out, &[3, 4, 5, 6]);
    }

    #[test]
    fn overfull_write_is_partial() {
        let (mut tx, mut rx) = byte_channel(4);
        assert_eq!(tx.write(&[9; 6]).unwrap(), 4);
        let mut out = [0u8; 6];
        assert_eq!(rx.read(&mut out).unwrap(), 4);
    }

    #[test]
    fn empty_write_does_not_block_on_full_ring() {
        let (mut tx, _rx) = byte_channel(2);
        assert_eq!(tx.write(&[1, 2]).unwrap(), 2);
        assert_eq!(tx.write(&[]).unwrap(), 0);
    }
}
