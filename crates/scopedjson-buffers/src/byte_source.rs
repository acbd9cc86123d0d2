//! Byte source abstraction shared by the JSON and UBJSON tokenizers.
//!
//! A byte source is the one external collaborator a tokenizer talks to: it
//! hides whether bytes come from an in-memory buffer or a chunked stream.
//! Two implementations are provided: [`MemoryByteSource`] over an owned
//! buffer, and [`StreamByteSource`] over anything implementing
//! [`std::io::Read`], backed by a refillable buffer (default 64 KiB).

use std::io::Read;

use crate::endian::swap_units;

/// Errors a [`ByteSource`] can report. These are I/O-level failures, not
/// format errors — format errors are the tokenizer's concern.
#[derive(Debug)]
pub enum ByteSourceError {
    Io(std::io::Error),
}

impl std::fmt::Display for ByteSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteSourceError::Io(e) => write!(f, "byte source I/O error: {e}"),
        }
    }
}

impl std::error::Error for ByteSourceError {}

/// Common contract implemented by every byte source.
///
/// `read` and `read_into` treat `unit_size > 1` as a request to byte-swap
/// each `unit_size`-byte unit of the just-read span from big-endian to
/// host-native order — this is how UBJSON's big-endian numerics become
/// host-native without every caller repeating the swap logic.
pub trait ByteSource {
    /// Looks at the next byte without advancing. `false` at end of input.
    fn peek(&mut self, out: &mut u8) -> bool;

    /// Reads `size` bytes into the source's internal span, swapping
    /// `unit_size`-byte units in place. Use [`ByteSource::data`] to recover
    /// the span. Returns `false` if fewer than `size` bytes are available.
    fn read(&mut self, size: usize, unit_size: usize) -> bool;

    /// Reads `size` bytes directly into `buf`, applying the same endian
    /// swap as [`ByteSource::read`].
    fn read_into(&mut self, buf: &mut [u8], size: usize, unit_size: usize) -> bool;

    /// Advances the cursor by `size` bytes without copying them out.
    fn advance(&mut self, size: usize) -> bool;

    /// The span populated by the most recent successful `read` call.
    fn data(&self) -> &[u8];

    /// Total number of bytes currently buffered (not the whole stream).
    fn size(&self) -> usize;

    /// Cursor position relative to the start of the source.
    fn position(&self) -> usize;

    /// The next unread byte, or `0` at end of input.
    fn front(&self) -> u8;
}

/// In-memory byte source: a buffer plus a cursor.
pub struct MemoryByteSource {
    buf: Vec<u8>,
    x: usize,
    last_span: Vec<u8>,
}

impl MemoryByteSource {
    pub fn new(buf: Vec<u8>) -> Self {
        Self {
            buf,
            x: 0,
            last_span: Vec::new(),
        }
    }

    pub fn from_slice(buf: &[u8]) -> Self {
        Self::new(buf.to_vec())
    }
}

impl ByteSource for MemoryByteSource {
    fn peek(&mut self, out: &mut u8) -> bool {
        match self.buf.get(self.x) {
            Some(&b) => {
                *out = b;
                true
            }
            None => false,
        }
    }

    fn read(&mut self, size: usize, unit_size: usize) -> bool {
        if self.x + size > self.buf.len() {
            return false;
        }
        self.last_span.clear();
        self.last_span.extend_from_slice(&self.buf[self.x..self.x + size]);
        swap_units(&mut self.last_span, unit_size);
        self.x += size;
        true
    }

    fn read_into(&mut self, out: &mut [u8], size: usize, unit_size: usize) -> bool {
        if self.x + size > self.buf.len() || out.len() < size {
            return false;
        }
        out[..size].copy_from_slice(&self.buf[self.x..self.x + size]);
        swap_units(&mut out[..size], unit_size);
        self.x += size;
        true
    }

    fn advance(&mut self, size: usize) -> bool {
        if self.x + size > self.buf.len() {
            return false;
        }
        self.x += size;
        true
    }

    fn data(&self) -> &[u8] {
        &self.last_span
    }

    fn size(&self) -> usize {
        self.buf.len() - self.x
    }

    fn position(&self) -> usize {
        self.x
    }

    fn front(&self) -> u8 {
        self.buf.get(self.x).copied().unwrap_or(0)
    }
}

/// Default refill size for [`StreamByteSource`]: 64 KiB.
pub const DEFAULT_STREAM_BUFFER_SIZE: usize = 64 * 1024;

/// Stream-backed byte source: an underlying `Read` plus a refillable buffer.
///
/// The buffer is compacted (unread tail moved to the front) rather than
/// grown without bound, so long-running readers over large streams hold a
/// roughly constant amount of memory.
pub struct StreamByteSource<R: Read> {
    inner: R,
    buf: Vec<u8>,
    x: usize,
    filled: usize,
    refill_size: usize,
    position: usize,
    last_span: Vec<u8>,
    eof: bool,
}

impl<R: Read> StreamByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_buffer_size(inner, DEFAULT_STREAM_BUFFER_SIZE)
    }

    pub fn with_buffer_size(inner: R, refill_size: usize) -> Self {
        Self {
            inner,
            buf: vec![0u8; refill_size],
            x: 0,
            filled: 0,
            refill_size,
            position: 0,
            last_span: Vec::new(),
            eof: false,
        }
    }

    fn available(&self) -> usize {
        self.filled - self.x
    }

    /// Ensures at least `need` bytes are buffered, refilling/compacting as
    /// necessary. Returns `false` if the stream cannot supply `need` bytes.
    fn ensure(&mut self, need: usize) -> Result<bool, ByteSourceError> {
        while self.available() < need && !self.eof {
            if self.x > 0 {
                self.buf.copy_within(self.x..self.filled, 0);
                self.filled -= self.x;
                self.x = 0;
            }
            if self.filled + need > self.buf.len() {
                self.buf.resize(self.filled + need.max(self.refill_size), 0);
            }
            let n = self
                .inner
                .read(&mut self.buf[self.filled..])
                .map_err(ByteSourceError::Io)?;
            if n == 0 {
                self.eof = true;
            } else {
                self.filled += n;
            }
        }
        Ok(self.available() >= need)
    }
}

impl<R: Read> ByteSource for StreamByteSource<R> {
    fn peek(&mut self, out: &mut u8) -> bool {
        if self.ensure(1).unwrap_or(false) {
            *out = self.buf[self.x];
            true
        } else {
            false
        }
    }

    fn read(&mut self, size: usize, unit_size: usize) -> bool {
        if !self.ensure(size).unwrap_or(false) {
            return false;
        }
        self.last_span.clear();
        self.last_span.extend_from_slice(&self.buf[self.x..self.x + size]);
        swap_units(&mut self.last_span, unit_size);
        self.x += size;
        self.position += size;
        true
    }

    fn read_into(&mut self, out: &mut [u8], size: usize, unit_size: usize) -> bool {
        if !self.ensure(size).unwrap_or(false) || out.len() < size {
            return false;
        }
        out[..size].copy_from_slice(&self.buf[self.x..self.x + size]);
        swap_units(&mut out[..size], unit_size);
        self.x += size;
        self.position += size;
        true
    }

    fn advance(&mut self, size: usize) -> bool {
        if !self.ensure(size).unwrap_or(false) {
            return false;
        }
        self.x += size;
        self.position += size;
        true
    }

    fn data(&self) -> &[u8] {
        &self.last_span
    }

    fn size(&self) -> usize {
        self.available()
    }

    fn position(&self) -> usize {
        self.position
    }

    fn front(&self) -> u8 {
        if self.available() > 0 {
            self.buf[self.x]
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_peek_and_read() {
        let mut src = MemoryByteSource::from_slice(&[1, 2, 3, 4]);
        let mut b = 0u8;
        assert!(src.peek(&mut b));
        assert_eq!(b, 1);
        assert!(src.read(2, 1));
        assert_eq!(src.data(), &[1, 2]);
        assert_eq!(src.position(), 2);
    }

    #[test]
    fn memory_source_exhausted() {
        let mut src = MemoryByteSource::from_slice(&[1]);
        assert!(!src.read(5, 1));
    }

    #[test]
    fn stream_source_refills_across_chunks() {
        let data = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut src = StreamByteSource::with_buffer_size(&data[..], 3);
        assert!(src.read(4, 1));
        assert_eq!(src.data(), &[1, 2, 3, 4]);
        assert!(src.read(4, 1));
        assert_eq!(src.data(), &[5, 6, 7, 8]);
        assert!(!src.read(1, 1));
    }

    #[test]
    fn stream_source_endian_swap_u32() {
        let data = vec![0x00u8, 0x00, 0x01, 0x02];
        let mut src = StreamByteSource::new(&data[..]);
        assert!(src.read(4, 4));
        let be = u32::from_be_bytes([0x00, 0x00, 0x01, 0x02]);
        assert_eq!(u32::from_ne_bytes(src.data().try_into().unwrap()), be);
    }
}
