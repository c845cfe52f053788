use std::io::{self, Read};

use memchr::memchr;
use tracing::debug;

/// Refillable window over a byte source.
///
/// Holds the unconsumed bytes `buf[start..end]`. Offsets handed out by
/// [`data`](Self::data), [`ensure_bytes`](Self::ensure_bytes) and
/// [`ensure_line`](Self::ensure_line) are relative to the cursor and stay
/// valid across refills until [`consume`](Self::consume) is called.
pub struct ChunkBuffer<R> {
    reader: R,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    eof: bool,
    position: u64,
}

impl<R: Read> ChunkBuffer<R> {
    pub fn new(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: vec![0; capacity.max(1)],
            start: 0,
            end: 0,
            eof: false,
            position: 0,
        }
    }

    /// Unconsumed bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// True once the source returned end-of-stream.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Absolute stream offset of the cursor.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Advances the cursor by `n` bytes.
    #[inline]
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len());
        let n = n.min(self.len());
        self.start += n;
        self.position += n as u64;
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
    }

    /// Reads once from the source into the free tail, making room first.
    /// Returns the number of bytes read; 0 means end-of-stream.
    pub fn fill(&mut self) -> io::Result<usize> {
        if self.eof {
            return Ok(0);
        }
        self.make_room();
        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(0);
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn make_room(&mut self) {
        let capacity = self.buf.len();
        if self.start > 0 && (self.end == capacity || self.start >= capacity / 2) {
            debug!(moved = self.len(), capacity, "compacting FASTQ buffer");
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.end == capacity {
            let new_capacity = capacity * 2;
            debug!(from = capacity, to = new_capacity, "growing FASTQ buffer");
            self.buf.resize(new_capacity, 0);
        }
    }

    /// Refills until at least `n` unconsumed bytes are buffered.
    /// Returns `false` if the stream ended first.
    pub fn ensure_bytes(&mut self, n: usize) -> io::Result<bool> {
        while self.len() < n {
            if self.fill()? == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Refills until a `\n` exists at or after relative offset `from`.
    /// Returns its relative offset, or `None` if the stream ended first.
    pub fn ensure_line(&mut self, from: usize) -> io::Result<Option<usize>> {
        let mut searched = from.min(self.len());
        loop {
            if let Some(i) = memchr(b'\n', &self.data()[searched..]) {
                return Ok(Some(searched + i));
            }
            searched = self.len();
            if self.fill()? == 0 {
                return Ok(None);
            }
        }
    }

    /// Returns the underlying reader. Buffered bytes are dropped.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
