use std::io::Read;
use std::iter::FusedIterator;

use crate::buffer::ChunkBuffer;
use crate::config::{DEFAULT_BUFFER_SIZE, ReaderConfig};
use crate::error::ReaderError;
use crate::record::{RawRecord, Record, RecordFactory, RecordPositions};
use crate::scanner::RecordScanner;

/// Zero-copy streaming FASTQ parser.
///
/// Iterating yields owned [`Record`]s. [`next_raw`](Self::next_raw) yields
/// borrowed [`RawRecord`]s instead, [`map_records`](Self::map_records) runs a
/// [`RecordFactory`] per record and [`positions`](Self::positions) yields
/// stream offsets only.
///
/// Records are read strictly in order and the source is only read as far as
/// needed to find the end of the current record. After an error or the end
/// of the stream every call returns `None`.
pub struct FastqReader<R> {
    buffer: ChunkBuffer<R>,
    scanner: RecordScanner,
    pending_consume: usize,
    records: u64,
    done: bool,
}

impl<R: Read> FastqReader<R> {
    /// Creates a reader with default 64 KiB buffer.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, reader)
    }

    /// Creates a reader with specified buffer capacity.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self::with_config(ReaderConfig::new().buffer_size(capacity), reader)
    }

    pub fn with_config(config: ReaderConfig, reader: R) -> Self {
        Self {
            buffer: ChunkBuffer::new(reader, config.buffer_size),
            scanner: RecordScanner::new(config.check_separator),
            pending_consume: 0,
            records: 0,
            done: false,
        }
    }

    /// Returns the next record as a view into the read buffer, or `None` at EOF.
    pub fn next_raw(&mut self) -> Option<Result<RawRecord<'_>, ReaderError>> {
        if self.pending_consume > 0 {
            self.buffer.consume(self.pending_consume);
            self.pending_consume = 0;
        }
        if self.done {
            return None;
        }

        match self.scanner.scan(&mut self.buffer) {
            Ok(Some(len)) => {
                self.pending_consume = len;
                self.records += 1;
                let offset = self.buffer.position();
                Some(Ok(RawRecord::new(
                    &self.buffer.data()[..len],
                    self.scanner.spans(),
                    offset,
                )))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    /// Yields `factory`'s output for each record instead of a [`Record`].
    pub fn map_records<F: RecordFactory>(self, factory: F) -> MapRecords<R, F> {
        MapRecords {
            reader: self,
            factory,
        }
    }

    /// Yields the stream offsets of each record's fields.
    pub fn positions(self) -> Positions<R> {
        Positions { reader: self }
    }

    /// Stream offset up to which input has been parsed.
    pub fn position(&self) -> u64 {
        self.buffer.position() + self.pending_consume as u64
    }

    /// Number of records returned so far.
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Returns the underlying reader. Buffered bytes are dropped.
    pub fn into_inner(self) -> R {
        self.buffer.into_inner()
    }
}

impl<R: Read> Iterator for FastqReader<R> {
    type Item = Result<Record, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_raw().map(|r| r.map(|raw| raw.to_record()))
    }
}

impl<R: Read> FusedIterator for FastqReader<R> {}

/// Iterator returned by [`FastqReader::map_records`].
pub struct MapRecords<R, F> {
    reader: FastqReader<R>,
    factory: F,
}

impl<R: Read, F: RecordFactory> Iterator for MapRecords<R, F> {
    type Item = Result<F::Output, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let factory = &mut self.factory;
        self.reader.next_raw().map(|r| r.map(|raw| raw.build(factory)))
    }
}

impl<R: Read, F: RecordFactory> FusedIterator for MapRecords<R, F> {}

/// Iterator returned by [`FastqReader::positions`].
pub struct Positions<R> {
    reader: FastqReader<R>,
}

impl<R: Read> Iterator for Positions<R> {
    type Item = Result<RecordPositions, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_raw().map(|r| r.map(|raw| raw.positions()))
    }
}

impl<R: Read> FusedIterator for Positions<R> {}
