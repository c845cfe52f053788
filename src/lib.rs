//! Buffered FASTQ reader that locates record boundaries without copying.
//!
//! ```
//! use fastq_spans::FastqReader;
//!
//! let data = b"@r1\nACGT\n+\n!!!!\n@r2\nTT\nTT\n+\n##\n##\n";
//! let mut reader = FastqReader::new(&data[..]);
//! while let Some(record) = reader.next_raw() {
//!     let record = record?;
//!     assert_eq!(record.sequence().len(), record.quality().len());
//! }
//! # Ok::<(), fastq_spans::ReaderError>(())
//! ```

mod buffer;
mod config;
mod error;
mod fastq;
mod record;
mod scanner;

pub use buffer::ChunkBuffer;
pub use config::{DEFAULT_BUFFER_SIZE, ReaderConfig};
pub use error::{FormatError, ReaderError};
pub use fastq::{FastqReader, MapRecords, Positions};
pub use record::{RawRecord, Record, RecordFactory, RecordPositions};
pub use scanner::{RecordScanner, RecordSpan, Span};
