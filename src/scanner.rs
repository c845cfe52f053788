use std::io::Read;
use std::ops::Range;

use crate::buffer::ChunkBuffer;
use crate::error::{FormatError, ReaderError};

/// Half-open byte range relative to the start of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Self { begin, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }
}

/// Field boundaries of one record.
///
/// Sequence and quality hold one span per physical line; wrapped records
/// have several, the common case has exactly one. Line terminators are
/// never part of a span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSpan {
    pub name: Span,
    pub sequence: Vec<Span>,
    pub separator: Span,
    pub quality: Vec<Span>,
}

impl RecordSpan {
    fn clear(&mut self) {
        self.name = Span::default();
        self.sequence.clear();
        self.separator = Span::default();
        self.quality.clear();
    }

    /// Total sequence length, terminators excluded.
    pub fn sequence_len(&self) -> usize {
        self.sequence.iter().map(Span::len).sum()
    }

    pub fn quality_len(&self) -> usize {
        self.quality.iter().map(Span::len).sum()
    }
}

/// A line found in the buffer: content ends at `end` (terminator stripped),
/// the next line starts at `next`.
struct Line {
    end: usize,
    next: usize,
}

/// Finds the line starting at `from`. A final line without terminator ends
/// at end-of-stream. Returns `None` when nothing is left at `from`.
fn next_line<R: Read>(buf: &mut ChunkBuffer<R>, from: usize) -> Result<Option<Line>, ReaderError> {
    match buf.ensure_line(from)? {
        Some(nl) => {
            let end = if nl > from && buf.data()[nl - 1] == b'\r' { nl - 1 } else { nl };
            Ok(Some(Line { end, next: nl + 1 }))
        }
        None if from < buf.len() => {
            let len = buf.len();
            let end = if len > from && buf.data()[len - 1] == b'\r' { len - 1 } else { len };
            Ok(Some(Line { end, next: len }))
        }
        None => Ok(None),
    }
}

/// Locates the four fields of the next record in a [`ChunkBuffer`].
///
/// Sequence lines are collected until a line starting with `+`. Quality
/// lines are collected until their total length reaches the sequence
/// length; their content is never inspected, so `@` and `+` are valid
/// quality characters.
#[derive(Debug, Default)]
pub struct RecordScanner {
    spans: RecordSpan,
    check_separator: bool,
}

impl RecordScanner {
    pub fn new(check_separator: bool) -> Self {
        Self {
            spans: RecordSpan::default(),
            check_separator,
        }
    }

    /// Spans of the last record returned by [`scan`](Self::scan).
    #[inline]
    pub fn spans(&self) -> &RecordSpan {
        &self.spans
    }

    /// Scans the record at the buffer cursor.
    ///
    /// Blank lines before the header are consumed. On success the spans are
    /// relative to the cursor and the returned length covers the whole
    /// record including its last terminator; nothing of the record itself is
    /// consumed. Returns `Ok(None)` at a clean end-of-stream.
    pub fn scan<R: Read>(
        &mut self,
        buf: &mut ChunkBuffer<R>,
    ) -> Result<Option<usize>, ReaderError> {
        self.spans.clear();

        if !skip_blank_lines(buf)? {
            return Ok(None);
        }
        let record_start = buf.position();
        let first = buf.data()[0];
        if first != b'@' {
            return Err(ReaderError::format(
                FormatError::MissingHeader { found: first as char },
                record_start,
            ));
        }
        let fail = |kind| ReaderError::format(kind, record_start);

        // Name
        let line = match buf.ensure_line(1)? {
            Some(nl) => {
                let end = if nl > 1 && buf.data()[nl - 1] == b'\r' { nl - 1 } else { nl };
                Line { end, next: nl + 1 }
            }
            None => return Err(fail(FormatError::TruncatedRecord)),
        };
        self.spans.name = Span::new(1, line.end);
        let mut pos = line.next;

        // Sequence
        let mut seq_len = 0;
        loop {
            if !buf.ensure_bytes(pos + 1)? {
                return Err(fail(FormatError::MissingSeparator));
            }
            if buf.data()[pos] == b'+' {
                break;
            }
            let Some(line) = next_line(buf, pos)? else {
                return Err(fail(FormatError::MissingSeparator));
            };
            if line.end > pos {
                self.spans.sequence.push(Span::new(pos, line.end));
                seq_len += line.end - pos;
            }
            pos = line.next;
        }

        // Separator
        let line = match next_line(buf, pos)? {
            Some(line) => line,
            None => return Err(fail(FormatError::MissingSeparator)),
        };
        self.spans.separator = Span::new(pos + 1, line.end);
        pos = line.next;
        if self.check_separator && !self.spans.separator.is_empty() {
            let data = buf.data();
            if data[self.spans.separator.range()] != data[self.spans.name.range()] {
                return Err(fail(FormatError::SeparatorMismatch));
            }
        }

        // Quality: terminated by length only.
        if seq_len == 0 {
            if buf.ensure_bytes(pos + 1)? && matches!(buf.data()[pos], b'\n' | b'\r') {
                if let Some(line) = next_line(buf, pos)? {
                    if line.end == pos {
                        pos = line.next;
                    }
                }
            }
        }
        let mut qual_len = 0;
        while qual_len < seq_len {
            let Some(line) = next_line(buf, pos)? else {
                return Err(fail(FormatError::TruncatedRecord));
            };
            let found = qual_len + (line.end - pos);
            if found > seq_len {
                return Err(fail(FormatError::QualityLengthMismatch {
                    expected: seq_len,
                    found,
                }));
            }
            if line.end > pos {
                self.spans.quality.push(Span::new(pos, line.end));
            }
            qual_len = found;
            pos = line.next;
        }

        tracing::trace!(position = record_start, len = pos, seq_len, "scanned FASTQ record");
        Ok(Some(pos))
    }
}

/// Consumes empty `\n` and `\r\n` lines at the cursor. Returns `false` if
/// the stream ends before any other byte. A bare `\r` is left in place.
fn skip_blank_lines<R: Read>(buf: &mut ChunkBuffer<R>) -> Result<bool, ReaderError> {
    loop {
        if !buf.ensure_bytes(1)? {
            return Ok(false);
        }
        let first = buf.data()[0];
        match first {
            b'\n' => buf.consume(1),
            b'\r' if buf.ensure_bytes(2)? && buf.data()[1] == b'\n' => buf.consume(2),
            _ => return Ok(true),
        }
    }
}
