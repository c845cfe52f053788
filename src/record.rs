use std::borrow::Cow;
use std::ops::Range;

use crate::scanner::{RecordSpan, Span};

/// Builds the value yielded for each record from its name, sequence and
/// quality bytes.
///
/// Implemented for every `FnMut(&[u8], &[u8], &[u8]) -> T`, so a closure is
/// usually all that is needed.
pub trait RecordFactory {
    type Output;

    fn build(&mut self, name: &[u8], sequence: &[u8], quality: &[u8]) -> Self::Output;
}

impl<F, T> RecordFactory for F
where
    F: FnMut(&[u8], &[u8], &[u8]) -> T,
{
    type Output = T;

    #[inline]
    fn build(&mut self, name: &[u8], sequence: &[u8], quality: &[u8]) -> T {
        self(name, sequence, quality)
    }
}

/// Owned FASTQ record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
}

impl Record {
    /// Quality scores with `offset` subtracted (33 for Sanger/Illumina 1.8+).
    pub fn phred_scores(&self, offset: u8) -> Vec<u8> {
        phred(&self.quality, offset)
    }
}

fn phred(quality: &[u8], offset: u8) -> Vec<u8> {
    quality.iter().map(|q| q.saturating_sub(offset)).collect()
}

/// Absolute stream offsets of one record, terminators excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPositions {
    /// From the `@` up to and including the last terminator.
    pub record: Range<u64>,
    pub name: Range<u64>,
    pub sequence: Vec<Range<u64>>,
    pub separator: Range<u64>,
    pub quality: Vec<Range<u64>>,
}

/// Borrowed view of a scanned record.
///
/// Valid until the reader is advanced. Single-line fields are returned
/// without copying; wrapped fields are joined on request.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    data: &'a [u8],
    spans: &'a RecordSpan,
    offset: u64,
}

impl<'a> RawRecord<'a> {
    pub(crate) fn new(data: &'a [u8], spans: &'a RecordSpan, offset: u64) -> Self {
        Self { data, spans, offset }
    }

    #[inline]
    fn slice(&self, span: Span) -> &'a [u8] {
        &self.data[span.range()]
    }

    fn join(&self, spans: &[Span]) -> Cow<'a, [u8]> {
        match spans {
            [] => Cow::Borrowed(&[]),
            [one] => Cow::Borrowed(self.slice(*one)),
            many => {
                let mut out = Vec::with_capacity(many.iter().map(Span::len).sum());
                for span in many {
                    out.extend_from_slice(self.slice(*span));
                }
                Cow::Owned(out)
            }
        }
    }

    /// Header line without `@` and terminator.
    #[inline]
    pub fn name(&self) -> &'a [u8] {
        self.slice(self.spans.name)
    }

    /// Whatever followed the `+`, usually empty.
    #[inline]
    pub fn separator(&self) -> &'a [u8] {
        self.slice(self.spans.separator)
    }

    pub fn sequence(&self) -> Cow<'a, [u8]> {
        self.join(&self.spans.sequence)
    }

    pub fn quality(&self) -> Cow<'a, [u8]> {
        self.join(&self.spans.quality)
    }

    /// Physical sequence lines, in order.
    pub fn sequence_lines(self) -> impl Iterator<Item = &'a [u8]> {
        let data = self.data;
        self.spans.sequence.iter().map(move |s| &data[s.range()])
    }

    /// Physical quality lines, in order.
    pub fn quality_lines(self) -> impl Iterator<Item = &'a [u8]> {
        let data = self.data;
        self.spans.quality.iter().map(move |s| &data[s.range()])
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.spans.sequence_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if sequence or quality is wrapped over several lines.
    pub fn is_multiline(&self) -> bool {
        self.spans.sequence.len() > 1 || self.spans.quality.len() > 1
    }

    /// Spans relative to [`raw`](Self::raw).
    #[inline]
    pub fn spans(&self) -> &'a RecordSpan {
        self.spans
    }

    /// The record bytes as they appear in the stream.
    #[inline]
    pub fn raw(&self) -> &'a [u8] {
        self.data
    }

    /// Stream offset of the `@`.
    #[inline]
    pub fn stream_offset(&self) -> u64 {
        self.offset
    }

    pub fn positions(&self) -> RecordPositions {
        let abs = |s: &Span| self.offset + s.begin as u64..self.offset + s.end as u64;
        RecordPositions {
            record: self.offset..self.offset + self.data.len() as u64,
            name: abs(&self.spans.name),
            sequence: self.spans.sequence.iter().map(abs).collect(),
            separator: abs(&self.spans.separator),
            quality: self.spans.quality.iter().map(abs).collect(),
        }
    }

    pub fn phred_scores(&self, offset: u8) -> Vec<u8> {
        phred(&self.quality(), offset)
    }

    /// Hands the three fields to `factory`.
    pub fn build<F: RecordFactory + ?Sized>(&self, factory: &mut F) -> F::Output {
        factory.build(self.name(), &self.sequence(), &self.quality())
    }

    pub fn to_record(&self) -> Record {
        Record {
            name: String::from_utf8_lossy(self.name()).into_owned(),
            sequence: self.sequence().into_owned(),
            quality: self.quality().into_owned(),
        }
    }
}
