use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use fastq_spans::{FastqReader, FormatError, ReaderConfig, Record};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

const TEST_DATA_DIR: &str = "tests/test_data";

fn fastq_dir() -> std::path::PathBuf {
    Path::new(TEST_DATA_DIR).join("fastq")
}

fn open(name: &str) -> File {
    let path = fastq_dir().join(name);
    if !path.exists() {
        panic!("File not found: {}", path.display());
    }
    File::open(&path).unwrap()
}

fn count_fastq_stats<R: Read>(mut reader: FastqReader<R>) -> (usize, usize, usize, Vec<String>) {
    let mut record_count = 0;
    let mut total_seq_len = 0;
    let mut total_qual_len = 0;
    let mut record_ids = Vec::new();

    while let Some(record) = reader.next_raw() {
        let record = record.expect("Failed to parse FASTQ");
        record_count += 1;
        total_seq_len += record.sequence().len();
        total_qual_len += record.quality().len();
        record_ids.push(String::from_utf8_lossy(record.name()).to_string());
    }

    (record_count, total_seq_len, total_qual_len, record_ids)
}

/// Hands out at most `chunk` bytes per read and counts what it handed out.
struct ChunkedReader<'a> {
    data: &'a [u8],
    chunk: usize,
    served: usize,
}

impl<'a> ChunkedReader<'a> {
    fn new(data: &'a [u8], chunk: usize) -> Self {
        Self { data, chunk, served: 0 }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(out.len()).min(self.data.len());
        out[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        self.served += n;
        Ok(n)
    }
}

fn collect(reader: impl Iterator<Item = Result<Record, fastq_spans::ReaderError>>) -> Vec<Record> {
    reader.collect::<Result<_, _>>().unwrap()
}

#[test]
fn test_fastq_sample_lf() {
    let (record_count, total_seq_len, total_qual_len, record_ids) =
        count_fastq_stats(FastqReader::new(open("sample.fastq")));

    assert_eq!(record_count, 5);
    assert_eq!(total_seq_len, 252);
    assert_eq!(total_seq_len, total_qual_len);
    assert!(record_ids[0].starts_with("read1"));
    assert!(record_ids[4].starts_with("read5"));
}

#[test]
fn test_fastq_sample_gzip() {
    let mut raw = Vec::new();
    open("sample.fastq").read_to_end(&mut raw).unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    let compressed = encoder.finish().unwrap();

    let decoder = GzDecoder::new(&compressed[..]);
    let gz_stats = count_fastq_stats(FastqReader::new(decoder));
    let plain_stats = count_fastq_stats(FastqReader::new(&raw[..]));

    assert_eq!(gz_stats, plain_stats);
    assert_eq!(gz_stats.0, 5);
}

#[test]
fn test_fastq_lf_vs_crlf_consistency() {
    let lf = collect(FastqReader::new(open("sample.fastq")));
    let crlf = collect(FastqReader::new(open("sample_crlf.fastq")));

    assert_eq!(lf, crlf);
}

#[test]
fn test_fastq_multiline_matches_single_line() {
    let single = collect(FastqReader::new(open("sample.fastq")));
    let config = ReaderConfig::new().buffer_size(64).check_separator(true);
    let multi = collect(FastqReader::with_config(config, open("sample_multiline.fastq")));

    assert_eq!(single, multi);
    // Some wrapped quality lines start with '@' or '+'.
    assert!(multi.iter().any(|r| r.quality.contains(&b'@')));
}

#[test]
fn test_concrete_two_records() {
    let data = b"@r1\nACGT\n+\n!!!!\n@r2\nTTTT\n+\n####\n";
    let records = collect(FastqReader::new(&data[..]));

    let fields: Vec<_> = records
        .iter()
        .map(|r| (r.name.as_str(), &r.sequence[..], &r.quality[..]))
        .collect();
    assert_eq!(
        fields,
        vec![("r1", &b"ACGT"[..], &b"!!!!"[..]), ("r2", &b"TTTT"[..], &b"####"[..])]
    );
}

#[test]
fn test_wrapped_record_is_one_record() {
    let data = b"@r1\nACGT\nACGT\n+\n!!!!\n####\n";
    let records = collect(FastqReader::new(&data[..]));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sequence, b"ACGTACGT");
    assert_eq!(records[0].quality, b"!!!!####");
}

#[test]
fn test_quality_starting_with_header_marker() {
    let data = b"@r1\nAC\n+\n@#\n";
    let records = collect(FastqReader::new(&data[..]));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].quality, b"@#");
}

#[test]
fn test_one_byte_reads_match_whole_reads() {
    let mut data = Vec::new();
    open("sample_multiline.fastq").read_to_end(&mut data).unwrap();

    let whole = collect(FastqReader::new(&data[..]));
    let bytewise = collect(FastqReader::with_capacity(1, ChunkedReader::new(&data, 1)));

    assert_eq!(whole, bytewise);
}

#[test]
fn test_truncated_quality_is_an_error() {
    let data = b"@r1\nACGT\n+\n!!!!\n@r2\nACGT\n+\n!!";
    let mut reader = FastqReader::new(&data[..]);

    assert!(reader.next().unwrap().is_ok());
    let err = reader.next().unwrap().unwrap_err();
    assert_eq!(err.format_error(), Some(&FormatError::TruncatedRecord));
    assert!(reader.next().is_none());
}

#[test]
fn test_first_record_does_not_read_whole_stream() {
    let mut data = Vec::new();
    for i in 0..10_000 {
        write!(data, "@read{i}\nACGTACGTAC\n+\nIIIIIIIIII\n").unwrap();
    }
    let capacity = 1024;
    let mut source = ChunkedReader::new(&data, usize::MAX);
    let mut reader = FastqReader::with_capacity(capacity, &mut source);

    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.name, "read0");
    drop(reader);

    assert!(source.served <= capacity);
    assert!(source.served < data.len());
}

#[test]
fn test_io_error_is_propagated() {
    struct Failing<'a> {
        data: &'a [u8],
    }
    impl Read for Failing<'_> {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "source went away"));
            }
            let n = out.len().min(self.data.len());
            out[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    let mut reader = FastqReader::with_capacity(8, Failing { data: b"@r1\nACGT\n+\n!!" });
    match reader.next().unwrap() {
        Err(fastq_spans::ReaderError::Io(e)) => {
            assert_eq!(e.kind(), io::ErrorKind::ConnectionReset)
        }
        other => panic!("expected IO error, got {other:?}"),
    }
    assert!(reader.next().is_none());
}

#[test]
fn test_counting_without_materializing() {
    let mut reader = FastqReader::new(open("sample.fastq"));
    let mut long = 0;
    while let Some(record) = reader.next_raw() {
        if record.unwrap().len() > 50 {
            long += 1;
        }
    }

    assert_eq!(long, 3);
    assert_eq!(reader.records_read(), 5);
}
