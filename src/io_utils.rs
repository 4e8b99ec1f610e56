//! I/O utilities for CSV reading, writing, and decoding.
//!
//! All file I/O in referral-report flows through this module:
//!
//! - **Reader/writer construction**: comma-delimited, double-quote escaped.
//! - **Quote checking**: the `csv` parser closes an unterminated quoted field
//!   at end of input without complaint, so inputs are scanned for that first.
//! - **Decoding**: byte records are decoded as strict UTF-8 via `encoding_rs`;
//!   a byte-order mark in front of the header row is dropped.
//! - **Error mapping**: `csv::Error` values become [`PipelineError`]s naming
//!   the file and line at fault.

use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

use csv::QuoteStyle;
use encoding_rs::UTF_8;

use crate::error::{PipelineError, PipelineResult};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn open_csv_reader<R>(reader: R, flexible: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(DEFAULT_CSV_DELIMITER)
        .double_quote(true)
        .flexible(flexible);
    builder.from_reader(reader)
}

/// Reads a whole input file, rejecting an unterminated quoted field.
pub fn read_input(path: &Path) -> PipelineResult<Vec<u8>> {
    let bytes = fs::read(path).map_err(|err| PipelineError::io(path, err))?;
    if let Some(line) = find_unterminated_quote(&bytes) {
        return Err(PipelineError::parse(
            path,
            format!("unterminated quoted field starting on line {line}"),
        ));
    }
    Ok(bytes)
}

/// Line on which a quoted field opens without ever being closed.
///
/// Follows the reader's quoting rules: a quote opens a quoted field only at the
/// start of a field, `""` inside a quoted field is an escaped quote, and quotes
/// anywhere else are literal.
pub fn find_unterminated_quote(bytes: &[u8]) -> Option<u64> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut line = 1u64;
    let mut opened_on = 0u64;
    let mut in_quotes = false;
    let mut field_start = true;
    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        idx += 1;
        if byte == b'\n' {
            line += 1;
        }
        if in_quotes {
            if byte == b'"' {
                if bytes.get(idx) == Some(&b'"') {
                    idx += 1;
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match byte {
            b'"' if field_start => {
                in_quotes = true;
                opened_on = line;
                field_start = false;
            }
            b',' | b'\n' | b'\r' => field_start = true,
            _ => field_start = false,
        }
    }
    in_quotes.then_some(opened_on)
}

/// Header rows are always written explicitly, so `serialize` never emits one.
pub fn open_csv_writer<W>(writer: W) -> csv::Writer<W>
where
    W: Write,
{
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .delimiter(DEFAULT_CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    builder.from_writer(writer)
}

pub fn decode_bytes(bytes: &[u8]) -> Option<String> {
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

pub fn decode_record(
    record: &csv::ByteRecord,
    path: &Path,
    line: u64,
) -> PipelineResult<Vec<String>> {
    record
        .iter()
        .map(|field| {
            decode_bytes(field)
                .ok_or_else(|| PipelineError::parse(path, format!("line {line} is not valid UTF-8")))
        })
        .collect()
}

pub fn decode_headers(record: &csv::ByteRecord, path: &Path) -> PipelineResult<Vec<String>> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let decoded = if idx == 0 {
                let (text, had_errors) = UTF_8.decode_with_bom_removal(field);
                (!had_errors).then(|| text.into_owned())
            } else {
                decode_bytes(field)
            };
            decoded.ok_or_else(|| PipelineError::parse(path, "header row is not valid UTF-8"))
        })
        .collect()
}

pub fn reader_headers<R>(reader: &mut csv::Reader<R>, path: &Path) -> PipelineResult<Vec<String>>
where
    R: Read,
{
    let headers = reader
        .byte_headers()
        .map_err(|err| csv_error(path, err))?
        .clone();
    decode_headers(&headers, path)
}

pub fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    if err.is_io_error() {
        return match err.into_kind() {
            csv::ErrorKind::Io(source) => PipelineError::io(path, source),
            other => PipelineError::parse(path, format!("{other:?}")),
        };
    }
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => match pos {
            Some(pos) => format!(
                "line {} has {len} field(s), expected {expected_len}",
                pos.line()
            ),
            None => format!("record has {len} field(s), expected {expected_len}"),
        },
        _ => err.to_string(),
    };
    PipelineError::parse(path, message)
}
