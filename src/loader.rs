//! Table loader: reads one delimited file fully into a [`Table`].
//!
//! Every cell stays a string. Conventional missing-value markers (`NULL`,
//! `N/A`, `NaN`, ...) are folded into the empty string at load time, so a
//! loaded table never carries a distinct null representation.

use std::path::Path;

use log::debug;

use crate::{
    error::{PipelineError, PipelineResult},
    io_utils,
    table::Table,
};

/// Markers treated as a missing value when they make up an entire cell.
pub const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How far the header row of a file can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Header names are taken as-is and every row must match its width.
    #[default]
    Trusted,
    /// Header row is read and thrown away. Column count comes from the data
    /// rows, which must agree among themselves. Columns are named
    /// `col1..colN` until a caller renames them.
    Untrusted,
}

pub fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

fn normalize_cell(value: String) -> String {
    if is_null_token(&value) {
        String::new()
    } else {
        value
    }
}

/// Synthetic positional names `col1..colN`.
pub fn positional_headers(count: usize) -> Vec<String> {
    (1..=count).map(|idx| format!("col{idx}")).collect()
}

pub fn load_table(path: &Path, name: &str, mode: HeaderMode) -> PipelineResult<Table> {
    let flexible = mode == HeaderMode::Untrusted;
    let bytes = io_utils::read_input(path)?;
    let mut reader = io_utils::open_csv_reader(bytes.as_slice(), flexible);
    let headers = io_utils::reader_headers(&mut reader, path)?;
    if headers.is_empty() {
        return Err(PipelineError::parse(path, "no header row"));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut width: Option<usize> = None;
    for record in reader.byte_records() {
        let record = record.map_err(|err| io_utils::csv_error(path, err))?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        if flexible {
            let expected = *width.get_or_insert(record.len());
            if record.len() != expected {
                return Err(PipelineError::parse(
                    path,
                    format!(
                        "line {line} has {} field(s), expected {expected}",
                        record.len()
                    ),
                ));
            }
        }
        let decoded = io_utils::decode_record(&record, path, line)?;
        rows.push(decoded.into_iter().map(normalize_cell).collect());
    }

    let headers = match mode {
        HeaderMode::Trusted => headers,
        HeaderMode::Untrusted => positional_headers(width.unwrap_or(headers.len())),
    };
    debug!(
        "Loaded {:?}: {} column(s), {} row(s)",
        path,
        headers.len(),
        rows.len()
    );
    Table::new(name, headers, rows)
}
