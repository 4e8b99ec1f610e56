//! Per-column data-quality profile.
//!
//! Null counts are taken over cells that still hold a null marker. The loader
//! already folds those into the empty string, so for loaded tables the count is
//! zero and a genuinely empty cell is indistinguishable from a missing one.
//! Empty strings are counted as a distinct value.

use itertools::Itertools;
use serde::Serialize;

use crate::{loader::is_null_token, table::Table};

/// Every loaded cell is stored as text.
pub const STRING_DTYPE: &str = "string";

pub const PROFILE_HEADERS: [&str; 5] = ["table", "column", "null_count", "distinct_count", "dtype"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    pub table: String,
    pub column: String,
    pub null_count: usize,
    pub distinct_count: usize,
    pub dtype: String,
}

pub fn profile_table(table: &Table, name: &str) -> Vec<ProfileRecord> {
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let cells = || table.rows().iter().map(move |row| row[idx].as_str());
            ProfileRecord {
                table: name.to_string(),
                column: column.clone(),
                null_count: cells().filter(|cell| is_null_token(cell)).count(),
                distinct_count: cells().unique().count(),
                dtype: STRING_DTYPE.to_string(),
            }
        })
        .collect()
}
