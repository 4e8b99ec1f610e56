//! Positional header repair for inputs whose header row cannot be trusted.
//!
//! The declared header is discarded unconditionally: columns become
//! `col1..colN` by position and the first one takes the canonical key name.
//! There is no attempt to detect whether the original header was fine.

use log::debug;

use crate::{
    error::{PipelineError, PipelineResult},
    loader::positional_headers,
    table::Table,
};

pub const LEAD_KEY_COLUMN: &str = "lead_id";

pub fn repair_headers(table: &mut Table, key_column: &str) -> PipelineResult<()> {
    let count = table.column_count();
    if count == 0 {
        return Err(PipelineError::schema(
            table.name(),
            format!("no columns to assign '{key_column}' to"),
        ));
    }
    let mut headers = positional_headers(count);
    headers[0] = key_column.to_string();
    debug!(
        "Replaced header of '{}' {:?} with {:?}",
        table.name(),
        table.headers(),
        headers
    );
    table.set_headers(headers)
}

pub fn repair_lead_headers(table: &mut Table) -> PipelineResult<()> {
    repair_headers(table, LEAD_KEY_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_table(headers: &[&str]) -> Table {
        let headers = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
        let rows = (0..3)
            .map(|row| (0..headers.len()).map(|col| format!("{row}-{col}")).collect())
            .collect();
        Table::new("lead_logs", headers, rows).expect("table")
    }

    #[test]
    fn header_is_replaced_positionally() {
        let mut table = lead_table(&["x", "y", "z"]);
        repair_lead_headers(&mut table).expect("repair");
        assert_eq!(table.headers(), ["lead_id", "col2", "col3"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("lead_id"), Some(vec!["0-0", "1-0", "2-0"]));
    }

    #[test]
    fn plausible_headers_are_replaced_too() {
        let mut table = lead_table(&["lead_id", "source", "created_at"]);
        repair_lead_headers(&mut table).expect("repair");
        assert_eq!(table.headers(), ["lead_id", "col2", "col3"]);
    }

    #[test]
    fn single_column_table_becomes_key_only() {
        let mut table = lead_table(&["\u{feff}??"]);
        repair_lead_headers(&mut table).expect("repair");
        assert_eq!(table.headers(), ["lead_id"]);
    }
}
