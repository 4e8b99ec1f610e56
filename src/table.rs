//! In-memory string table shared by every pipeline stage.
//!
//! Cells are stored row-major. Every row is exactly `headers.len()` wide; the
//! constructors and mutators below are the only way to change shape, and they
//! keep that invariant.

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, rejecting rows whose width differs from the header.
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> PipelineResult<Self> {
        let name = name.into();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(PipelineError::schema(
                &name,
                format!(
                    "row {} has {} cell(s) but the table has {} column(s)",
                    idx + 1,
                    row.len(),
                    headers.len()
                ),
            ));
        }
        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    pub fn empty(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<String>] {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a column a caller cannot proceed without.
    pub fn require_column(&self, name: &str) -> PipelineResult<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::missing_column(&self.name, name))
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Replaces every header at once. The new header must be the same width.
    pub fn set_headers(&mut self, headers: Vec<String>) -> PipelineResult<()> {
        if headers.len() != self.headers.len() {
            return Err(PipelineError::schema(
                &self.name,
                format!(
                    "cannot replace {} header(s) with {}",
                    self.headers.len(),
                    headers.len()
                ),
            ));
        }
        self.headers = headers;
        Ok(())
    }

    /// Renames `from` to `to` when `from` exists. Returns whether a rename happened.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.headers[idx] = to.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = Table::new(
            "t",
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("row 2 has 1 cell(s)"));
    }

    #[test]
    fn column_returns_cells_in_row_order() {
        let table = Table::new(
            "t",
            strings(&["id", "status"]),
            vec![strings(&["1", "active"]), strings(&["2", "paused"])],
        )
        .expect("table");
        assert_eq!(table.column("status"), Some(vec!["active", "paused"]));
        assert_eq!(table.column("missing"), None);
    }

    #[test]
    fn rename_column_is_a_no_op_for_absent_names() {
        let mut table = Table::empty("t", strings(&["id"]));
        assert!(!table.rename_column("uid", "user_id"));
        assert!(table.rename_column("id", "user_id"));
        assert_eq!(table.headers(), strings(&["user_id"]).as_slice());
    }

    #[test]
    fn set_headers_keeps_width() {
        let mut table = Table::empty("t", strings(&["a", "b"]));
        assert!(table.set_headers(strings(&["x"])).is_err());
        table.set_headers(strings(&["x", "y"])).expect("same width");
        assert_eq!(table.headers(), strings(&["x", "y"]).as_slice());
    }
}
