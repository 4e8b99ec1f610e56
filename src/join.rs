use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{error::PipelineResult, table::Table};

/// Join semantics carried by each step of the join plan. Every step is a
/// left outer join: unmatched left rows survive with empty right cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Left,
}

/// Whether two empty-string keys count as equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyKeyPolicy {
    /// `""` matches `""`, like any other string.
    #[default]
    Match,
    /// Rows with an empty key never match anything.
    Never,
}

impl EmptyKeyPolicy {
    fn allows(self, key: &str) -> bool {
        match self {
            EmptyKeyPolicy::Match => true,
            EmptyKeyPolicy::Never => !key.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub table: Table,
    pub matched_rows: usize,
}

/// Equi-joins `left` and `right` on `left_key = right_key`.
///
/// Left rows keep their order; each one is repeated once per matching right row
/// (in right-table order). A left row without matches is emitted once with
/// empty right cells.
///
/// Output columns are the left columns followed by the right columns. When both
/// keys share a name the right key column is folded into the left one. Any other
/// right column whose name is already taken is renamed `name_2`, `name_3`, ...
pub fn join_tables(
    left: &Table,
    right: &Table,
    left_key: &str,
    right_key: &str,
    kind: JoinKind,
    empty_keys: EmptyKeyPolicy,
) -> PipelineResult<JoinOutcome> {
    let left_idx = left.require_column(left_key)?;
    let right_idx = right.require_column(right_key)?;
    let coalesce_key = left_key == right_key;

    let lookup = build_right_lookup(right, right_idx, empty_keys);
    let (headers, right_columns) = build_output_headers(
        left.headers(),
        right.headers(),
        coalesce_key.then_some(right_idx),
    );

    let mut rows = Vec::with_capacity(left.row_count());
    let mut matched_rows = 0usize;
    for left_row in left.rows() {
        let key = left_row[left_idx].as_str();
        let bucket = empty_keys
            .allows(key)
            .then(|| lookup.get(key))
            .flatten();
        match bucket {
            Some(bucket) => {
                for &right_row_idx in bucket {
                    let right_row = &right.rows()[right_row_idx];
                    let mut combined = left_row.clone();
                    combined.extend(right_columns.iter().map(|idx| right_row[*idx].clone()));
                    rows.push(combined);
                    matched_rows += 1;
                }
            }
            None => match kind {
                JoinKind::Left => {
                    let mut combined = left_row.clone();
                    combined.extend(right_columns.iter().map(|_| String::new()));
                    rows.push(combined);
                }
            },
        }
    }

    debug!(
        "Joined '{}'.{} with '{}'.{}: {} -> {} row(s), {} matched",
        left.name(),
        left_key,
        right.name(),
        right_key,
        left.row_count(),
        rows.len(),
        matched_rows
    );
    Ok(JoinOutcome {
        table: Table::new(left.name(), headers, rows)?,
        matched_rows,
    })
}

pub fn left_join(
    left: &Table,
    right: &Table,
    left_key: &str,
    right_key: &str,
) -> PipelineResult<Table> {
    join_tables(
        left,
        right,
        left_key,
        right_key,
        JoinKind::Left,
        EmptyKeyPolicy::default(),
    )
    .map(|outcome| outcome.table)
}

fn build_right_lookup(
    right: &Table,
    key_idx: usize,
    empty_keys: EmptyKeyPolicy,
) -> HashMap<&str, Vec<usize>> {
    let mut map: HashMap<&str, Vec<usize>> = HashMap::new();
    for (row_idx, row) in right.rows().iter().enumerate() {
        let key = row[key_idx].as_str();
        if empty_keys.allows(key) {
            map.entry(key).or_default().push(row_idx);
        }
    }
    map
}

fn build_output_headers(
    left_headers: &[String],
    right_headers: &[String],
    skip_right: Option<usize>,
) -> (Vec<String>, Vec<usize>) {
    let mut headers = left_headers.to_vec();
    let mut seen: HashSet<String> = headers.iter().cloned().collect();
    let mut right_columns = Vec::new();

    for (idx, name) in right_headers.iter().enumerate() {
        if skip_right == Some(idx) {
            continue;
        }
        let mut candidate = name.clone();
        let mut counter = 2usize;
        while seen.contains(&candidate) {
            candidate = format!("{name}_{counter}");
            counter += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
        right_columns.push(idx);
    }

    (headers, right_columns)
}
