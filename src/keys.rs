//! Join-key normalization and schema alignment.
//!
//! Keys compare as exact strings. `"007"` and `"7"` are different keys and no
//! numeric coercion ever happens. The aligner gives generically named identifier
//! columns (`id`) the foreign-key name the join plan expects.

use log::debug;

use crate::{
    error::{PipelineError, PipelineResult},
    table::Table,
};

/// Columns treated as join keys wherever they appear.
pub const JOIN_KEY_COLUMNS: &[&str] = &[
    "referrer_id",
    "referee_id",
    "referral_reward_id",
    "transaction_id",
    "user_referral_status_id",
    "referral_id",
];

/// Re-stringify hook for key cells coming from a typed loader; a no-op for the
/// string cells produced by `loader::load_table`.
pub fn key_string<T>(value: T) -> String
where
    T: ToString,
{
    value.to_string()
}

/// Re-stringifies every allow-listed column present in `table`. Returns the
/// names of the columns that were normalized.
pub fn normalize_keys(table: &mut Table, allow_list: &[&str]) -> Vec<String> {
    let targets = allow_list
        .iter()
        .filter_map(|name| table.column_index(name).map(|idx| (idx, name.to_string())))
        .collect::<Vec<_>>();
    for row in table.rows_mut() {
        for (idx, _) in &targets {
            let cell = std::mem::take(&mut row[*idx]);
            row[*idx] = key_string(cell);
        }
    }
    let names = targets.into_iter().map(|(_, name)| name).collect::<Vec<_>>();
    if !names.is_empty() {
        debug!("Normalized key column(s) {:?} in '{}'", names, table.name());
    }
    names
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rename {
    pub from: &'static str,
    pub to: &'static str,
}

impl Rename {
    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }
}

pub const STATUS_RENAMES: &[Rename] = &[Rename::new("id", "user_referral_status_id")];
pub const REWARD_RENAMES: &[Rename] = &[Rename::new("id", "referral_reward_id")];
pub const REFERRAL_LOG_KEY: Rename = Rename::new("user_referral_id", "referral_id");
pub const REFERRAL_LOG_RENAMES: &[Rename] = &[REFERRAL_LOG_KEY];

/// Applies each rename whose source column exists. A rename onto a name the
/// table already has is rejected. Returns the renames that were applied.
pub fn align_schema(table: &mut Table, renames: &[Rename]) -> PipelineResult<Vec<Rename>> {
    let mut applied = Vec::new();
    for rename in renames {
        if !table.has_column(rename.from) {
            continue;
        }
        if rename.from != rename.to && table.has_column(rename.to) {
            return Err(PipelineError::schema(
                table.name(),
                format!(
                    "cannot rename '{}' to '{}': column already exists",
                    rename.from, rename.to
                ),
            ));
        }
        table.rename_column(rename.from, rename.to);
        debug!(
            "Renamed '{}' -> '{}' in '{}'",
            rename.from,
            rename.to,
            table.name()
        );
        applied.push(*rename);
    }
    Ok(applied)
}
