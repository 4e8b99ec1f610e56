//! Column name deduplication.
//!
//! The first occurrence of a name is kept, later occurrences get `_2`, `_3`, ...
//! in order of appearance. A raw name that happens to equal a generated suffix
//! (`id`, `id_2`, `id`) is not disambiguated further: the output is
//! `id`, `id_2`, `id_2`. Callers that need a hard uniqueness guarantee should
//! check [`has_duplicates`] afterwards.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{error::PipelineResult, table::Table};

pub fn dedupe_column_names<S>(names: &[S]) -> Vec<String>
where
    S: AsRef<str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let count = counts.entry(name).or_insert(0);
            *count += 1;
            if *count == 1 {
                name.to_string()
            } else {
                format!("{name}_{count}")
            }
        })
        .collect()
}

pub fn has_duplicates<S>(names: &[S]) -> bool
where
    S: AsRef<str>,
{
    let mut seen = HashSet::with_capacity(names.len());
    names.iter().any(|name| !seen.insert(name.as_ref()))
}

/// Rewrites the table's header with [`dedupe_column_names`].
pub fn dedupe_table_columns(table: &mut Table) -> PipelineResult<()> {
    let deduped = dedupe_column_names(table.headers());
    if deduped.as_slice() != table.headers() {
        debug!(
            "Deduplicated column names in '{}': {:?} -> {:?}",
            table.name(),
            table.headers(),
            deduped
        );
        table.set_headers(deduped)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_get_numbered_suffixes() {
        assert_eq!(
            dedupe_column_names(&["id", "id", "id"]),
            vec!["id", "id_2", "id_3"]
        );
    }

    #[test]
    fn unique_names_are_unchanged() {
        let names = ["referral_id", "referee_id", "status"];
        assert_eq!(dedupe_column_names(&names), names.to_vec());
    }

    #[test]
    fn suffixes_count_per_name_and_keep_order() {
        assert_eq!(
            dedupe_column_names(&["a", "b", "a", "c", "b", "a"]),
            vec!["a", "b", "a_2", "c", "b_2", "a_3"]
        );
    }

    #[test]
    fn collision_with_generated_suffix_is_not_resolved() {
        let output = dedupe_column_names(&["id", "id_2", "id"]);
        assert_eq!(output, vec!["id", "id_2", "id_2"]);
        assert!(has_duplicates(&output));
    }

    #[test]
    fn second_pass_only_touches_remaining_collisions() {
        let once = dedupe_column_names(&["id", "id"]);
        assert_eq!(dedupe_column_names(&once), once);

        let adversarial = dedupe_column_names(&["id", "id_2", "id"]);
        assert_eq!(
            dedupe_column_names(&adversarial),
            vec!["id", "id_2", "id_2_2"]
        );
    }

    #[test]
    fn dedupe_table_columns_rewrites_header_in_place() {
        let mut table = Table::empty(
            "t",
            vec!["id".to_string(), "name".to_string(), "id".to_string()],
        );
        dedupe_table_columns(&mut table).expect("dedupe");
        assert_eq!(table.headers(), ["id", "name", "id_2"]);
    }
}
