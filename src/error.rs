//! Error taxonomy for the report pipeline.
//!
//! Every failure the pipeline can hit falls into one of three buckets: the
//! filesystem refused us ([`PipelineError::Io`]), a file was not valid delimited
//! text ([`PipelineError::Parse`]), or a table lacks a column a join step needs
//! ([`PipelineError::Schema`]). Messages always name the file or column at fault.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// File missing, unreadable, or not writable.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited content.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A required column is absent or a rename would collide.
    #[error("schema error in table '{table}': {message}")]
    Schema { table: String, message: String },
}

impl PipelineError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn missing_column(table: &str, column: &str) -> Self {
        Self::Schema {
            table: table.to_string(),
            message: format!("required column '{column}' not found"),
        }
    }

    pub fn schema(table: &str, message: impl Into<String>) -> Self {
        Self::Schema {
            table: table.to_string(),
            message: message.into(),
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_file_and_column() {
        let parse = PipelineError::parse(Path::new("data/lead_log.csv"), "row 4 has 3 fields");
        assert_eq!(
            parse.to_string(),
            "failed to parse data/lead_log.csv: row 4 has 3 fields"
        );

        let schema = PipelineError::missing_column("referral_rewards", "referral_reward_id");
        assert_eq!(
            schema.to_string(),
            "schema error in table 'referral_rewards': required column 'referral_reward_id' not found"
        );
    }
}
