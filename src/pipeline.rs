//! End-to-end report pipeline.
//!
//! Stages run in a fixed order: load every input, repair and align headers,
//! profile each prepared table, then fold the join plan over the referrals
//! table. Nothing is written until both outputs are fully built.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    columns::dedupe_table_columns,
    error::{PipelineError, PipelineResult},
    join::{EmptyKeyPolicy, JoinKind, join_tables},
    keys::{self, JOIN_KEY_COLUMNS},
    loader::{self, HeaderMode},
    output,
    profile::{self, ProfileRecord},
    repair,
    table::Table,
};

/// The seven inputs, in profiling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    LeadLogs,
    PaidTransactions,
    ReferralRewards,
    UserReferralStatuses,
    UserLogs,
    UserReferralLogs,
    UserReferrals,
}

impl Source {
    pub const ALL: [Source; 7] = [
        Source::LeadLogs,
        Source::PaidTransactions,
        Source::ReferralRewards,
        Source::UserReferralStatuses,
        Source::UserLogs,
        Source::UserReferralLogs,
        Source::UserReferrals,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Source::LeadLogs => "lead_log.csv",
            Source::PaidTransactions => "paid_transactions.csv",
            Source::ReferralRewards => "referral_rewards.csv",
            Source::UserReferralStatuses => "user_referral_statuses.csv",
            Source::UserLogs => "user_logs.csv",
            Source::UserReferralLogs => "user_referral_logs.csv",
            Source::UserReferrals => "user_referrals.csv",
        }
    }

    /// Name used for the table in the profiling summary.
    pub fn table_name(self) -> &'static str {
        match self {
            Source::LeadLogs => "lead_logs",
            Source::PaidTransactions => "paid_transactions",
            Source::ReferralRewards => "referral_rewards",
            Source::UserReferralStatuses => "user_referral_statuses",
            Source::UserLogs => "user_logs",
            Source::UserReferralLogs => "user_referral_logs",
            Source::UserReferrals => "user_referrals",
        }
    }

    pub fn header_mode(self) -> HeaderMode {
        match self {
            Source::LeadLogs => HeaderMode::Untrusted,
            _ => HeaderMode::Trusted,
        }
    }

    fn renames(self) -> &'static [keys::Rename] {
        match self {
            Source::UserReferralStatuses => keys::STATUS_RENAMES,
            Source::ReferralRewards => keys::REWARD_RENAMES,
            Source::UserReferralLogs => keys::REFERRAL_LOG_RENAMES,
            _ => &[],
        }
    }
}

/// One left-join of the accumulated report against an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinStep {
    pub right: Source,
    pub left_key: &'static str,
    pub right_key: &'static str,
    pub kind: JoinKind,
    /// Run the step only when the right table was aliased by this rename.
    pub requires_rename: Option<keys::Rename>,
}

pub const DRIVING_SOURCE: Source = Source::UserReferrals;

/// Later steps rely on columns introduced by earlier ones; order matters.
pub const JOIN_PLAN: [JoinStep; 5] = [
    JoinStep {
        right: Source::UserReferralStatuses,
        left_key: "user_referral_status_id",
        right_key: "user_referral_status_id",
        kind: JoinKind::Left,
        requires_rename: None,
    },
    JoinStep {
        right: Source::ReferralRewards,
        left_key: "referral_reward_id",
        right_key: "referral_reward_id",
        kind: JoinKind::Left,
        requires_rename: None,
    },
    JoinStep {
        right: Source::PaidTransactions,
        left_key: "transaction_id",
        right_key: "transaction_id",
        kind: JoinKind::Left,
        requires_rename: None,
    },
    JoinStep {
        right: Source::UserReferralLogs,
        left_key: "referral_id",
        right_key: "referral_id",
        kind: JoinKind::Left,
        requires_rename: Some(keys::REFERRAL_LOG_KEY),
    },
    JoinStep {
        right: Source::LeadLogs,
        left_key: "referee_id",
        right_key: repair::LEAD_KEY_COLUMN,
        kind: JoinKind::Left,
        requires_rename: None,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub empty_keys: EmptyKeyPolicy,
}

impl PipelineConfig {
    pub fn new(data_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            out_dir: out_dir.into(),
            empty_keys: EmptyKeyPolicy::default(),
        }
    }
}

/// All seven tables after loading and header preparation.
#[derive(Debug, Clone)]
pub struct InputTables {
    tables: Vec<(Source, Table)>,
    applied_renames: Vec<(Source, keys::Rename)>,
}

impl InputTables {
    pub fn load(data_dir: &Path) -> PipelineResult<Self> {
        let mut tables = Vec::with_capacity(Source::ALL.len());
        for source in Source::ALL {
            let path = data_dir.join(source.file_name());
            let mut table = loader::load_table(&path, source.table_name(), source.header_mode())?;
            dedupe_table_columns(&mut table)?;
            info!(
                "Loaded {} row(s) x {} column(s) from {:?}",
                table.row_count(),
                table.column_count(),
                path
            );
            tables.push((source, table));
        }
        Ok(Self::from_tables(tables))
    }

    pub fn from_tables(tables: Vec<(Source, Table)>) -> Self {
        Self {
            tables,
            applied_renames: Vec::new(),
        }
    }

    pub fn get(&self, source: Source) -> Option<&Table> {
        self.tables
            .iter()
            .find(|(candidate, _)| *candidate == source)
            .map(|(_, table)| table)
    }

    fn get_mut(&mut self, source: Source) -> Option<&mut Table> {
        self.tables
            .iter_mut()
            .find(|(candidate, _)| *candidate == source)
            .map(|(_, table)| table)
    }

    /// Header repair for the lead table, then foreign-key renames and key
    /// normalization for every table.
    pub fn prepare(&mut self) -> PipelineResult<()> {
        if let Some(leads) = self.get_mut(Source::LeadLogs) {
            repair::repair_lead_headers(leads)?;
        }
        for (source, table) in self.tables.iter_mut() {
            let applied = keys::align_schema(table, source.renames())?;
            self.applied_renames
                .extend(applied.into_iter().map(|rename| (*source, rename)));
            keys::normalize_keys(table, JOIN_KEY_COLUMNS);
        }
        Ok(())
    }

    pub fn was_renamed(&self, source: Source, rename: keys::Rename) -> bool {
        self.applied_renames.contains(&(source, rename))
    }

    pub fn profile(&self) -> Vec<ProfileRecord> {
        Source::ALL
            .iter()
            .filter_map(|source| self.get(*source).map(|table| (source, table)))
            .flat_map(|(source, table)| profile::profile_table(table, source.table_name()))
            .collect()
    }

    pub fn build_report(&self, empty_keys: EmptyKeyPolicy) -> PipelineResult<Table> {
        let driving = self.require(DRIVING_SOURCE)?;
        let mut report = driving.clone();
        for step in &JOIN_PLAN {
            let right = self.require(step.right)?;
            if let Some(rename) = step.requires_rename
                && !self.was_renamed(step.right, rename)
            {
                debug!(
                    "Skipping join with '{}': no '{}' column to alias",
                    right.name(),
                    rename.from
                );
                continue;
            }
            let before = report.row_count();
            let outcome = join_tables(
                &report,
                right,
                step.left_key,
                step.right_key,
                step.kind,
                empty_keys,
            )?;
            info!(
                "Joined '{}' on {} = {}: {} -> {} row(s), {} matched",
                right.name(),
                step.left_key,
                step.right_key,
                before,
                outcome.table.row_count(),
                outcome.matched_rows
            );
            report = outcome.table;
        }
        Ok(report)
    }

    fn require(&self, source: Source) -> PipelineResult<&Table> {
        self.get(source)
            .ok_or_else(|| PipelineError::schema(source.table_name(), "input table was not loaded"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub report_rows: usize,
    pub report_columns: usize,
    pub profile_records: usize,
    pub report_path: PathBuf,
    pub profile_path: PathBuf,
}

pub fn run_pipeline(config: &PipelineConfig) -> PipelineResult<PipelineSummary> {
    let mut inputs = InputTables::load(&config.data_dir)?;
    inputs.prepare()?;
    let profile = inputs.profile();
    let report = inputs.build_report(config.empty_keys)?;
    let written = output::write_outputs(&config.out_dir, &profile, &report)?;
    Ok(PipelineSummary {
        report_rows: report.row_count(),
        report_columns: report.column_count(),
        profile_records: profile.len(),
        report_path: written.report,
        profile_path: written.profile,
    })
}
