#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

pub const REFERRALS: &str = "referral_id,referrer_id,referee_id,referral_reward_id,user_referral_status_id,transaction_id\n1,10,20,5,2,100\n";
pub const STATUSES: &str = "id,status\n2,active\n";
pub const REWARDS: &str = "id,reward_value\n";
pub const TRANSACTIONS: &str = "transaction_id,transaction_status\n";
pub const REFERRAL_LOGS: &str = "id,user_referral_id,source_transaction_id\n";
pub const LEADS: &str = "id,source_category\n";
pub const USER_LOGS: &str = "id,user_id,name\n1,10,Ann\n";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    /// Writes `contents` into a file under the data directory and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let dir = self.data_dir();
        fs::create_dir_all(&dir).expect("create data dir");
        let path = dir.join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the single-referral scenario: one referral whose status matches and
    /// every other joined table header-only.
    pub fn write_default_inputs(&self) {
        self.write("user_referrals.csv", REFERRALS);
        self.write("user_referral_statuses.csv", STATUSES);
        self.write("referral_rewards.csv", REWARDS);
        self.write("paid_transactions.csv", TRANSACTIONS);
        self.write("user_referral_logs.csv", REFERRAL_LOGS);
        self.write("lead_log.csv", LEADS);
        self.write("user_logs.csv", USER_LOGS);
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.out_dir().join(name)).expect("read output")
    }

    /// Parses an output CSV into its header and rows.
    pub fn read_output_csv(&self, name: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(self.out_dir().join(name)).expect("open output");
        let headers = reader
            .headers()
            .expect("headers")
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .expect("record")
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        (headers, rows)
    }
}
