//! Output writer for the profiling summary and the joined report.
//!
//! Both files are staged as temporary files inside the output directory and
//! only renamed into place once both were written, so a failed run leaves any
//! previous outputs untouched.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use log::info;
use tempfile::NamedTempFile;

use crate::{
    error::{PipelineError, PipelineResult},
    io_utils,
    profile::{PROFILE_HEADERS, ProfileRecord},
    table::Table,
};

pub const PROFILE_FILE: &str = "profiling_summary.csv";
pub const REPORT_FILE: &str = "report.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub profile: PathBuf,
    pub report: PathBuf,
}

pub fn write_outputs(
    out_dir: &Path,
    profile: &[ProfileRecord],
    report: &Table,
) -> PipelineResult<WrittenOutputs> {
    fs::create_dir_all(out_dir).map_err(|err| PipelineError::io(out_dir, err))?;
    let profile_path = out_dir.join(PROFILE_FILE);
    let report_path = out_dir.join(REPORT_FILE);

    let staged_profile = stage(out_dir, &profile_path, |writer| write_profile(writer, profile))?;
    let staged_report = stage(out_dir, &report_path, |writer| write_table(writer, report))?;

    persist(staged_profile, &profile_path)?;
    persist(staged_report, &report_path)?;
    info!(
        "Wrote {} profiling record(s) to {:?} and {} report row(s) to {:?}",
        profile.len(),
        profile_path,
        report.row_count(),
        report_path
    );
    Ok(WrittenOutputs {
        profile: profile_path,
        report: report_path,
    })
}

pub fn write_profile<W>(writer: &mut csv::Writer<W>, records: &[ProfileRecord]) -> csv::Result<()>
where
    W: io::Write,
{
    writer.write_record(PROFILE_HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    Ok(())
}

pub fn write_table<W>(writer: &mut csv::Writer<W>, table: &Table) -> csv::Result<()>
where
    W: io::Write,
{
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    Ok(())
}

fn stage<F>(out_dir: &Path, destination: &Path, write: F) -> PipelineResult<NamedTempFile>
where
    F: FnOnce(&mut csv::Writer<&mut File>) -> csv::Result<()>,
{
    let mut staged =
        NamedTempFile::new_in(out_dir).map_err(|err| PipelineError::io(out_dir, err))?;
    {
        let mut writer = io_utils::open_csv_writer(staged.as_file_mut());
        write(&mut writer).map_err(|err| PipelineError::io(destination, io::Error::from(err)))?;
        writer
            .flush()
            .map_err(|err| PipelineError::io(destination, err))?;
    }
    Ok(staged)
}

fn persist(staged: NamedTempFile, destination: &Path) -> PipelineResult<()> {
    staged
        .persist(destination)
        .map(|_| ())
        .map_err(|err| PipelineError::io(destination, err.error))
}
