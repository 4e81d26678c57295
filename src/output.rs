//! Output path resolution and the CSV sink.

use crate::extract::CommentRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fixed header row of every output file.
pub const CSV_HEADER: [&str; 4] = ["Name", "Current Position", "LinkedIn URL", "Comment"];

/// Resolve the output path: an explicit override wins verbatim, otherwise the
/// configured base name gets a local-time suffix so repeat runs never collide.
pub fn resolve_output_path(
    override_name: Option<&str>,
    configured_base: &str,
    now: DateTime<Local>,
) -> PathBuf {
    match override_name {
        Some(name) => PathBuf::from(format!("{name}.csv")),
        None => PathBuf::from(format!(
            "{configured_base}{}.csv",
            now.format("-%m-%d-%Y--%H-%M")
        )),
    }
}

/// Write the header plus one row per record. The file is created fresh every
/// run, never appended to.
pub fn write_csv(path: &Path, records: &[CommentRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.position.as_str(),
            record.profile_url.as_str(),
            record.comment.as_str(),
        ])?;
    }
    writer.flush()?;

    info!("data written to {} successfully", path.display());
    Ok(())
}
