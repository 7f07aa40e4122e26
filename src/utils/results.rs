//! The results table the simulator appends to after every successful run.
//!
//! This program only ever deletes (or archives) the file before a sweep and
//! reads it back afterwards.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub n_clients: u32,
    pub n_addr: u32,
    #[serde(rename = "starvationStopTime")]
    pub starv_stop_time: f64,
    pub client_start_interval: f64,
    #[serde(rename = "starvationInterval")]
    pub starv_interval: u32,

    // not needed for the report, older simulator builds did not write them
    #[allow(dead_code)]
    pub rogue_count: Option<u32>,
    #[allow(dead_code)]
    pub legitimate_count: Option<u32>,
    #[allow(dead_code)]
    pub no_address_count: Option<u32>,

    pub rogue_percentage: f64,
}

/// Delete a results file left over from a previous run.
///
/// Returns whether there was anything to delete.
pub fn remove_stale(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path)
        .with_context(|| format!("failed to remove stale results file '{}'", path.display()))?;
    info!("removed existing results file {}", path.display());
    Ok(true)
}

/// Move a results file left over from a previous run out of the way, keeping
/// it next to the original under a timestamped name.
pub fn archive_stale(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("results");
    let archived = path.with_file_name(super::dump_file(stem, "csv"));
    fs::rename(path, &archived).with_context(|| {
        format!(
            "failed to archive stale results file '{}' as '{}'",
            path.display(),
            archived.display()
        )
    })?;
    info!(
        "archived existing results file {} as {}",
        path.display(),
        archived.display()
    );
    Ok(Some(archived))
}

pub fn load(path: &Path) -> Result<Vec<ResultRecord>> {
    if !path.exists() {
        bail!("results file '{}' not found", path.display());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open results file '{}'", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header of '{}'", path.display()))?
        .iter()
        .map(String::from)
        .collect();

    let mut records = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        let record: ResultRecord = row.with_context(|| {
            format!(
                "malformed record #{} in results file '{}'",
                i + 1,
                path.display()
            )
        })?;
        records.push(record);
    }

    info!("loaded {} records from {}", records.len(), path.display());
    debug!("columns: {:?}", columns);
    Ok(records)
}
