use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::Parser;

use super::Ns3Options;
use crate::utils::{
    aggregate::{build_reports, distinct_values, Param},
    plot,
    results::{self, ResultRecord},
};

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Parser, Debug, Default)]
pub struct ReportArgs {
    /// Plot this CSV file (relative to the ns-3 directory) instead of the one the simulation writes
    #[arg(long)]
    pub results_file: Option<PathBuf>,

    /// do not write the aggregated means to summary.json
    #[arg(long, action)]
    pub no_summary: bool,
}

/// Plot the results file of the last sweep. Returns the paths of the figures.
pub fn run(args: &ReportArgs, opts: &Ns3Options) -> anyhow::Result<Vec<PathBuf>> {
    let path = match &args.results_file {
        Some(file) => opts.ns3_dir.join(file),
        None => opts.results_path(),
    };
    let records = results::load(&path)?;
    generate(&records, &opts.output_path(), !args.no_summary)
}

pub fn generate(
    records: &[ResultRecord],
    output_dir: &Path,
    write_summary: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    if records.is_empty() {
        bail!("no data to plot, the results table is empty");
    }

    info!("found parameter values:");
    for param in Param::ALL {
        info!("  {}: {:?}", param.column(), distinct_values(records, param));
    }

    let reports = build_reports(records);
    let mut figures = Vec::with_capacity(reports.len());
    for report in &reports {
        let path = plot::render(report, output_dir)?;
        info!("saved plot {} ({} records)", path.display(), report.rows);
        figures.push(path);
    }

    if write_summary {
        let path = output_dir.join(SUMMARY_FILE);
        let file = File::create(&path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &reports)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!("saved aggregated means to {}", path.display());
    }

    Ok(figures)
}
