//! Runs the simulation once for every combination of the parameter grid.
//!
//! The first failing run aborts the whole sweep, the results file would
//! otherwise be missing rows without anybody noticing.
use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::bail;
use clap::Parser;

use super::Ns3Options;
use crate::utils::{
    interrupt_flag,
    params::ParameterGrid,
    results,
    simulator::{Ns3Runner, SimulationRunner},
};

#[derive(Parser, Debug, Default)]
pub struct SweepArgs {
    /// JSON file with the parameter lists, keys as in the simulator arguments (nClients, nAddr, ...)
    #[arg(long)]
    pub grid_file: Option<PathBuf>,

    /// Client counts to sweep, comma separated
    #[arg(long, value_delimiter = ',')]
    pub n_clients: Option<Vec<u32>>,

    /// Address pool sizes of the legitimate server
    #[arg(long, value_delimiter = ',')]
    pub n_addr: Option<Vec<u32>>,

    /// Times in seconds at which the starvation attack stops
    #[arg(long, value_delimiter = ',')]
    pub starv_stop_time: Option<Vec<f64>>,

    /// Intervals in seconds between client start times
    #[arg(long, value_delimiter = ',')]
    pub client_start_interval: Option<Vec<f64>>,

    /// Starvation attack intervals in milliseconds
    #[arg(long, value_delimiter = ',')]
    pub starv_interval: Option<Vec<u32>>,

    /// let the simulation write its log file
    #[arg(long, action)]
    pub log_enabled: bool,

    /// let the simulation write pcap traces
    #[arg(long, action)]
    pub pcap_enabled: bool,

    /// keep a results file from a previous run under a timestamped name instead of deleting it
    #[arg(long, action)]
    pub archive_stale: bool,
}

impl SweepArgs {
    /// The grid file (or the defaults), overridden by lists given on the command line
    pub fn grid(&self) -> anyhow::Result<ParameterGrid> {
        let mut grid = match &self.grid_file {
            Some(path) => ParameterGrid::from_file(path)?,
            None => ParameterGrid::default(),
        };

        if let Some(v) = &self.n_clients {
            grid.n_clients = v.clone();
        }
        if let Some(v) = &self.n_addr {
            grid.n_addr = v.clone();
        }
        if let Some(v) = &self.starv_stop_time {
            grid.starv_stop_time = v.clone();
        }
        if let Some(v) = &self.client_start_interval {
            grid.client_start_interval = v.clone();
        }
        if let Some(v) = &self.starv_interval {
            grid.starv_interval = v.clone();
        }

        grid.validate()?;
        Ok(grid)
    }
}

/// Invoke `runner` for every combination of `grid`, in order.
///
/// Returns the number of completed simulations. Stops at the first failure,
/// or before the next simulation once `stop` is set.
pub fn run_sweep(
    grid: &ParameterGrid,
    runner: &mut dyn SimulationRunner,
    stop: &AtomicBool,
) -> anyhow::Result<usize> {
    grid.validate()?;

    let total = grid.len();
    info!("starting experiments with {} total combinations", total);

    for (i, combination) in grid.combinations().enumerate() {
        if stop.load(Ordering::Relaxed) {
            bail!("interrupted after {} of {} combinations", i, total);
        }

        info!("[{}/{}] {}", i + 1, total, combination);
        if let Err(err) = runner.invoke(&combination) {
            if stop.load(Ordering::Relaxed) {
                return Err(err.context(format!(
                    "interrupted during combination {} of {}",
                    i + 1,
                    total
                )));
            }
            error!("simulation failed, skipping remaining combinations");
            return Err(err.context(format!(
                "combination {}/{} ({}) failed",
                i + 1,
                total,
                combination
            )));
        }
        info!("  [OK] simulation completed");
    }

    info!("all {} experiments completed successfully", total);
    Ok(total)
}

pub fn run(args: &SweepArgs, opts: &Ns3Options) -> anyhow::Result<usize> {
    // nothing gets touched unless the simulator is there
    let mut runner = Ns3Runner::new(&opts.ns3_dir, &opts.ns3_bin, &opts.target)?
        .with_logging(args.log_enabled)
        .with_pcap(args.pcap_enabled);
    let grid = args.grid()?;

    let results_path = opts.results_path();
    if args.archive_stale {
        results::archive_stale(&results_path)?;
    } else {
        results::remove_stale(&results_path)?;
    }

    let stop = interrupt_flag()?;
    run_sweep(&grid, &mut runner, &stop)
}
