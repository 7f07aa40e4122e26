use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{format_err, Context};
use subprocess::{Exec, Redirection};

use super::params::Combination;

/// Something that can execute one simulation for a parameter combination.
///
/// A returned error means the combination did not produce a result row.
pub trait SimulationRunner {
    fn invoke(&mut self, combination: &Combination) -> anyhow::Result<()>;
}

/// Runs the ns-3 example through the `ns3` wrapper script
pub struct Ns3Runner {
    ns3_dir: PathBuf,
    program: PathBuf,
    target: String,
    log_enabled: bool,
    pcap_enabled: bool,
}

impl Ns3Runner {
    /// Fails when the ns-3 directory or the executable inside it does not exist.
    pub fn new(ns3_dir: &Path, program: &Path, target: &str) -> anyhow::Result<Ns3Runner> {
        let ns3_dir = fs::canonicalize(ns3_dir)
            .with_context(|| format!("ns-3 directory '{}' not found", ns3_dir.display()))?;
        let program = ns3_dir.join(program);
        if !program.is_file() {
            return Err(format_err!(
                "{} executable not found, run from the ns-3 directory or pass --ns3-dir",
                program.display()
            ));
        }

        Ok(Ns3Runner {
            ns3_dir,
            program,
            target: target.to_owned(),
            log_enabled: false,
            pcap_enabled: false,
        })
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_enabled = enabled;
        self
    }

    pub fn with_pcap(mut self, enabled: bool) -> Self {
        self.pcap_enabled = enabled;
        self
    }

    /// Arguments passed to the executable, program name excluded
    pub fn args(&self, c: &Combination) -> Vec<String> {
        let mut args = vec![
            "run".to_owned(),
            self.target.clone(),
            "--".to_owned(),
            format!("--nClients={}", c.n_clients),
            format!("--nAddr={}", c.n_addr),
            format!("--starvStopTime={}", c.starv_stop_time),
            format!("--clientStartInterval={}", c.client_start_interval),
            format!("--starvInterval={}", c.starv_interval),
        ];
        if self.log_enabled {
            args.push("--logEnabled=true".to_owned());
        }
        if self.pcap_enabled {
            args.push("--pcapEnabled=true".to_owned());
        }
        args
    }
}

impl SimulationRunner for Ns3Runner {
    fn invoke(&mut self, combination: &Combination) -> anyhow::Result<()> {
        let args = self.args(combination);
        debug!("running: {} {}", self.program.display(), args.join(" "));

        let capture = Exec::cmd(&self.program)
            .args(args.as_slice())
            .cwd(&self.ns3_dir)
            .stdout(Redirection::Pipe)
            .stderr(Redirection::Pipe)
            .capture()
            .map_err(|e| format_err!("failed to launch {}: {}", self.program.display(), e))?;

        if capture.success() {
            Ok(())
        } else {
            Err(format_err!(
                "simulation exited with {:?}, error output:\n{}",
                capture.exit_status,
                capture.stderr_str().trim_end()
            ))
        }
    }
}
