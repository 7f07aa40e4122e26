use std::path::PathBuf;

pub mod report;
pub mod run;
pub mod sweep;

/// The simulation always appends to this file in its working directory
pub const RESULTS_FILE: &str = "dhcp-spoof-results.csv";

/// Where the simulator lives and where its output ends up
#[derive(clap::Args, Debug, Clone)]
pub struct Ns3Options {
    /// ns-3 checkout, every simulation runs with this as working directory
    #[arg(long, global = true, default_value = ".")]
    pub ns3_dir: PathBuf,

    /// ns-3 wrapper script, relative to the ns-3 directory
    #[arg(long, global = true, default_value = "./ns3")]
    pub ns3_bin: PathBuf,

    /// Simulation program passed to `ns3 run`
    #[arg(long, global = true, default_value_t = String::from("dhcp-spoof-enhanced-example"))]
    pub target: String,

    /// Directory for the generated figures, relative to the ns-3 directory
    #[arg(long, global = true, default_value = "output")]
    pub output_dir: PathBuf,
}

impl Ns3Options {
    #[cfg(test)]
    pub fn new(ns3_dir: impl Into<PathBuf>) -> Self {
        Ns3Options {
            ns3_dir: ns3_dir.into(),
            ns3_bin: PathBuf::from("./ns3"),
            target: String::from("dhcp-spoof-enhanced-example"),
            output_dir: PathBuf::from("output"),
        }
    }

    /// Results file written by the simulation
    pub fn results_path(&self) -> PathBuf {
        self.ns3_dir.join(RESULTS_FILE)
    }

    pub fn output_path(&self) -> PathBuf {
        self.ns3_dir.join(&self.output_dir)
    }
}
