use std::{fmt, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Values swept for each simulator parameter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterGrid {
    pub n_clients: Vec<u32>,
    pub n_addr: Vec<u32>,
    pub starv_stop_time: Vec<f64>,
    pub client_start_interval: Vec<f64>,
    pub starv_interval: Vec<u32>,
}

impl Default for ParameterGrid {
    fn default() -> Self {
        ParameterGrid {
            n_clients: vec![10, 20, 30, 40],
            n_addr: vec![50, 100, 150, 200],
            starv_stop_time: vec![2.0, 4.0, 6.0, 8.0],
            client_start_interval: vec![0.2, 0.4, 0.6, 0.8],
            starv_interval: vec![5, 10, 15, 20],
        }
    }
}

/// One point of the sweep, i.e. the arguments of a single simulator run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combination {
    pub n_clients: u32,
    pub n_addr: u32,
    pub starv_stop_time: f64,
    pub client_start_interval: f64,
    pub starv_interval: u32,
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nClients={}, nAddr={}, starvStopTime={}, clientStartInterval={}, starvInterval={}",
            self.n_clients,
            self.n_addr,
            self.starv_stop_time,
            self.client_start_interval,
            self.starv_interval
        )
    }
}

impl ParameterGrid {
    /// Load a grid from a JSON file. Keys missing in the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<ParameterGrid> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read grid file '{}'", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid grid file '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("nClients", self.n_clients.len()),
            ("nAddr", self.n_addr.len()),
            ("starvStopTime", self.starv_stop_time.len()),
            ("clientStartInterval", self.client_start_interval.len()),
            ("starvInterval", self.starv_interval.len()),
        ];
        for (name, len) in lists {
            if len == 0 {
                bail!("parameter list '{}' is empty, nothing to sweep", name);
            }
        }
        Ok(())
    }

    /// Total number of combinations
    pub fn len(&self) -> usize {
        self.n_clients.len()
            * self.n_addr.len()
            * self.starv_stop_time.len()
            * self.client_start_interval.len()
            * self.starv_interval.len()
    }

    /// All combinations in nested order, client count outermost and
    /// starvation interval innermost.
    pub fn combinations(&self) -> impl Iterator<Item = Combination> + '_ {
        self.n_clients.iter().flat_map(move |&n_clients| {
            self.n_addr.iter().flat_map(move |&n_addr| {
                self.starv_stop_time.iter().flat_map(move |&starv_stop_time| {
                    self.client_start_interval
                        .iter()
                        .flat_map(move |&client_start_interval| {
                            self.starv_interval.iter().map(move |&starv_interval| Combination {
                                n_clients,
                                n_addr,
                                starv_stop_time,
                                client_start_interval,
                                starv_interval,
                            })
                        })
                })
            })
        })
    }
}
