use std::cmp::Ordering;

use serde::Serialize;

use super::results::ResultRecord;

/// The swept simulator parameters as they appear in the results table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    ClientCount,
    AddressPool,
    StarvationStopTime,
    ClientStartInterval,
    StarvationInterval,
}

impl Param {
    pub const ALL: [Param; 5] = [
        Param::ClientCount,
        Param::AddressPool,
        Param::StarvationStopTime,
        Param::ClientStartInterval,
        Param::StarvationInterval,
    ];

    pub fn value(self, record: &ResultRecord) -> f64 {
        match self {
            Param::ClientCount => record.n_clients as f64,
            Param::AddressPool => record.n_addr as f64,
            Param::StarvationStopTime => record.starv_stop_time,
            Param::ClientStartInterval => record.client_start_interval,
            Param::StarvationInterval => record.starv_interval as f64,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Param::ClientCount => "nClients",
            Param::AddressPool => "nAddr",
            Param::StarvationStopTime => "starvationStopTime",
            Param::ClientStartInterval => "clientStartInterval",
            Param::StarvationInterval => "starvationInterval",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Param::ClientCount => "Number of Clients",
            Param::AddressPool => "Address Pool Size",
            Param::StarvationStopTime => "Starvation Stop Time (s)",
            Param::ClientStartInterval => "Client Start Interval (s)",
            Param::StarvationInterval => "Starvation Interval (ms)",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Param::ClientCount => "Number of Clients vs Rogue Percentage",
            Param::AddressPool => "Address Pool Size vs Rogue Percentage",
            Param::StarvationStopTime => "Starvation Stop Time vs Rogue Percentage",
            Param::ClientStartInterval => "Client Start Interval vs Rogue Percentage",
            Param::StarvationInterval => "Starvation Interval vs Rogue Percentage",
        }
    }
}

pub const METRIC_LABEL: &str = "Rogue Address Percentage (%)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// `None` for the single series of an ungrouped panel
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
}

/// Everything drawn in the figure of one address pool size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolReport {
    pub n_addr: u32,
    pub rows: usize,
    pub panels: Vec<Panel>,
}

/// Sorted, deduplicated values of `param`
pub fn distinct_values<'a>(
    rows: impl IntoIterator<Item = &'a ResultRecord>,
    param: Param,
) -> Vec<f64> {
    let mut values: Vec<f64> = rows.into_iter().map(|r| param.value(r)).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Arithmetic mean of the rogue percentage for every distinct value of
/// `param`, ordered by that value. Values without rows do not appear.
pub fn group_mean<'a>(
    rows: impl IntoIterator<Item = &'a ResultRecord>,
    param: Param,
) -> Vec<(f64, f64)> {
    let mut keyed: Vec<(f64, f64)> = rows
        .into_iter()
        .map(|r| (param.value(r), r.rogue_percentage))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut groups: Vec<(f64, f64, usize)> = Vec::new();
    for (key, value) in keyed {
        match groups.last_mut() {
            Some((k, sum, n)) if k.total_cmp(&key) == Ordering::Equal => {
                *sum += value;
                *n += 1;
            }
            _ => groups.push((key, value, 1)),
        }
    }

    groups
        .into_iter()
        .map(|(key, sum, n)| (key, sum / n as f64))
        .collect()
}

fn per_client_panel(pool_rows: &[&ResultRecord], clients: &[f64], x: Param) -> Panel {
    let series = clients
        .iter()
        .filter_map(|&n| {
            let rows = pool_rows
                .iter()
                .copied()
                .filter(|r| Param::ClientCount.value(r) == n);
            let points = group_mean(rows, x);
            if points.is_empty() {
                return None;
            }
            Some(Series {
                label: Some(format!("nClients={}", n)),
                points,
            })
        })
        .collect();

    Panel {
        title: x.title(),
        x_label: x.axis_label(),
        y_label: METRIC_LABEL,
        series,
    }
}

/// Build one report per distinct address pool size, in ascending order.
///
/// The client counts used for the per-client series are taken from the whole
/// table, not just the pool.
pub fn build_reports(rows: &[ResultRecord]) -> Vec<PoolReport> {
    let clients = distinct_values(rows, Param::ClientCount);

    distinct_values(rows, Param::AddressPool)
        .into_iter()
        .map(|pool| {
            let pool_rows: Vec<&ResultRecord> = rows
                .iter()
                .filter(|r| Param::AddressPool.value(r) == pool)
                .collect();

            let mut panels: Vec<Panel> = [
                Param::StarvationStopTime,
                Param::ClientStartInterval,
                Param::StarvationInterval,
            ]
            .into_iter()
            .map(|x| per_client_panel(&pool_rows, &clients, x))
            .collect();

            panels.push(Panel {
                title: Param::ClientCount.title(),
                x_label: Param::ClientCount.axis_label(),
                y_label: METRIC_LABEL,
                series: vec![Series {
                    label: None,
                    points: group_mean(pool_rows.iter().copied(), Param::ClientCount),
                }],
            });

            PoolReport {
                n_addr: pool as u32,
                rows: pool_rows.len(),
                panels,
            }
        })
        .collect()
}
