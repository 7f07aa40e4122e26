use clap::Parser;

use super::{
    report::{self, ReportArgs},
    sweep::{self, SweepArgs},
    Ns3Options,
};

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// do not write the aggregated means to summary.json
    #[arg(long, action)]
    pub no_summary: bool,
}

/// Sweep all parameter combinations, then plot what the simulation recorded.
pub fn run(args: &RunArgs, opts: &Ns3Options) -> anyhow::Result<()> {
    info!("step 1: running all experiments");
    sweep::run(&args.sweep, opts)?;

    info!("step 2: generating plots");
    // always the file the sweep just produced
    let report_args = ReportArgs {
        results_file: None,
        no_summary: args.no_summary,
    };
    let figures = report::run(&report_args, opts)?;

    info!("all tasks completed successfully, generated files:");
    info!("  - {} (experiment data)", opts.results_path().display());
    for figure in figures {
        info!("  - {}", figure.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;
    use crate::{experiments::RESULTS_FILE, utils::results};

    /// Stand-in for the simulation: appends one row with the parameters it was
    /// called with, like the real example does. `sh` reads it as the `run`
    /// argument of the ns3 command line.
    const FAKE_SIMULATION: &str = r#"
f=dhcp-spoof-results.csv
[ -f "$f" ] || echo "nClients,nAddr,starvationStopTime,clientStartInterval,starvationInterval,rogueCount,legitimateCount,noAddressCount,roguePercentage" > "$f"
for a in "$@"; do
  case "$a" in
    --nClients=*) c="${a#*=}" ;;
    --nAddr=*) n="${a#*=}" ;;
    --starvStopTime=*) s="${a#*=}" ;;
    --clientStartInterval=*) i="${a#*=}" ;;
    --starvInterval=*) v="${a#*=}" ;;
  esac
done
[ "$c" = "$FAIL_CLIENTS" ] && exit 1
echo "$c,$n,$s,$i,$v,1,1,0,50" >> "$f"
"#;

    fn fake_ns3(dir: &Path) -> Ns3Options {
        fs::write(dir.join("run"), FAKE_SIMULATION).unwrap();
        Ns3Options {
            ns3_bin: "/bin/sh".into(),
            ..Ns3Options::new(dir)
        }
    }

    fn small_sweep() -> RunArgs {
        RunArgs {
            sweep: SweepArgs {
                n_clients: Some(vec![10, 20]),
                n_addr: Some(vec![50, 100]),
                starv_stop_time: Some(vec![2.0]),
                client_start_interval: Some(vec![0.2]),
                starv_interval: Some(vec![5, 10]),
                ..Default::default()
            },
            no_summary: false,
        }
    }

    #[test]
    fn stale_rows_do_not_leak_into_new_run() {
        let dir = tempfile::tempdir().unwrap();
        let opts = fake_ns3(dir.path());
        fs::write(
            opts.results_path(),
            "nClients,nAddr,starvationStopTime,clientStartInterval,starvationInterval,rogueCount,legitimateCount,noAddressCount,roguePercentage\n99,999,1,1,1,0,0,0,0\n",
        )
        .unwrap();

        run(&small_sweep(), &opts).unwrap();

        let records = results::load(&opts.results_path()).unwrap();
        assert_eq!(records.len(), 8);
        assert!(records.iter().all(|r| r.n_addr != 999));

        let output = opts.output_path();
        assert!(output.join("dhcp_spoof_results_nAddr_50.svg").exists());
        assert!(output.join("dhcp_spoof_results_nAddr_100.svg").exists());
        assert!(!output.join("dhcp_spoof_results_nAddr_999.svg").exists());
    }

    #[test]
    fn archived_results_are_kept_but_not_plotted() {
        let dir = tempfile::tempdir().unwrap();
        let opts = fake_ns3(dir.path());
        let stale = "nClients,nAddr,starvationStopTime,clientStartInterval,starvationInterval,roguePercentage\n99,999,1,1,1,0\n";
        fs::write(opts.results_path(), stale).unwrap();

        let mut args = small_sweep();
        args.sweep.archive_stale = true;
        run(&args, &opts).unwrap();

        let archived: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("dhcp-spoof-results_")
            })
            .collect();
        assert_eq!(archived.len(), 1);
        assert_eq!(fs::read_to_string(&archived[0]).unwrap(), stale);
        assert_eq!(results::load(&opts.results_path()).unwrap().len(), 8);
    }

    #[test]
    fn failed_simulation_skips_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let opts = fake_ns3(dir.path());
        // every nClients=20 run fails, the first one is combination 5 of 8
        fs::write(
            dir.path().join("run"),
            FAKE_SIMULATION.replace("$FAIL_CLIENTS", "20"),
        )
        .unwrap();

        let err = run(&small_sweep(), &opts).unwrap_err();
        assert!(err.to_string().contains("5/8"));
        assert_eq!(results::load(&opts.results_path()).unwrap().len(), 4);
        assert!(!opts.output_path().exists());
    }

    #[test]
    fn sweep_and_report_use_the_file_the_simulation_writes() {
        let dir = tempfile::tempdir().unwrap();
        let opts = fake_ns3(dir.path());
        let stale = "nClients,nAddr,starvationStopTime,clientStartInterval,starvationInterval,roguePercentage\n99,999,1,1,1,0\n";
        fs::write(dir.path().join(RESULTS_FILE), stale).unwrap();
        fs::write(dir.path().join("custom.csv"), stale).unwrap();

        run(&small_sweep(), &opts).unwrap();

        assert_eq!(opts.results_path(), dir.path().join(RESULTS_FILE));
        let records = results::load(&dir.path().join(RESULTS_FILE)).unwrap();
        assert_eq!(records.len(), 8);
        assert!(records.iter().all(|r| r.n_addr != 999));
        assert_eq!(fs::read_to_string(dir.path().join("custom.csv")).unwrap(), stale);
        assert!(!opts
            .output_path()
            .join("dhcp_spoof_results_nAddr_999.svg")
            .exists());
    }

    #[test]
    fn launch_failure_stops_at_first_combination() {
        let dir = tempfile::tempdir().unwrap();
        // a plain file without execute permission
        fs::write(dir.path().join("ns3"), "#!/bin/sh\nexit 0\n").unwrap();
        let opts = Ns3Options::new(dir.path());

        let err = run(&small_sweep(), &opts).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("1/8"));
        assert!(message.contains("failed to launch"));
        assert!(!opts.results_path().exists());
        assert!(!opts.output_path().exists());
    }
}
