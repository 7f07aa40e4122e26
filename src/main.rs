#[macro_use]
extern crate log;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod experiments;
mod utils;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log verbosity, `debug` also prints every simulator command line
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(flatten)]
    ns3: experiments::Ns3Options,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Sweep all parameter combinations, then plot the results
    ///
    /// Removes the results file of a previous run, runs the DHCP spoofing
    /// simulation once per combination (stopping at the first failure) and
    /// renders one 2x2 figure per address pool size.
    Run(experiments::run::RunArgs),

    /// Only run the parameter sweep
    Sweep(experiments::sweep::SweepArgs),

    /// Only plot an existing results file
    ///
    /// Groups the rows by parameter value and draws the mean rogue address
    /// percentage, one figure per address pool size.
    Report(experiments::report::ReportArgs),
}

fn main() -> anyhow::Result<()> {
    // parse command line arguments
    let args = Args::parse();

    // init logging
    SimpleLogger::new()
        .with_level(args.log_level.into())
        .init()
        .map_err(|e| anyhow::format_err!("failed to initialise logging: {}", e))?;

    match &args.command {
        Commands::Run(ev) => experiments::run::run(ev, &args.ns3)?,
        Commands::Sweep(ev) => {
            experiments::sweep::run(ev, &args.ns3)?;
        }
        Commands::Report(ev) => {
            experiments::report::run(ev, &args.ns3)?;
        }
    };

    Ok(())
}
