//! Main binary entrypoint for covid-compare.
//!
//! Parses CLI arguments, resolves configuration, sets up logging, and runs a
//! comparison given as a subcommand or asked for interactively.

use clap::{Parser, Subcommand};
use covid_compare::{
    ComparisonRequest, Granularity, Result,
    compare::{self, prompt},
    core::{
        ChartConfig, DatasetPaths, GlobalConfig,
        config::{CliOverrides, create_figment},
    },
};
use figment::Figment;
use std::{io, path::PathBuf};

#[derive(Parser)]
#[command(name = "covid-compare")]
#[command(about = "Compare COVID-19 case and death totals between two locations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, global = true, help = "Config file (TOML)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, global = true, help = "Path to owid-covid-latest.csv")]
    world_data: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to us-states.csv")]
    states_data: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to us-counties.csv")]
    counties_data: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory the charts are written to")]
    output: Option<PathBuf>,

    #[arg(long, global = true)]
    width: Option<u32>,

    #[arg(long, global = true)]
    height: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two countries, e.g. `countries Germany France`
    Countries { first: String, second: String },

    /// Compare two US states, e.g. `states "New Jersey" Illinois`
    States { first: String, second: String },

    /// Compare two US counties, e.g. `counties "Union, New Jersey" "Cook, Illinois"`
    Counties {
        #[arg(help = "First county in 'county, state' format")]
        first: String,

        #[arg(help = "Second county in 'county, state' format")]
        second: String,
    },
}

fn main() {
    // Parse input
    let cli = Cli::parse();

    let overrides = CliOverrides {
        verbose: cli.verbose,
        world: cli.world_data,
        states: cli.states_data,
        counties: cli.counties_data,
        output_dir: cli.output,
        width: cli.width,
        height: cli.height,
    };
    let figment = create_figment(cli.config.as_deref()).map(|figment| overrides.apply(figment));

    // Toggle the tracing level, the config file may turn on verbose as well
    let verbose = figment
        .as_ref()
        .ok()
        .and_then(|figment| GlobalConfig::from_figment(figment).ok())
        .is_some_and(|global| global.verbose);
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let result = figment.and_then(|figment| execute(cli.command, &figment));

    // If anything results in an error, print and exit
    if let Err(e) = result {
        tracing::error!("{e}");

        std::process::exit(1);
    }
}

fn execute(command: Option<Commands>, figment: &Figment) -> Result<()> {
    let global = GlobalConfig::from_figment(figment)?;
    let paths = DatasetPaths::from_figment(figment)?;
    let chart_config = ChartConfig::from_figment(figment)?;
    tracing::debug!(
        "Global: {:?}, datasets: {:?}, charts: {:?}",
        global,
        paths,
        chart_config
    );

    let request = match command {
        Some(Commands::Countries { first, second }) => {
            ComparisonRequest::new(Granularity::Country, &first, &second)?
        }
        Some(Commands::States { first, second }) => {
            ComparisonRequest::new(Granularity::State, &first, &second)?
        }
        Some(Commands::Counties { first, second }) => {
            ComparisonRequest::new(Granularity::County, &first, &second)?
        }
        None => {
            let mut input = io::stdin().lock();
            let mut output = io::stdout();
            match prompt::read_request(&mut input, &mut output)? {
                Some(request) => request,
                None => return Ok(()),
            }
        }
    };

    compare::run(&paths, &chart_config, &request)?;
    tracing::info!("Comparison complete!");

    Ok(())
}
