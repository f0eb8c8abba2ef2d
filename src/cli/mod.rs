use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod collect;
mod config;
mod demo;
mod info;
mod list;
mod run;

/// smash-analyze - Stream decoder and analysis runner for binary particle output
#[derive(Parser)]
#[command(name = "smash-analyze")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a registered analysis over a particle stream
    Run {
        /// Input particle stream
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Analysis name (see `list`)
        #[arg(short, long)]
        analysis: Option<String>,

        /// Quantities to decode, comma separated (defaults to what the analysis needs)
        #[arg(short, long, value_delimiter = ',')]
        quantities: Vec<String>,

        /// Save the result to this path
        #[arg(short, long, value_name = "PATH")]
        save: Option<PathBuf>,

        /// Do not print the result summary
        #[arg(long)]
        quiet: bool,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Decode quantities and dump them as JSON
    Collect {
        /// Input particle stream
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Quantities to decode, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        quantities: Vec<String>,

        /// Emit one record per particle instead of columns
        #[arg(long)]
        dict: bool,

        /// Write JSON to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Display header, layout and block statistics of a particle stream
    Info {
        /// Input particle stream
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List registered analyses and known quantities
    List,

    /// Generate a synthetic particle stream for testing
    Demo {
        /// Output file path
        #[arg(value_name = "OUTPUT", default_value = "demo_particles.bin")]
        output: PathBuf,

        /// Number of events
        #[arg(short, long, default_value = "10")]
        events: u32,

        /// Ensembles per event
        #[arg(long, default_value = "1")]
        ensembles: u32,

        /// Seed for the particle generator
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            file,
            analysis,
            quantities,
            save,
            quiet,
            config,
        } => run::run(file, analysis, quantities, save, quiet, config),
        Commands::Collect {
            file,
            quantities,
            dict,
            output,
        } => collect::run(file, quantities, dict, output),
        Commands::Info { file } => info::run(file),
        Commands::List => list::run(),
        Commands::Demo {
            output,
            events,
            ensembles,
            seed,
        } => demo::run(output, events, ensembles, seed),
    }
}
