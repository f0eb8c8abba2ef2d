//! # smash-analyze
//!
//! Command-line front end for decoding binary particle streams.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a synthetic stream
//! smash-analyze demo particles.bin --events 50
//!
//! # Inspect the header and block counts
//! smash-analyze info particles.bin
//!
//! # Run a registered analysis and save its result
//! smash-analyze run particles.bin -a pt_spectrum -q px,py --save pt.json
//!
//! # Dump decoded columns as JSON
//! smash-analyze collect particles.bin -q px,pdg_id -o columns.json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
