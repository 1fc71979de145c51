//! # chiforest
//!
//! Command-line front end of the chi_c / chi_b candidate selection.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a synthetic forest
//! chiforest demo demo_forest.zip --events 100000
//!
//! # Show its tables and columns
//! chiforest info demo_forest.zip
//!
//! # Run the selection and draw all categories on one canvas
//! chiforest -v run --config analysis.toml --render together
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
