//! Command-line interface definitions for pciscan.

use std::path::PathBuf;

use clap::Parser;

use crate::config::BusRange;

/// Sweep PCI configuration space and list every present function.
///
/// With no arguments: parse `pci.ids` from the working directory, scan all
/// 256 buses, and print the device table.
#[derive(Parser, Debug)]
#[command(name = "pciscan", version, about)]
pub struct Cli {
    /// Path to the `pci.ids` identifier database.
    #[arg(long, value_name = "PATH")]
    pub ids: Option<PathBuf>,

    /// Configuration file (default: `pciscan.toml` if present).
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only scan this bus range, e.g. `0-3` or `2`.
    #[arg(long, short = 'b', value_name = "FIRST-LAST")]
    pub buses: Option<BusRange>,

    /// Print only the table and errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report phase timings and database statistics.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
