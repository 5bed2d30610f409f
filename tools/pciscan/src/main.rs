//! PCI inventory tool.
//!
//! Sweeps PCI configuration space through the legacy CAM ports and prints
//! every present function with its vendor and device name.
//!
//! Pipeline: resolve settings → parse pci.ids → open port channel →
//!           enumerate buses → sort and print table.

mod channel;
mod cli;
mod config;
mod report;
mod verbose;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use pci_ids::IdDatabase;

use crate::channel::IoPortChannel;
use crate::config::Settings;
use crate::verbose::{Timer, dprintln, vprintln};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    let settings = Settings::resolve(&cli)?;
    vprintln!("Settings: {settings:?}");

    let db = load_database(&settings)?;
    let devices = scan(&settings)?;

    dprintln!("Sort devices...");
    let rows = report::build_rows(devices, &db);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    report::render(&rows, settings.widths, &mut out).context("failed to write device table")?;
    out.flush().context("failed to write device table")?;

    let summary = report::Summary::of(&rows);
    dprintln!(
        "{} device(s) found, {} with unknown vendor, {} with unknown device",
        summary.devices,
        summary.unknown_vendors,
        summary.unknown_devices
    );
    Ok(())
}

/// Read and parse the identifier database named in `settings`.
fn load_database(settings: &Settings) -> Result<IdDatabase> {
    let path = &settings.ids_path;
    dprintln!("Parse {}...", path.display());
    let _t = Timer::start("identifier database");

    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read identifier database {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let db = IdDatabase::parse(&text)
        .with_context(|| format!("malformed identifier database {}", path.display()))?;

    vprintln!(
        "  {} vendors, {} devices loaded",
        db.vendor_count(),
        db.device_count()
    );
    Ok(db)
}

/// Open the port channel and sweep the configured buses.
///
/// The channel is dropped (and its port grant revoked) before returning,
/// on success and on failure alike.
fn scan(settings: &Settings) -> Result<Vec<pciscan_core::Device>> {
    let mut channel = IoPortChannel::open().context("failed to open port I/O channel")?;

    dprintln!("Scan all devices...");
    let _t = Timer::start("bus sweep");
    let devices = pciscan_core::enumerate_buses(&mut channel, settings.buses.to_range())
        .with_context(|| format!("port I/O failed while scanning buses {}", settings.buses))?;

    vprintln!("  {} present function(s)", devices.len());
    Ok(devices)
}
