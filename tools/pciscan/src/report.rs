//! Device table: join scan results with names, sort, and render.

use std::io::{self, Write};

use pci_ids::{IdDatabase, NOT_AVAILABLE};
use pciscan_core::{Device, Register0};

/// Width of the BUS/SLOT/FUNC/VID/DID columns.
pub const NUMERIC_WIDTH: usize = 4;
/// Narrowest vendor name column; fits every vendor in current `pci.ids`.
pub const MIN_VENDOR_WIDTH: usize = 45;
/// Narrowest device name column; fits every device in current `pci.ids`.
pub const MIN_DEVICE_WIDTH: usize = 75;

/// Widths of the two name columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    /// Vendor name column.
    pub vendor: usize,
    /// Device name column.
    pub device: usize,
}

impl ColumnWidths {
    /// Creates widths, raising each to its minimum.
    pub fn new(vendor: usize, device: usize) -> Self {
        Self {
            vendor: vendor.max(MIN_VENDOR_WIDTH),
            device: device.max(MIN_DEVICE_WIDTH),
        }
    }
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self::new(MIN_VENDOR_WIDTH, MIN_DEVICE_WIDTH)
    }
}

/// Names resolved for one device. Borrowed from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo<'db> {
    /// Vendor display name, or `N/A`.
    pub vendor_name: &'db str,
    /// Device display name, or `N/A`.
    pub device_name: &'db str,
}

impl<'db> DeviceInfo<'db> {
    /// Looks up both names for a register 0 value.
    pub fn resolve(db: &'db IdDatabase, register0: Register0) -> Self {
        Self {
            vendor_name: db.vendor_name(register0.vendor_id),
            device_name: db.device_name(register0.vendor_id, register0.device_id),
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow<'db> {
    /// The scanned function.
    pub device: Device,
    /// Its resolved names.
    pub info: DeviceInfo<'db>,
}

/// Joins devices with their names and orders them by
/// `(vendor_id, device_id)`.
///
/// The sort is stable: devices with identical IDs keep their enumeration
/// (address) order.
pub fn build_rows(mut devices: Vec<Device>, db: &IdDatabase) -> Vec<ReportRow<'_>> {
    devices.sort_by_key(|device| device.register0);
    devices
        .into_iter()
        .map(|device| ReportRow {
            device,
            info: DeviceInfo::resolve(db, device.register0),
        })
        .collect()
}

/// Writes the header and one line per row.
pub fn render<W: Write>(
    rows: &[ReportRow<'_>],
    widths: ColumnWidths,
    out: &mut W,
) -> io::Result<()> {
    let (vw, dw) = (widths.vendor, widths.device);
    writeln!(
        out,
        "|{:<n$}|{:<n$}|{:<n$}|{:<n$}|{:<n$}|{:<vw$}|{:<dw$}",
        "BUS",
        "SLOT",
        "FUNC",
        "VID",
        "DID",
        "Vendor Name",
        "Device Name",
        n = NUMERIC_WIDTH,
    )?;

    for row in rows {
        let address = row.device.address;
        let register0 = row.device.register0;
        writeln!(
            out,
            "|{:<n$}|{:<n$}|{:<n$}|{:04x}|{:04x}|{:<vw$}|{:<dw$}",
            address.bus,
            address.slot,
            address.function,
            register0.vendor_id,
            register0.device_id,
            row.info.vendor_name,
            row.info.device_name,
            n = NUMERIC_WIDTH,
        )?;
    }
    Ok(())
}

/// Counts reported after the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Rows in the table.
    pub devices: usize,
    /// Rows whose vendor did not resolve.
    pub unknown_vendors: usize,
    /// Rows whose device did not resolve.
    pub unknown_devices: usize,
}

impl Summary {
    /// Tallies a finished set of rows.
    pub fn of(rows: &[ReportRow<'_>]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            summary.devices += 1;
            if row.info.vendor_name == NOT_AVAILABLE {
                summary.unknown_vendors += 1;
            }
            if row.info.device_name == NOT_AVAILABLE {
                summary.unknown_devices += 1;
            }
            summary
        })
    }
}
