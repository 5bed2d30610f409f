//! `pci-ids` --- a standalone, `no_std` parser for the `pci.ids` database.
//!
//! The database is a line-oriented text file mapping 16-bit vendor and
//! device IDs to display names:
//!
//! ```text
//! # comment
//! 8086  Intel Corporation
//! 	1237  440FX - 82441FX PMC [Natoma]
//! 		1af4 1100  Qemu virtual machine
//! ```
//!
//! Vendor lines start in column 0, device lines are indented by one tab,
//! and subsystem lines by two tabs (subsystems are skipped). The trailing
//! device-class section (lines starting with `C `) is not loaded.
//!
//! # Usage
//!
//! ```ignore
//! let db = IdDatabase::parse(&text)?;
//! println!("{}", db.device_name(0x8086, 0x1237));
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

mod parser;

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

/// Placeholder returned for any vendor or device that is not in the
/// database.
pub const NOT_AVAILABLE: &str = "N/A";

/// What was wrong with a malformed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// The line ends before the ID, separator, and name.
    Truncated,
    /// The 4-character ID field is not hexadecimal.
    InvalidId,
    /// The ID is not followed by two spaces.
    MissingSeparator,
    /// A device line appeared before any vendor line.
    DeviceWithoutVendor,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => f.write_str("record is truncated"),
            Self::InvalidId => f.write_str("ID is not a 4-digit hexadecimal number"),
            Self::MissingSeparator => f.write_str("ID is not followed by two spaces"),
            Self::DeviceWithoutVendor => f.write_str("device record has no preceding vendor"),
        }
    }
}

/// A malformed record, with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// Line on which the record appears.
    pub line: usize,
    /// What was wrong with it.
    pub kind: RecordError,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl core::error::Error for ParseError {}

/// Vendor and device names loaded from a `pci.ids` source.
///
/// Built once, then only read. Lookups never fail: misses resolve to
/// [`NOT_AVAILABLE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdDatabase {
    vendors: BTreeMap<u16, String>,
    devices: BTreeMap<u16, BTreeMap<u16, String>>,
}

impl IdDatabase {
    /// Parses the full text of a `pci.ids` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for the first malformed record. The whole
    /// load fails rather than silently dropping rows.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parser::parse(source)
    }

    /// Returns the vendor's display name, or [`NOT_AVAILABLE`].
    #[must_use]
    pub fn vendor_name(&self, vendor_id: u16) -> &str {
        self.vendors
            .get(&vendor_id)
            .map_or(NOT_AVAILABLE, String::as_str)
    }

    /// Returns the device's display name, or [`NOT_AVAILABLE`] if either the
    /// vendor or the device is unknown.
    #[must_use]
    pub fn device_name(&self, vendor_id: u16, device_id: u16) -> &str {
        self.devices
            .get(&vendor_id)
            .and_then(|devices| devices.get(&device_id))
            .map_or(NOT_AVAILABLE, String::as_str)
    }

    /// Returns `true` if the vendor has an entry.
    #[must_use]
    pub fn contains_vendor(&self, vendor_id: u16) -> bool {
        self.vendors.contains_key(&vendor_id)
    }

    /// Number of vendors loaded.
    #[must_use]
    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }

    /// Number of devices loaded, across all vendors.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.values().map(BTreeMap::len).sum()
    }

    fn insert_vendor(&mut self, vendor_id: u16, name: &str) {
        self.vendors.insert(vendor_id, String::from(name));
    }

    fn insert_device(&mut self, vendor_id: u16, device_id: u16, name: &str) {
        self.devices
            .entry(vendor_id)
            .or_default()
            .insert(device_id, String::from(name));
    }
}
