//! Register 0 of a function's configuration space, and the device record
//! produced by enumeration.

use crate::address::ConfigAddress;

/// Vendor ID returned when no function responds at an address.
pub const ABSENT_VENDOR_ID: u16 = 0xFFFF;

/// The first configuration-space dword: vendor ID (low 16 bits) and
/// device ID (high 16 bits).
///
/// Ordering compares `vendor_id` first, then `device_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register0 {
    /// Vendor ID.
    pub vendor_id: u16,
    /// Device ID.
    pub device_id: u16,
}

impl Register0 {
    /// Creates a register value from its two fields.
    #[must_use]
    pub const fn new(vendor_id: u16, device_id: u16) -> Self {
        Self {
            vendor_id,
            device_id,
        }
    }

    /// Decodes the raw dword read from CONFIG_DATA.
    #[must_use]
    #[inline]
    pub const fn from_raw(value: u32) -> Self {
        Self {
            vendor_id: (value & 0xFFFF) as u16,
            device_id: ((value >> 16) & 0xFFFF) as u16,
        }
    }

    /// Re-packs the two fields into the raw register layout.
    #[must_use]
    pub const fn raw(self) -> u32 {
        ((self.device_id as u32) << 16) | self.vendor_id as u32
    }

    /// Returns `true` if a function responded at this address.
    #[must_use]
    pub const fn available(self) -> bool {
        self.vendor_id != ABSENT_VENDOR_ID
    }
}

impl From<u32> for Register0 {
    fn from(value: u32) -> Self {
        Self::from_raw(value)
    }
}

/// A present PCI function discovered by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device {
    /// Where the function lives. The offset is always 0.
    pub address: ConfigAddress,
    /// Vendor and device IDs read from the function.
    pub register0: Register0,
}

impl Device {
    /// Creates a device record.
    #[must_use]
    pub const fn new(address: ConfigAddress, register0: Register0) -> Self {
        Self { address, register0 }
    }
}
