//! PCI bus enumeration.
//!
//! Brute-force sweep of every bus/slot/function triple through legacy CAM,
//! reading register 0 of each. Unlike a bridge-walking scan, this visits all
//! 256 x 32 x 8 functions, so it finds devices behind bridges the firmware
//! left unconfigured and never depends on header-type decoding.

use alloc::vec::Vec;
use core::ops::RangeInclusive;

use crate::address::{ConfigAddress, MAX_FUNCTION, MAX_SLOT};
use crate::channel::{ConfigSpace, PortChannel};
use crate::register::Device;

/// Enumerates every present function on buses 0 through 255.
///
/// Devices are returned in bus-major, then slot, then function order.
///
/// # Errors
///
/// The first channel error aborts the sweep and is returned as-is; no
/// partial device list is produced.
pub fn enumerate<C: PortChannel>(channel: &mut C) -> Result<Vec<Device>, C::Error> {
    enumerate_buses(channel, 0..=u8::MAX)
}

/// Enumerates every present function on the given range of buses.
///
/// # Errors
///
/// Same as [`enumerate`].
pub fn enumerate_buses<C: PortChannel>(
    channel: &mut C,
    buses: RangeInclusive<u8>,
) -> Result<Vec<Device>, C::Error> {
    let mut config = ConfigSpace::new(channel);
    let mut devices = Vec::new();

    for bus in buses {
        for slot in 0..=MAX_SLOT {
            for function in 0..=MAX_FUNCTION {
                let register0 = config.read_register0(bus, slot, function)?;
                if !register0.available() {
                    continue;
                }
                let address = ConfigAddress::new(bus, slot, function, 0);
                devices.push(Device::new(address, register0));
            }
        }
    }

    Ok(devices)
}
