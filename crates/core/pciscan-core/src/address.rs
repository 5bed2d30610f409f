//! CONFIG_ADDRESS encoding.
//!
//! The value written to port `0xCF8` selects one dword of one function's
//! configuration space:
//!
//! | Bits  | Field            |
//! |-------|------------------|
//! | 31    | Enable           |
//! | 30-24 | Reserved (zero)  |
//! | 23-16 | Bus number       |
//! | 15-11 | Slot (device)    |
//! | 10-8  | Function number  |
//! | 7-0   | Register offset  |

use core::fmt;

/// Enable bit of CONFIG_ADDRESS. Config cycles are only generated when set.
pub const ENABLE_BIT: u32 = 1 << 31;

/// Highest valid slot number (5 bits).
pub const MAX_SLOT: u8 = 0x1F;
/// Highest valid function number (3 bits).
pub const MAX_FUNCTION: u8 = 0x07;

/// A bus/slot/function address plus a register offset within its
/// configuration space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigAddress {
    /// Bus number (0-255).
    pub bus: u8,
    /// Slot (device) number on the bus (0-31).
    pub slot: u8,
    /// Function number within the slot (0-7).
    pub function: u8,
    /// Byte offset of the register within configuration space.
    pub offset: u8,
}

impl ConfigAddress {
    /// Creates an address for the given function and register offset.
    ///
    /// `slot` must fit in 5 bits and `function` in 3 bits; callers iterate
    /// bounded ranges, so this is only checked in debug builds.
    #[must_use]
    pub const fn new(bus: u8, slot: u8, function: u8, offset: u8) -> Self {
        debug_assert!(slot <= MAX_SLOT, "slot out of range");
        debug_assert!(function <= MAX_FUNCTION, "function out of range");
        Self {
            bus,
            slot,
            function,
            offset,
        }
    }

    /// Encodes this address as the 32-bit CONFIG_ADDRESS value.
    ///
    /// The enable bit is always set and the reserved bits are always zero.
    #[must_use]
    #[inline]
    pub const fn encode(self) -> u32 {
        ENABLE_BIT
            | ((self.bus as u32) << 16)
            | (((self.slot & MAX_SLOT) as u32) << 11)
            | (((self.function & MAX_FUNCTION) as u32) << 8)
            | self.offset as u32
    }

    /// Decodes a CONFIG_ADDRESS value back into its fields.
    ///
    /// The enable and reserved bits are ignored.
    #[must_use]
    #[inline]
    pub const fn decode(value: u32) -> Self {
        Self {
            bus: (value >> 16) as u8,
            slot: ((value >> 11) as u8) & MAX_SLOT,
            function: ((value >> 8) as u8) & MAX_FUNCTION,
            offset: value as u8,
        }
    }
}

impl From<ConfigAddress> for u32 {
    fn from(address: ConfigAddress) -> Self {
        address.encode()
    }
}

impl From<u32> for ConfigAddress {
    fn from(value: u32) -> Self {
        Self::decode(value)
    }
}

impl fmt::Display for ConfigAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{:02x}.{}", self.bus, self.slot, self.function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_values() {
        assert_eq!(ConfigAddress::new(0, 0, 0, 0).encode(), 0x8000_0000);
        assert_eq!(ConfigAddress::new(0xFF, 0x1F, 7, 0xFC).encode(), 0x80FF_FFFC);
        // 00:1f.3, offset 0x10
        assert_eq!(ConfigAddress::new(0, 0x1F, 3, 0x10).encode(), 0x8000_FB10);
        // 02:05.1
        assert_eq!(ConfigAddress::new(2, 5, 1, 0).encode(), 0x8002_2900);
    }

    #[test]
    fn decode_inverts_encode_everywhere() {
        for bus in 0..=255u8 {
            for slot in 0..=MAX_SLOT {
                for function in 0..=MAX_FUNCTION {
                    for offset in [0u8, 1, 4, 0x3C, 0x80, 0xFF] {
                        let addr = ConfigAddress::new(bus, slot, function, offset);
                        let encoded = addr.encode();
                        assert_eq!(encoded & ENABLE_BIT, ENABLE_BIT);
                        assert_eq!(encoded & 0x7F00_0000, 0, "reserved bits set");
                        assert_eq!(ConfigAddress::decode(encoded), addr);
                    }
                }
            }
        }
    }

    #[test]
    fn every_offset_survives() {
        for offset in 0..=255u8 {
            let addr = ConfigAddress::new(0x12, 3, 4, offset);
            assert_eq!(ConfigAddress::decode(addr.encode()), addr);
        }
    }

    #[test]
    fn decode_ignores_control_bits() {
        let addr = ConfigAddress::decode(0x7F00_0000 | 0x0001_0800);
        assert_eq!(addr, ConfigAddress::new(1, 1, 0, 0));
    }

    #[test]
    fn display_is_bdf() {
        use alloc::string::ToString;

        assert_eq!(ConfigAddress::new(0, 0x1F, 3, 0).to_string(), "00:1f.3");
        assert_eq!(ConfigAddress::new(0xA, 2, 0, 0x40).to_string(), "0a:02.0");
    }
}
