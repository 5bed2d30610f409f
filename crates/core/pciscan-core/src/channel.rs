//! Port channel abstraction and configuration-space access over it.
//!
//! The CAM mechanism is a two-step dance: write the target address to
//! CONFIG_ADDRESS (`0xCF8`), then read the selected dword from CONFIG_DATA
//! (`0xCFC`). [`ConfigSpace`] performs that sequence on top of any
//! [`PortChannel`].

use crate::address::ConfigAddress;
use crate::register::Register0;

/// CONFIG_ADDRESS I/O port.
pub const CONFIG_ADDRESS: u16 = 0x0CF8;
/// CONFIG_DATA I/O port.
pub const CONFIG_DATA: u16 = 0x0CFC;

/// A privileged channel capable of 32-bit port I/O.
///
/// Implementations own whatever handle grants port access and release it
/// when dropped. Errors are never folded into data values: a failed access
/// must surface as `Err`, not as `0xFFFF_FFFF`.
pub trait PortChannel {
    /// Error raised when a port access fails.
    type Error;

    /// Reads a 32-bit value from `port`.
    ///
    /// # Errors
    ///
    /// Returns the channel's error if the access could not be performed.
    fn read_port32(&mut self, port: u16) -> Result<u32, Self::Error>;

    /// Writes a 32-bit value to `port`.
    ///
    /// # Errors
    ///
    /// Returns the channel's error if the access could not be performed.
    fn write_port32(&mut self, port: u16, value: u32) -> Result<(), Self::Error>;
}

impl<C: PortChannel + ?Sized> PortChannel for &mut C {
    type Error = C::Error;

    fn read_port32(&mut self, port: u16) -> Result<u32, Self::Error> {
        (**self).read_port32(port)
    }

    fn write_port32(&mut self, port: u16, value: u32) -> Result<(), Self::Error> {
        (**self).write_port32(port, value)
    }
}

/// Configuration-space reader borrowing a [`PortChannel`].
///
/// The address/data port pair is global hardware state, so the accessor
/// holds the channel mutably for its whole lifetime.
pub struct ConfigSpace<'c, C: PortChannel> {
    channel: &'c mut C,
}

impl<'c, C: PortChannel> ConfigSpace<'c, C> {
    /// Wraps a channel.
    pub fn new(channel: &'c mut C) -> Self {
        Self { channel }
    }

    /// Reads the dword selected by `address`.
    ///
    /// The offset should be dword-aligned; the low two bits are passed
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Propagates any error from the address write or the data read.
    pub fn read_u32(&mut self, address: ConfigAddress) -> Result<u32, C::Error> {
        self.channel.write_port32(CONFIG_ADDRESS, address.encode())?;
        self.channel.read_port32(CONFIG_DATA)
    }

    /// Reads register 0 (vendor and device ID) of a function.
    ///
    /// # Errors
    ///
    /// Propagates any channel error.
    pub fn read_register0(
        &mut self,
        bus: u8,
        slot: u8,
        function: u8,
    ) -> Result<Register0, C::Error> {
        self.read_u32(ConfigAddress::new(bus, slot, function, 0))
            .map(Register0::from_raw)
    }
}
