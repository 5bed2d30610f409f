//! `pciscan-core` --- PCI configuration-space addressing and bus enumeration.
//!
//! This crate knows how to talk to the legacy PCI Configuration Access
//! Mechanism (CAM): it encodes bus/slot/function/offset tuples into the
//! CONFIG_ADDRESS value, reads register 0 of a function through CONFIG_DATA,
//! and sweeps the whole address space for present functions.
//!
//! It does **not** perform port I/O itself. All hardware access goes through
//! a [`PortChannel`] supplied by the caller, which keeps the crate `no_std`
//! and lets tests drive the enumerator with a simulated bus.
//!
//! # Usage
//!
//! ```ignore
//! let mut channel = open_my_channel()?;
//! let devices = pciscan_core::enumerate(&mut channel)?;
//! for device in &devices {
//!     println!("{} {:04x}:{:04x}", device.address, device.register0.vendor_id,
//!              device.register0.device_id);
//! }
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod address;
pub mod channel;
pub mod enumerate;
pub mod register;

pub use address::ConfigAddress;
pub use channel::{CONFIG_ADDRESS, CONFIG_DATA, ConfigSpace, PortChannel};
pub use enumerate::{enumerate, enumerate_buses};
pub use register::{Device, Register0};
