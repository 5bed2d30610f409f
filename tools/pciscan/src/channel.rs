//! Privileged port-I/O channel for Linux on x86_64.
//!
//! Opening the channel asks the kernel for access to the CAM port window
//! (`0xCF8..0xD00`) with `ioperm(2)`; after that, accesses are plain
//! `in`/`out` instructions. Dropping the channel gives the ports back.
//! Requires `CAP_SYS_RAWIO` (in practice: root).

use std::fmt;
use std::io;

use pciscan_core::{CONFIG_ADDRESS, PortChannel};

/// Number of ports covered by the CAM window (CONFIG_ADDRESS and
/// CONFIG_DATA, 4 bytes each).
const CAM_WINDOW_LEN: u16 = 8;

/// Errors raised by [`IoPortChannel`].
#[derive(Debug)]
pub enum ChannelError {
    /// Port I/O is not available on this platform.
    Unsupported,
    /// The kernel refused the `ioperm` request.
    Open {
        /// First port requested.
        base: u16,
        /// Number of ports requested.
        len: u16,
        /// Underlying OS error.
        source: io::Error,
    },
    /// An access fell outside the granted port window.
    PortNotGranted {
        /// Port that was accessed.
        port: u16,
    },
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => {
                f.write_str("raw port I/O is only supported on Linux x86_64")
            }
            Self::Open { base, len, source } => {
                write!(f, "ioperm({base:#x}, {len}) failed: {source}")
            }
            Self::PortNotGranted { port } => {
                write!(f, "port {port:#06x} is outside the granted window")
            }
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Scoped grant of the CAM port window.
#[derive(Debug)]
pub struct IoPortChannel {
    base: u16,
    len: u16,
}

impl IoPortChannel {
    /// Acquires access to CONFIG_ADDRESS and CONFIG_DATA.
    pub fn open() -> Result<Self, ChannelError> {
        Self::open_window(CONFIG_ADDRESS, CAM_WINDOW_LEN)
    }

    fn open_window(base: u16, len: u16) -> Result<Self, ChannelError> {
        sys::ioperm(base, len, true).map_err(|source| match source {
            sys::PermError::Unsupported => ChannelError::Unsupported,
            sys::PermError::Os(source) => ChannelError::Open { base, len, source },
        })?;
        Ok(Self { base, len })
    }

    /// Checks that a 32-bit access at `port` lies inside the window.
    fn check(&self, port: u16) -> Result<(), ChannelError> {
        let end = u32::from(self.base) + u32::from(self.len);
        if port >= self.base && u32::from(port) + 4 <= end {
            Ok(())
        } else {
            Err(ChannelError::PortNotGranted { port })
        }
    }
}

impl PortChannel for IoPortChannel {
    type Error = ChannelError;

    fn read_port32(&mut self, port: u16) -> Result<u32, ChannelError> {
        self.check(port)?;
        // SAFETY: `check` confirmed the port is inside the window that
        // `ioperm` granted when this channel was opened.
        Ok(unsafe { sys::inl(port) })
    }

    fn write_port32(&mut self, port: u16, value: u32) -> Result<(), ChannelError> {
        self.check(port)?;
        // SAFETY: Same as `read_port32`. Only CONFIG_ADDRESS/CONFIG_DATA are
        // reachable, and the enumerator writes only CONFIG_ADDRESS.
        unsafe { sys::outl(port, value) };
        Ok(())
    }
}

impl Drop for IoPortChannel {
    fn drop(&mut self) {
        // Nothing useful to do if revoking fails; the grant dies with the
        // process anyway.
        let _ = sys::ioperm(self.base, self.len, false);
    }
}

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
mod sys {
    use std::io;

    /// `ioperm` on x86_64 Linux.
    const SYS_IOPERM: usize = 173;

    pub enum PermError {
        #[allow(dead_code)]
        Unsupported,
        Os(io::Error),
    }

    /// Issue a syscall with 3 arguments.
    #[inline(always)]
    fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> isize {
        let ret: isize;
        // SAFETY: `syscall` is the defined userspace-to-kernel transition.
        // Arguments go in RDI, RSI, RDX; RCX and R11 are clobbered.
        unsafe {
            core::arch::asm!(
                "syscall",
                inlateout("rax") nr as isize => ret,
                in("rdi") a0,
                in("rsi") a1,
                in("rdx") a2,
                lateout("rcx") _,
                lateout("r11") _,
                options(nostack),
            );
        }
        ret
    }

    pub fn ioperm(base: u16, len: u16, enable: bool) -> Result<(), PermError> {
        let ret = syscall3(
            SYS_IOPERM,
            usize::from(base),
            usize::from(len),
            usize::from(enable),
        );
        if ret < 0 {
            let errno = i32::try_from(-ret).unwrap_or(i32::MAX);
            return Err(PermError::Os(io::Error::from_raw_os_error(errno)));
        }
        Ok(())
    }

    /// Reads a dword with `in eax, dx`.
    ///
    /// # Safety
    ///
    /// The process must hold I/O permission for `port..port + 4`.
    #[inline]
    pub unsafe fn inl(port: u16) -> u32 {
        let value: u32;
        unsafe {
            core::arch::asm!(
                "in eax, dx",
                in("dx") port,
                out("eax") value,
                options(nomem, nostack, preserves_flags),
            );
        }
        value
    }

    /// Writes a dword with `out dx, eax`.
    ///
    /// # Safety
    ///
    /// The process must hold I/O permission for `port..port + 4`.
    #[inline]
    pub unsafe fn outl(port: u16, value: u32) {
        unsafe {
            core::arch::asm!(
                "out dx, eax",
                in("dx") port,
                in("eax") value,
                options(nomem, nostack, preserves_flags),
            );
        }
    }
}

#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
mod sys {
    pub enum PermError {
        Unsupported,
        #[allow(dead_code)]
        Os(std::io::Error),
    }

    pub fn ioperm(_base: u16, _len: u16, _enable: bool) -> Result<(), PermError> {
        Err(PermError::Unsupported)
    }

    pub unsafe fn inl(_port: u16) -> u32 {
        unreachable!("IoPortChannel cannot be opened on this platform")
    }

    pub unsafe fn outl(_port: u16, _value: u32) {
        unreachable!("IoPortChannel cannot be opened on this platform")
    }
}
