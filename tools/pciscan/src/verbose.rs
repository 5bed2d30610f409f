//! Progress and diagnostic output.
//!
//! Three output levels controlled by CLI flags:
//! - **Quiet** (`-q`): errors only
//! - **Default** (no flag): phase progress lines and the closing summary
//! - **Verbose** (`-v`): everything, plus phase timings and database stats
//!
//! All of it goes to stderr so stdout carries nothing but the table.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Default = 1,
    Verbose = 2,
}

/// Global verbosity level, set once at startup.
static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Default as u8);

/// Initialize the verbosity level for the current process.
pub fn init(quiet: bool, verbose: bool) {
    let level = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Default
    };
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Returns the current verbosity level.
pub fn verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Default,
    }
}

/// Returns `true` if verbose mode is active.
pub fn is_verbose() -> bool {
    verbosity() == Verbosity::Verbose
}

/// Returns `true` if quiet mode is active.
pub fn is_quiet() -> bool {
    verbosity() == Verbosity::Quiet
}

/// Print to stderr only when verbose mode is enabled.
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// Print to stderr at default verbosity and above (suppressed in quiet mode).
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// RAII timer that reports elapsed duration on drop when verbose mode is active.
///
/// ```ignore
/// let _t = Timer::start("bus sweep");
/// // ... work ...
/// // prints "  bus sweep: 42ms" on drop
/// ```
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Begin timing a labeled phase.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if is_verbose() {
            eprintln!("  {}: {:.1?}", self.label, self.start.elapsed());
        }
    }
}
