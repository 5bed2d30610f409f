//! Scan configuration.
//!
//! Settings come from three layers, highest priority first: command-line
//! flags, an optional `pciscan.toml`, and built-in defaults. The defaults
//! alone reproduce a plain `pciscan` run.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::report::ColumnWidths;

/// Configuration file looked up in the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pciscan.toml";
/// Identifier database looked up in the working directory by default.
pub const DEFAULT_IDS_FILE: &str = "pci.ids";

/// Inclusive range of bus numbers to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusRange {
    /// First bus scanned.
    pub first: u8,
    /// Last bus scanned.
    pub last: u8,
}

impl BusRange {
    /// Every bus, 0 through 255.
    pub const ALL: Self = Self {
        first: 0,
        last: u8::MAX,
    };

    fn validate(self) -> Result<Self, String> {
        if self.first > self.last {
            return Err(format!(
                "bus range {}-{} is empty (first > last)",
                self.first, self.last
            ));
        }
        Ok(self)
    }

    /// Converts to the iteration range used by the enumerator.
    pub fn to_range(self) -> RangeInclusive<u8> {
        self.first..=self.last
    }
}

impl Default for BusRange {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for BusRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

impl FromStr for BusRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bus = |text: &str| {
            text.trim()
                .parse::<u8>()
                .map_err(|e| format!("invalid bus number '{text}': {e}"))
        };
        let range = match s.split_once('-') {
            Some((first, last)) => Self {
                first: bus(first)?,
                last: bus(last)?,
            },
            None => {
                let only = bus(s)?;
                Self {
                    first: only,
                    last: only,
                }
            }
        };
        range.validate()
    }
}

/// `[table]` section of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableSection {
    /// Vendor name column width; raised to the minimum if smaller.
    pub vendor_width: Option<usize>,
    /// Device name column width; raised to the minimum if smaller.
    pub device_width: Option<usize>,
}

/// Contents of `pciscan.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Path to the identifier database, relative to the working directory.
    pub ids_path: Option<PathBuf>,
    /// Bus range to sweep.
    pub buses: Option<BusRange>,
    /// Table layout overrides.
    pub table: TableSection,
}

impl FileConfig {
    /// Parses configuration file contents.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if let Some(buses) = config.buses {
            buses.validate().map_err(anyhow::Error::msg)?;
        }
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Identifier database to load.
    pub ids_path: PathBuf,
    /// Buses to sweep.
    pub buses: BusRange,
    /// Table column widths.
    pub widths: ColumnWidths,
}

impl Settings {
    /// Resolves settings from the command line, reading the configuration
    /// file it names (or the default one, if it exists).
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(FileConfig::load(path)?),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Some(FileConfig::load(default)?)
                } else {
                    None
                }
            }
        };
        Ok(Self::merge(cli, file.unwrap_or_default()))
    }

    /// Layers command-line flags over file settings over defaults.
    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let ids_path = cli
            .ids
            .clone()
            .or(file.ids_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IDS_FILE));
        let buses = cli.buses.or(file.buses).unwrap_or_default();

        let defaults = ColumnWidths::default();
        let widths = ColumnWidths::new(
            file.table.vendor_width.unwrap_or(defaults.vendor),
            file.table.device_width.unwrap_or(defaults.device),
        );

        Self {
            ids_path,
            buses,
            widths,
        }
    }
}
