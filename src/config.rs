//! Open modes and configuration for archive maps
//!
//! Options can be built in code or loaded from a TOML file:
//!
//! ```toml
//! mode = "append"          # read | write | append (r / w / a also accepted)
//! compression = "deflated" # stored | deflated | zstd
//! compression_level = 6
//! sync_on_flush = true
//! ```

use crate::error::{Result, ZhipError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Mode the underlying archive is opened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// Existing archive, reads only
    #[serde(alias = "r")]
    Read,
    /// Truncates (or creates) the file every time the handle is opened
    #[serde(alias = "w")]
    Write,
    /// Keeps existing entries and appends new ones, creating the file if missing
    #[default]
    #[serde(alias = "a")]
    Append,
}

impl OpenMode {
    /// Whether entries can be written in this mode
    pub fn is_writable(self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

impl FromStr for OpenMode {
    type Err = ZhipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "read" => Ok(OpenMode::Read),
            "w" | "write" => Ok(OpenMode::Write),
            "a" | "append" => Ok(OpenMode::Append),
            other => Err(ZhipError::Config(format!("unknown open mode: {}", other))),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpenMode::Read => "read",
            OpenMode::Write => "write",
            OpenMode::Append => "append",
        };
        f.write_str(name)
    }
}

/// Compression applied to newly written entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Stored,
    Deflated,
    Zstd,
}

impl From<Compression> for zip::CompressionMethod {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Stored => zip::CompressionMethod::Stored,
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Zstd => zip::CompressionMethod::Zstd,
        }
    }
}

/// Configuration for an [`ArchiveMap`](crate::ArchiveMap)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapOptions {
    pub mode: OpenMode,
    pub compression: Compression,
    /// Library-specific level; `None` uses the method's default
    pub compression_level: Option<i64>,
    /// Also fsync the archive file when flushing
    pub sync_on_flush: bool,
}

impl MapOptions {
    /// Options with the given mode and defaults for everything else
    pub fn new(mode: OpenMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level);
        self
    }

    pub fn with_sync_on_flush(mut self, sync: bool) -> Self {
        self.sync_on_flush = sync;
        self
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load options from a TOML file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// File options handed to the zip writer for each new entry
    pub(crate) fn file_options(&self) -> zip::write::SimpleFileOptions {
        zip::write::SimpleFileOptions::default()
            .compression_method(self.compression.into())
            .compression_level(self.compression_level)
    }
}
