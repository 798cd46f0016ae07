//! Runner configuration, loadable from a JSON file.
//!
//! ```json
//! { "node_path": "/usr/bin/node", "timeout_secs": 5, "output_encoding": "utf-8" }
//! ```
//!
//! Every field is optional; missing ones take the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NODE_PATH: &str = "node";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How captured stdout bytes are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputEncoding {
    /// Invalid UTF-8 is an error.
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// Invalid sequences become U+FFFD.
    #[serde(rename = "utf-8-lossy")]
    Utf8Lossy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// JavaScript runtime binary, looked up on `PATH` when not absolute.
    pub node_path: PathBuf,
    /// Wall-clock budget for one execution.
    pub timeout_secs: u64,
    pub output_encoding: OutputEncoding,
    /// Drop the newline the print primitive adds after the accumulator.
    pub strip_trailing_newline: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            node_path: PathBuf::from(DEFAULT_NODE_PATH),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_encoding: OutputEncoding::default(),
            strip_trailing_newline: true,
        }
    }
}

impl RunnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).with_context(|| "Parsing runner config JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Loading {}", path.display()))
    }

    /// Apply command-line overrides on top of file or default values.
    pub fn with_overrides(mut self, node_path: Option<PathBuf>, timeout_secs: Option<u64>) -> Self {
        if let Some(path) = node_path {
            self.node_path = path;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self
    }
}
