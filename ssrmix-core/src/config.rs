use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SsrError};

/// Identifiers permitted in the merged output.
pub type AllowList = HashSet<String>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Accepted node identifiers.
    pub custom: Vec<String>,
    /// Append ` (<load>)` to each kept node's remarks.
    pub annotate_load: bool,
    pub sink: SinkConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Output directory; `None` means print instead of pushing.
    pub root: Option<PathBuf>,
    pub filename: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            root: None,
            filename: "subscribe".to_string(),
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| SsrError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
            .map_err(|e| SsrError::Config(format!("{}: {e}", path.display())))
    }

    pub fn allow_list(&self) -> AllowList {
        self.custom.iter().cloned().collect()
    }
}
