//! Presentation-level configuration
//!
//! Settings for the interactive panel, resolved from the `[repl]` section of
//! the configuration file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Interactive panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Print progress lines while a solve is running
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl ReplConfig {
    /// History location used when none is configured
    pub fn default_history_file() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("trajopt-panel").join("history.txt"))
    }

    pub fn with_show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Use `path` for history, falling back to the default location.
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_file = path;
        }
        self
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: Self::default_history_file(),
        }
    }
}
