//! Configuration loading from parbatch.toml
//!
//! Settings can be specified in a `parbatch.toml` file, discovered by
//! walking up from the current directory. Every field has a default, so an
//! absent file or an empty file is equivalent to `Settings::default()`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Executor settings.
    #[serde(default)]
    pub runner: RunnerSettings,
    /// Output settings.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Default worker budget when the caller does not pass one.
    /// `0` means one worker per available CPU core.
    #[serde(default)]
    pub workers: usize,
    /// Suppress informational output during the parallel phase.
    #[serde(default = "default_quiet")]
    pub quiet: bool,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            workers: 0,
            quiet: default_quiet(),
        }
    }
}

fn default_quiet() -> bool {
    true
}

impl RunnerSettings {
    /// Resolve the configured worker budget to a concrete count.
    pub fn resolved_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Report format: "human" or "json".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Discover and load settings by walking up from the current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let path = dir.join("parbatch.toml");
            if path.exists() {
                return Self::load(&path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// A commented default configuration as a TOML string.
    pub fn default_toml() -> String {
        r#"# Parbatch Configuration

[runner]
# Default worker budget; 0 = one worker per available CPU core
workers = 0
# Suppress informational output during the parallel phase
quiet = true

[output]
# Report format: human or json
format = "human"
"#
        .to_string()
    }
}
