//! Notebook configuration.
//!
//! Loaded from `~/.notebook/config.toml`. Every key is optional and a
//! missing file means defaults.
//!
//! The script to play is resolved through a chain:
//!
//! 1. `--script <path>`
//! 2. `NOTEBOOK_SCRIPT` env var
//! 3. `script` in the config file
//! 4. the script built into the binary

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::timeline::Target;

/// Environment variable naming a script file.
pub const SCRIPT_ENV: &str = "NOTEBOOK_SCRIPT";

/// Collapse applied right after a script loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartCollapsed {
    #[default]
    None,
    Events,
    Properties,
    Evaluations,
    All,
}

impl StartCollapsed {
    pub fn target(self) -> Option<Target> {
        match self {
            Self::None => None,
            Self::Events => Some(Target::Events),
            Self::Properties => Some(Target::Properties),
            Self::Evaluations => Some(Target::Evaluations),
            Self::All => Some(Target::All),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Script file replacing the built-in one.
    pub script: Option<PathBuf>,

    /// Playback interval in milliseconds.
    pub tick_millis: u64,

    pub start_collapsed: StartCollapsed,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: None,
            tick_millis: 1000,
            start_collapsed: StartCollapsed::None,
        }
    }
}

/// Where the script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    File(PathBuf),
    Embedded,
}

impl Config {
    /// Load config from `~/.notebook/config.toml`.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("could not determine home directory; using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load config from a file. Returns defaults if the file is missing and
    /// an error if it is unreadable or invalid.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.tick_millis == 0 {
            return Err(format!(
                "tick-millis must be greater than zero in {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The config file path: `~/.notebook/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".notebook").join("config.toml"))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Resolve the script to play from the resolution chain.
    pub fn script_source(&self, explicit: Option<&Path>) -> ScriptSource {
        let from_env = env::var_os(SCRIPT_ENV).map(PathBuf::from);
        self.resolve_script(explicit, from_env)
    }

    fn resolve_script(&self, explicit: Option<&Path>, from_env: Option<PathBuf>) -> ScriptSource {
        // 1. Explicit --script flag.
        if let Some(path) = explicit {
            return ScriptSource::File(path.to_path_buf());
        }

        // 2. NOTEBOOK_SCRIPT environment variable.
        if let Some(path) = from_env
            && !path.as_os_str().is_empty()
        {
            return ScriptSource::File(path);
        }

        // 3. Config file.
        if let Some(path) = &self.script {
            return ScriptSource::File(path.clone());
        }

        ScriptSource::Embedded
    }
}
