use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::CovbenchError;

pub const DEFAULT_TRIALS: u32 = 5;

/// Resolved settings for one invocation. Precedence: CLI flags, then an
/// optional `covbench.toml`, then defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workbench root holding the `rust/` and `cpp/` app trees.
    pub root: PathBuf,
    /// Where per-invocation logs accumulate.
    pub log_dir: PathBuf,
    /// Timed runs per (workload, tool) cell.
    pub trials: u32,
}

/// On-disk shape. Every field optional; unknown keys are a config error
/// rather than silently ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    root: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    trials: Option<u32>,
}

impl Config {
    /// Resolve settings from the discovered config file plus CLI overrides.
    pub fn resolve(
        cli_root: Option<PathBuf>,
        cli_trials: Option<u32>,
    ) -> Result<Config, CovbenchError> {
        let file = match config_file() {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(merge(file, cli_root, cli_trials))
    }
}

fn merge(file: FileConfig, cli_root: Option<PathBuf>, cli_trials: Option<u32>) -> Config {
    let root = cli_root
        .or(file.root)
        .unwrap_or_else(|| PathBuf::from("."));
    let log_dir = file.log_dir.unwrap_or_else(|| root.join(".logs"));
    let trials = cli_trials.or(file.trials).unwrap_or(DEFAULT_TRIALS);

    Config {
        root,
        log_dir,
        trials,
    }
}

/// `covbench.toml` in the working directory wins over the user config dir.
fn config_file() -> Option<PathBuf> {
    let local = PathBuf::from("covbench.toml");
    if local.is_file() {
        return Some(local);
    }

    let global = dirs::config_dir()?.join("covbench").join("covbench.toml");
    if global.is_file() { Some(global) } else { None }
}

fn read_file_config(path: &Path) -> Result<FileConfig, CovbenchError> {
    let text = std::fs::read_to_string(path).map_err(|err| CovbenchError::Config {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;

    toml::from_str(&text).map_err(|err| CovbenchError::Config {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}
