//! Configuration file (`vcl-deploy.yaml`)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, config};

/// Configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "vcl-deploy.yaml";

/// Contents of a configuration file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub service: Option<String>,
    pub folders: Vec<PathBuf>,
    pub main: Option<String>,
    pub vars: Vec<String>,
    pub backends: Option<PathBuf>,
    pub api_keys: Vec<String>,
    /// Kind key (`conditions`, `backends`, `logging.syslog`, ...) to names never deleted
    pub skip: BTreeMap<String, Vec<String>>,
    pub skip_conditions: Vec<String>,
    pub protected: Vec<String>,
    pub auto_activate: bool,
    pub no_activate: bool,
    pub env: bool,
    pub endpoint: Option<String>,
    pub disable_logs: bool,
    pub verbose: bool,
}

impl ConfigFile {
    /// Make relative paths relative to the directory the file was read from
    fn rebase(mut self, base: &Path) -> Self {
        self.folders = self
            .folders
            .into_iter()
            .map(|folder| rebase_path(base, folder))
            .collect();
        self.backends = self.backends.map(|path| rebase_path(base, path));
        self
    }
}

fn rebase_path(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Pick the configuration file to use
///
/// An explicit path must exist. Otherwise `vcl-deploy.yaml` in `cwd` is used
/// when present.
pub fn locate_config_file(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(config::not_found(path.display().to_string())),
        None => {
            let default = cwd.join(CONFIG_FILE);
            Ok(default.is_file().then_some(default))
        }
    }
}

/// Read and parse a configuration file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let display = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| config::read_failed(&display, e.to_string()))?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    let file: ConfigFile = serde_yaml::from_str(&content)
        .map_err(|e| config::parse_failed(&display, e.to_string()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(file.rebase(base))
}
