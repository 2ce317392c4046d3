use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FROST_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid skip-pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("unknown default-vcs '{0}', expected one of git, hg, svn, bzr")]
    UnknownVcs(String),
}

/// Persistent freeze settings, read from `config.toml`.
///
/// Every key is optional. Command-line flags override scalar keys and extend
/// list keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FreezeConfig {
    /// Requirements file to reconcile against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub find_links: Vec<String>,
    #[serde(default)]
    pub local_only: bool,
    #[serde(default)]
    pub changed_only: bool,
    /// Regular expression; matching manifest lines are copied through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_pattern: Option<String>,
    /// VCS assumed for editable URLs without a `vcs+` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vcs: Option<String>,
    /// Global site-packages directories to scan besides the virtualenv.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub site_packages: Vec<PathBuf>,
    /// Tool name written into the appended-requirements banner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_tool: Option<String>,
}

impl FreezeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the config file: explicit path, then `$FROST_CONFIG`, then
    /// `~/.config/frost/config.toml`. Only the last may be absent.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::locate_with(explicit, from_env, home)
    }

    fn locate_with(
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = from_env {
            return Self::load(&path);
        }
        let Some(home) = home else {
            return Ok(Self::default());
        };
        let path = home.join(".config/frost/config.toml");
        if path.is_file() {
            debug!("loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn compile_skip_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        self.skip_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_owned(),
                    source,
                })
            })
            .transpose()
    }
}
