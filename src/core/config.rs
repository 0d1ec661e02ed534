//! Configuration loaded from `config.toml`
//!
//! The resolver never reads ambient state: a `Config` is built once at
//! startup (file + CLI overrides) and borrowed by every resolution call.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::IdlinkError;
use crate::core::paths::expand_home;

/// Where identifiers are placed when embedding into a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPosition {
    Head,
    #[default]
    Tail,
}

impl std::str::FromStr for IdPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "head" => Ok(IdPosition::Head),
            "tail" => Ok(IdPosition::Tail),
            _ => Err(format!("Unknown identifier position: {}", s)),
        }
    }
}

/// Which search strategy to use for identifier lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Use fd when installed, otherwise walk the tree
    #[default]
    Auto,
    Fd,
    Walk,
}

impl std::str::FromStr for SearchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SearchBackend::Auto),
            "fd" => Ok(SearchBackend::Fd),
            "walk" => Ok(SearchBackend::Walk),
            _ => Err(format!("Unknown search backend: {}", s)),
        }
    }
}

fn default_link_types() -> Vec<String> {
    vec!["file".to_string(), "id".to_string()]
}

/// Resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store directories; the first one is the default storage root
    pub store_dirs: Vec<PathBuf>,

    /// Directories searched by the fallback resolver, in priority order.
    /// Empty means "same as store_dirs".
    pub search_dirs: Vec<PathBuf>,

    pub id_position: IdPosition,

    /// Link types for which resolution is attempted
    pub link_types: Vec<String>,

    pub search_backend: SearchBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dirs: Vec::new(),
            search_dirs: Vec::new(),
            id_position: IdPosition::Tail,
            link_types: default_link_types(),
            search_backend: SearchBackend::Auto,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, IdlinkError> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let config = Self::from_toml_str(&contents, &path)?;
                debug!(path = %path.display(), "Loaded config from file");
                Ok(config)
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(IdlinkError::ConfigRead { path, source }),
        }
    }

    /// Parse configuration from TOML text; `origin` is only used in errors
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, IdlinkError> {
        let config: Config = toml::from_str(contents).map_err(|source| IdlinkError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(config.expanded())
    }

    /// `$XDG_CONFIG_HOME/idlink/config.toml`, else `~/.config/idlink/config.toml`
    pub fn default_path() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            let xdg = PathBuf::from(xdg);
            if xdg.is_absolute() {
                return xdg.join("idlink").join("config.toml");
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("idlink")
            .join("config.toml")
    }

    fn expanded(mut self) -> Self {
        self.store_dirs = self.store_dirs.iter().map(|p| expand_home(p)).collect();
        self.search_dirs = self.search_dirs.iter().map(|p| expand_home(p)).collect();
        self
    }

    /// Ordered directory list for the fallback resolver
    pub fn search_dirs(&self) -> &[PathBuf] {
        if self.search_dirs.is_empty() {
            &self.store_dirs
        } else {
            &self.search_dirs
        }
    }

    /// The default storage root (first store directory)
    pub fn default_store(&self) -> Option<&Path> {
        self.store_dirs.first().map(PathBuf::as_path)
    }

    /// Whether links of this type should be resolved at all
    pub fn resolves_link_type(&self, kind: &str) -> bool {
        self.link_types.iter().any(|t| t == kind)
    }

    pub fn with_store_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.store_dirs = dirs.iter().map(|p| expand_home(p)).collect();
        self
    }

    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs.iter().map(|p| expand_home(p)).collect();
        self
    }
}
