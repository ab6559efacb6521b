//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Bootstrap configuration of a [`System`](crate::System).
///
/// Missing fields take their default values, so a config file only
/// lists what it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SystemConfig {
    /// Keep siblings of the root tree in name order.
    pub sorted: bool,

    /// Replace same-name siblings instead of duplicating them.
    pub distinct: bool,

    /// Permission bits of `/`.
    pub root_perm: u32,

    /// Directories created at bootstrap, in order.
    pub dirs: Vec<DirConfig>,

    /// Install the builtin commands under `/bin`.
    pub builtins: bool,

    /// Log exec audit records through tracing.
    pub audit: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            sorted: true,
            distinct: true,
            root_perm: 0o1755,
            dirs: vec![
                DirConfig::new("/bin", 0o1755),
                DirConfig::new("/etc", 0o0755),
                DirConfig::new("/etc/accounts", 0o0755),
                DirConfig::new("/tmp", 0o7777),
            ],
            builtins: true,
            audit: true,
        }
    }
}

impl SystemConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serializes to pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override `self` where they differ from the
    /// defaults; a non-default `dirs` list replaces the whole list.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.sorted != default.sorted {
            self.sorted = other.sorted;
        }
        if other.distinct != default.distinct {
            self.distinct = other.distinct;
        }
        if other.root_perm != default.root_perm {
            self.root_perm = other.root_perm;
        }
        if other.dirs != default.dirs {
            self.dirs.clone_from(&other.dirs);
        }
        if other.builtins != default.builtins {
            self.builtins = other.builtins;
        }
        if other.audit != default.audit {
            self.audit = other.audit;
        }
    }
}

/// A directory created at bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirConfig {
    pub path: String,
    /// Permission bits, e.g. `0o755` (TOML accepts octal literals).
    pub mode: u32,
}

impl DirConfig {
    pub fn new(path: impl Into<String>, mode: u32) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }
}
