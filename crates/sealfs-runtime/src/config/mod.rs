//! Configuration management with layered merging.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────┐
//! │  1. Environment Variables (SEALFS_*)    │  Runtime override
//! ├─────────────────────────────────────────┤
//! │  2. Config File (~/.sealfs/config.toml) │  User defaults
//! ├─────────────────────────────────────────┤
//! │  3. Default Values (compile-time)       │  Fallback
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `SEALFS_AUDIT` | `audit` | bool |
//! | `SEALFS_SORTED` | `sorted` | bool |
//! | `SEALFS_DISTINCT` | `distinct` | bool |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.sealfs/config.toml
//! sorted = true
//! distinct = true
//! root_perm = 0o1755
//! builtins = true
//! audit = true
//!
//! [[dirs]]
//! path = "/bin"
//! mode = 0o1755
//!
//! [[dirs]]
//! path = "/etc"
//! mode = 0o755
//!
//! [[dirs]]
//! path = "/etc/accounts"
//! mode = 0o755
//!
//! [[dirs]]
//! path = "/tmp"
//! mode = 0o7777
//! ```
//!
//! Listing `dirs` replaces the default list; keep `/etc/accounts` in it
//! for the well-known accounts to be stored at bootstrap.

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{DirConfig, SystemConfig};

/// Default config directory (`~/.sealfs`).
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".sealfs")
}

/// Default config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}
