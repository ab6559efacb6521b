//! Syscall layer errors.
//!
//! Every message starts with the offending absolute path. Permission
//! failures also carry the acting uid and the denying seal.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`FsError::NotFound`] | `FS_NOT_FOUND` | Yes |
//! | [`FsError::PermissionDenied`] | `FS_PERMISSION_DENIED` | No |
//! | [`FsError::AlreadyExists`] | `FS_ALREADY_EXISTS` | Yes |
//! | [`FsError::NotADirectory`] | `FS_NOT_A_DIRECTORY` | No |
//! | [`FsError::IsADirectory`] | `FS_IS_A_DIRECTORY` | No |
//! | [`FsError::NotExecutable`] | `FS_NOT_EXECUTABLE` | No |
//! | [`FsError::NotReadable`] | `FS_NOT_READABLE` | No |
//! | [`FsError::NotRoot`] | `FS_NOT_ROOT` | No |
//! | [`FsError::NotOwner`] | `FS_NOT_OWNER` | No |
//! | [`FsError::InvalidMode`] | `FS_INVALID_MODE` | No |
//! | [`FsError::InvalidPath`] | `FS_INVALID_PATH` | No |
//! | [`FsError::MountExists`] | `FS_MOUNT_EXISTS` | No |
//! | [`FsError::Usage`] | `FS_USAGE` | No |
//! | [`FsError::Codec`] | `FS_CODEC` | No |
//! | [`FsError::Io`] | `FS_IO` | No |
//! | [`FsError::Config`] | `FS_CONFIG` | No |
//!
//! `NotFound` and `AlreadyExists` are recoverable in the sense that the
//! same call may succeed once the tree changes.

use crate::config::ConfigError;
use sealfs_auth::AccessDenied;
use sealfs_tree::TreeError;
use sealfs_types::{ErrorCode, Uid};
use thiserror::Error;

/// Syscall failure.
///
/// # Example
///
/// ```
/// use sealfs_runtime::FsError;
/// use sealfs_types::ErrorCode;
///
/// let err = FsError::NotFound { path: "/nope".into() };
/// assert_eq!(err.code(), "FS_NOT_FOUND");
/// assert_eq!(err.to_string(), "/nope no such directory or resource");
/// ```
#[derive(Debug, Error)]
pub enum FsError {
    #[error("{path} no such directory or resource")]
    NotFound { path: String },

    /// The account failed a permission check on `path` or one of its
    /// ancestors.
    #[error("{path} uid:{uid}: {source}", uid = .source.uid)]
    PermissionDenied {
        path: String,
        #[source]
        source: AccessDenied,
    },

    #[error("{path} already exists")]
    AlreadyExists { path: String },

    #[error("{path} is not a directory")]
    NotADirectory { path: String },

    #[error("{path} is a directory")]
    IsADirectory { path: String },

    /// The payload is not an executable.
    #[error("{path} is not executable")]
    NotExecutable { path: String },

    /// The payload is neither text nor bytes.
    #[error("{path} is not readable")]
    NotReadable { path: String },

    /// The operation is reserved for root.
    #[error("{path} uid:{uid}: requires root")]
    NotRoot { path: String, uid: Uid },

    #[error("{path} uid:{uid}: not owner")]
    NotOwner { path: String, uid: Uid },

    /// Permission bits outside `0o7777`.
    #[error("{path} invalid mode {mode:#o}")]
    InvalidMode { path: String, mode: u32 },

    #[error("{path} invalid path")]
    InvalidPath { path: String },

    #[error("mount {path} already exists")]
    MountExists { path: String },

    /// A builtin command rejected its arguments.
    #[error("{cmd}: {message}")]
    Usage { cmd: String, message: String },

    #[error("{path}: {source}")]
    Codec {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FsError {
    pub(crate) fn denied(path: impl Into<String>, source: AccessDenied) -> Self {
        Self::PermissionDenied {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn usage(cmd: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Usage {
            cmd: cmd.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn codec(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Codec {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for permission failures.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Returns `true` if the path did not resolve.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<TreeError> for FsError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::NotFound { path, .. } => Self::NotFound { path },
            TreeError::NotRoot { path, .. } => Self::InvalidPath { path },
            TreeError::Stale { id } => Self::NotFound {
                path: id.to_string(),
            },
        }
    }
}

impl ErrorCode for FsError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "FS_NOT_FOUND",
            Self::PermissionDenied { .. } => "FS_PERMISSION_DENIED",
            Self::AlreadyExists { .. } => "FS_ALREADY_EXISTS",
            Self::NotADirectory { .. } => "FS_NOT_A_DIRECTORY",
            Self::IsADirectory { .. } => "FS_IS_A_DIRECTORY",
            Self::NotExecutable { .. } => "FS_NOT_EXECUTABLE",
            Self::NotReadable { .. } => "FS_NOT_READABLE",
            Self::NotRoot { .. } => "FS_NOT_ROOT",
            Self::NotOwner { .. } => "FS_NOT_OWNER",
            Self::InvalidMode { .. } => "FS_INVALID_MODE",
            Self::InvalidPath { .. } => "FS_INVALID_PATH",
            Self::MountExists { .. } => "FS_MOUNT_EXISTS",
            Self::Usage { .. } => "FS_USAGE",
            Self::Codec { .. } => "FS_CODEC",
            Self::Io { .. } => "FS_IO",
            Self::Config(_) => "FS_CONFIG",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AlreadyExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealfs_auth::{Mode, Operation, Seal};
    use sealfs_types::{assert_error_codes, Gid};

    fn denied() -> AccessDenied {
        AccessDenied {
            uid: Uid::new(2),
            seal: Seal::new(Uid::ROOT, Gid::ROOT, Mode::DIR | Mode::from_bits_retain(0o0700)),
            op: Operation::Execute,
        }
    }

    fn all_variants() -> Vec<FsError> {
        let p = || "/x".to_string();
        vec![
            FsError::NotFound { path: p() },
            FsError::denied(p(), denied()),
            FsError::AlreadyExists { path: p() },
            FsError::NotADirectory { path: p() },
            FsError::IsADirectory { path: p() },
            FsError::NotExecutable { path: p() },
            FsError::NotReadable { path: p() },
            FsError::NotRoot {
                path: p(),
                uid: Uid::new(2),
            },
            FsError::NotOwner {
                path: p(),
                uid: Uid::new(2),
            },
            FsError::InvalidMode {
                path: p(),
                mode: 0o10000,
            },
            FsError::InvalidPath { path: p() },
            FsError::MountExists { path: p() },
            FsError::usage("ls", "bad flag"),
            FsError::codec(p(), serde_json::from_str::<u8>("x").expect_err("invalid json")),
            FsError::io(p(), std::io::Error::other("boom")),
            FsError::Config(ConfigError::invalid_env_var("SEALFS_AUDIT", "expected bool")),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "FS_");
    }

    #[test]
    fn messages_start_with_path() {
        for err in all_variants() {
            let msg = err.to_string();
            if matches!(err, FsError::Usage { .. } | FsError::Config(_) | FsError::MountExists { .. }) {
                continue;
            }
            assert!(msg.starts_with("/x"), "{msg}");
        }
    }

    #[test]
    fn permission_denied_message() {
        let err = FsError::denied("/tmp/a", denied());
        assert_eq!(
            err.to_string(),
            "/tmp/a uid:2: d---rwx------ 1 1 exec denied"
        );
        assert!(err.is_permission_denied());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn invalid_mode_is_octal() {
        let err = FsError::InvalidMode {
            path: "/tmp".into(),
            mode: 0o10000,
        };
        assert_eq!(err.to_string(), "/tmp invalid mode 0o10000");
    }

    #[test]
    fn tree_errors_convert() {
        let err: FsError = TreeError::NotFound {
            path: "/a/b".into(),
            found: Vec::new(),
        }
        .into();
        assert!(err.is_not_found());
        assert!(err.is_recoverable());

        let err: FsError = TreeError::NotRoot {
            path: "rel".into(),
            root: "/".into(),
        }
        .into();
        assert_eq!(err.code(), "FS_INVALID_PATH");
    }
}
