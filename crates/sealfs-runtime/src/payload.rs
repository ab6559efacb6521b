//! Resource payloads.

use crate::{Cmd, FsError, Syscall};
use std::sync::Arc;

/// Something that can run as a command.
///
/// The syscall is bound to the account that invoked it, so every
/// operation the command performs is checked against that account.
pub trait Executable: Send + Sync {
    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Whatever the command's own syscalls or argument parsing fail with.
    fn exec(&self, sys: &Syscall<'_>, cmd: &mut Cmd<'_>) -> Result<(), FsError>;
}

/// Data attached to a node.
///
/// Text and bytes can be opened for reading; an executable can only be
/// run.
#[derive(Clone)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
    Exec(Arc<dyn Executable>),
}

impl Payload {
    /// Wraps an executable.
    pub fn exec(executable: impl Executable + 'static) -> Self {
        Self::Exec(Arc::new(executable))
    }

    /// Readable content, `None` for executables.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(s) => Some(s.as_bytes()),
            Self::Bytes(b) => Some(b),
            Self::Exec(_) => None,
        }
    }

    #[must_use]
    pub fn executable(&self) -> Option<Arc<dyn Executable>> {
        match self {
            Self::Exec(e) => Some(Arc::clone(e)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.as_bytes().is_some()
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Exec(_) => f.write_str("Exec(..)"),
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}
