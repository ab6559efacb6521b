//! Access control seal attached to every node.

use crate::Mode;
use sealfs_types::{Gid, Uid};

/// Ownership and mode of a node: the triple that decides access.
///
/// The textual form `"<13-char-rwx> <uid> <gid>"` is consumed by listing
/// tools and must not change.
///
/// # Example
///
/// ```
/// use sealfs_auth::{Mode, Seal};
/// use sealfs_types::{Gid, Uid};
///
/// let seal = Seal::new(Uid::ROOT, Gid::ROOT, Mode::DIR | Mode::from_bits_retain(0o1755));
/// assert_eq!(seal.to_string(), "d--xrwxr-xr-x 1 1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seal {
    /// Owner.
    pub uid: Uid,
    /// Owning group.
    pub gid: Gid,
    pub mode: Mode,
}

impl Seal {
    #[must_use]
    pub fn new(uid: Uid, gid: Gid, mode: Mode) -> Self {
        Self { uid, gid, mode }
    }
}

impl std::fmt::Display for Seal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.mode, self.uid, self.gid)
    }
}

/// Anything carrying a [`Seal`].
pub trait Sealed {
    fn seal(&self) -> Seal;
}

impl Sealed for Seal {
    fn seal(&self) -> Seal {
        *self
    }
}
