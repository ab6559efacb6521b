//! Identifier types for sealfs.
//!
//! Owners and groups are plain integers, as in Unix. Two user ids are
//! reserved:
//!
//! | Uid | Meaning |
//! |-----|---------|
//! | `0` | anonymous (unauthenticated) |
//! | `1` | root (bypasses every permission check) |
//!
//! Every other uid is an authenticated account.

use serde::{Deserialize, Serialize};

/// User id of an account or of the owner of a node.
///
/// # Example
///
/// ```
/// use sealfs_types::Uid;
///
/// assert!(Uid::ANONYMOUS.is_anonymous());
/// assert!(Uid::ROOT.is_root());
/// assert!(Uid::new(2).is_authenticated());
/// assert_eq!(Uid::new(7).to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub u32);

impl Uid {
    /// The unauthenticated identity.
    pub const ANONYMOUS: Self = Self(0);

    /// The distinguished identity that is always permitted.
    pub const ROOT: Self = Self(1);

    /// Creates a uid from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for uid 0.
    #[must_use]
    pub const fn is_anonymous(self) -> bool {
        self.0 == Self::ANONYMOUS.0
    }

    /// Returns `true` for uid 1.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }

    /// Returns `true` for any uid above 0, root included.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Uid {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Group id of an account membership or of the group owning a node.
///
/// Group ids share the numbering of user ids: every account is created
/// with a primary group equal to its uid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gid(pub u32);

impl Gid {
    /// Group of the anonymous account.
    pub const ANONYMOUS: Self = Self(0);

    /// Group of the root account.
    pub const ROOT: Self = Self(1);

    /// Creates a gid from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Gid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Gid {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Uid> for Gid {
    /// Primary group of a freshly created account.
    fn from(uid: Uid) -> Self {
        Self(uid.0)
    }
}
