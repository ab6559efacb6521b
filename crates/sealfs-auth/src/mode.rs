//! Node mode: type flags plus four tiers of permission bits.
//!
//! In addition to the standard Unix `rwxrwxrwx`, another `rwx` triplet
//! controls anonymous (unauthenticated) access. The "other" tier means
//! *other authenticated* accounts.
//!
//! ```text
//!              rwxrwxrwxrwx    Mode::PERM
//!               n  u  g  o
//!               |  |  |  |
//!   aNonymous --+  |  |  |
//!        User -----+  |  |
//!       Group --------+  |
//!       Other -----------+
//! ```
//!
//! The four most significant bits carry the node type and ordering policy:
//!
//! | Flag | Bit | Meaning |
//! |------|-----|---------|
//! | [`DIR`](Mode::DIR) | 31 | node is a directory |
//! | [`SORT`](Mode::SORT) | 30 | children kept sorted by name |
//! | [`DISTINCT`](Mode::DISTINCT) | 29 | adding a duplicate name replaces it |
//! | [`ROOT`](Mode::ROOT) | 28 | node anchors a mount |
//!
//! # Example
//!
//! ```
//! use sealfs_auth::Mode;
//!
//! let mode = Mode::DIR | Mode::from_bits_retain(0o1755);
//! assert_eq!(mode.to_string(), "d--xrwxr-xr-x");
//! assert_eq!(mode.perm(), 0o1755);
//!
//! // Replacing permissions keeps the type flags.
//! let locked = mode.with_perm(0);
//! assert!(locked.is_dir());
//! assert_eq!(locked.to_string(), "d------------");
//! ```

use bitflags::bitflags;

bitflags! {
    /// Type flags and permission bits of a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Mode: u32 {
        /// Directory.
        const DIR      = 1 << 31;
        /// Children are sorted by name.
        const SORT     = 1 << 30;
        /// No duplicate children.
        const DISTINCT = 1 << 29;
        /// Root of a mount.
        const ROOT     = 1 << 28;

        const ANON_READ   = 0o4000;
        const ANON_WRITE  = 0o2000;
        const ANON_EXEC   = 0o1000;
        const USER_READ   = 0o0400;
        const USER_WRITE  = 0o0200;
        const USER_EXEC   = 0o0100;
        const GROUP_READ  = 0o0040;
        const GROUP_WRITE = 0o0020;
        const GROUP_EXEC  = 0o0010;
        const OTHER_READ  = 0o0004;
        const OTHER_WRITE = 0o0002;
        const OTHER_EXEC  = 0o0001;
    }
}

impl Mode {
    /// All twelve permission bits.
    pub const PERM: Self = Self::from_bits_retain(0o7777);

    /// Ordering policy flags.
    pub const TYPE: Self = Self::SORT.union(Self::DISTINCT);

    /// Rendering order of the permission bits, most significant first.
    const RWX: [(Self, u8); 12] = [
        (Self::ANON_READ, b'r'),
        (Self::ANON_WRITE, b'w'),
        (Self::ANON_EXEC, b'x'),
        (Self::USER_READ, b'r'),
        (Self::USER_WRITE, b'w'),
        (Self::USER_EXEC, b'x'),
        (Self::GROUP_READ, b'r'),
        (Self::GROUP_WRITE, b'w'),
        (Self::GROUP_EXEC, b'x'),
        (Self::OTHER_READ, b'r'),
        (Self::OTHER_WRITE, b'w'),
        (Self::OTHER_EXEC, b'x'),
    ];

    /// Builds a mode holding only permission bits.
    ///
    /// Returns `None` if `raw` has bits outside [`Mode::PERM`].
    ///
    /// ```
    /// use sealfs_auth::Mode;
    ///
    /// assert!(Mode::perm_from(0o7777).is_some());
    /// assert!(Mode::perm_from(0o10000).is_none());
    /// ```
    #[must_use]
    pub fn perm_from(raw: u32) -> Option<Self> {
        if raw > Self::PERM.bits() {
            return None;
        }
        Some(Self::from_bits_retain(raw))
    }

    /// Returns the twelve permission bits as an integer.
    #[must_use]
    pub fn perm(self) -> u32 {
        (self & Self::PERM).bits()
    }

    /// Returns a copy with the permission bits replaced by `perm`.
    ///
    /// Type, ordering and root flags are preserved; bits of `perm`
    /// outside [`Mode::PERM`] are ignored.
    #[must_use]
    pub fn with_perm(self, perm: u32) -> Self {
        (self - Self::PERM) | (Self::from_bits_retain(perm) & Self::PERM)
    }

    #[must_use]
    pub fn is_dir(self) -> bool {
        self.contains(Self::DIR)
    }

    #[must_use]
    pub fn is_root(self) -> bool {
        self.contains(Self::ROOT)
    }

    #[must_use]
    pub fn is_sorted(self) -> bool {
        self.contains(Self::SORT)
    }

    #[must_use]
    pub fn is_distinct(self) -> bool {
        self.contains(Self::DISTINCT)
    }
}

impl std::fmt::Display for Mode {
    /// Renders the 13-character token: `d` or `-`, then four `rwx`
    /// triplets with unset bits as `-`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = [b'-'; 13];
        if self.is_dir() {
            buf[0] = b'd';
        }
        for (i, (bit, c)) in Self::RWX.iter().enumerate() {
            if self.contains(*bit) {
                buf[i + 1] = *c;
            }
        }
        // only ASCII was written
        f.write_str(std::str::from_utf8(&buf).map_err(|_| std::fmt::Error)?)
    }
}
