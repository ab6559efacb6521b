//! Operations checked against a seal.

use crate::Mode;

/// An access operation.
///
/// Each operation maps to one bit in every permission tier:
///
/// | Operation | anonymous | owner | group | other |
/// |-----------|-----------|-------|-------|-------|
/// | `Read` | `0o4000` | `0o0400` | `0o0040` | `0o0004` |
/// | `Write` | `0o2000` | `0o0200` | `0o0020` | `0o0002` |
/// | `Execute` | `0o1000` | `0o0100` | `0o0010` | `0o0001` |
///
/// Execute on a directory means the directory may be passed through
/// during path resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
    Execute,
}

/// The bit an operation needs in each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBits {
    pub anonymous: Mode,
    pub owner: Mode,
    pub group: Mode,
    pub other: Mode,
}

impl Operation {
    /// Returns the bit this operation requires in each tier.
    ///
    /// ```
    /// use sealfs_auth::{Mode, Operation};
    ///
    /// let bits = Operation::Execute.tier_bits();
    /// assert_eq!(bits.anonymous, Mode::ANON_EXEC);
    /// assert_eq!(bits.other.bits(), 0o1);
    /// ```
    #[must_use]
    pub fn tier_bits(self) -> TierBits {
        match self {
            Self::Read => TierBits {
                anonymous: Mode::ANON_READ,
                owner: Mode::USER_READ,
                group: Mode::GROUP_READ,
                other: Mode::OTHER_READ,
            },
            Self::Write => TierBits {
                anonymous: Mode::ANON_WRITE,
                owner: Mode::USER_WRITE,
                group: Mode::GROUP_WRITE,
                other: Mode::OTHER_WRITE,
            },
            Self::Execute => TierBits {
                anonymous: Mode::ANON_EXEC,
                owner: Mode::USER_EXEC,
                group: Mode::GROUP_EXEC,
                other: Mode::OTHER_EXEC,
            },
        }
    }

    /// Short lowercase name used in denial messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Execute => "exec",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
