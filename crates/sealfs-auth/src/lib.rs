//! Permission model for sealfs.
//!
//! Every node carries a [`Seal`]: owner, group and a [`Mode`] holding four
//! tiers of `rwx` bits. An [`Account`] decides whether it may perform an
//! [`Operation`] on a seal.
//!
//! # Four-Tier Evaluation
//!
//! ```text
//! root (uid 1)                          → granted
//! anonymous (uid 0) ∧ anonymous bit     → granted
//! uid == seal.uid   ∧ owner bit         → granted
//! member(seal.gid)  ∧ group bit         → granted
//! uid > 0           ∧ other bit         → granted
//! otherwise                             → AccessDenied
//! ```
//!
//! | Tier | Bits | Applies to |
//! |------|------|------------|
//! | anonymous | `0o7000` | unauthenticated account only |
//! | owner | `0o0700` | account whose uid owns the seal |
//! | group | `0o0070` | members of the seal's group |
//! | other | `0o0007` | any authenticated account |
//!
//! # Crate Architecture
//!
//! ```text
//! sealfs-types  (Uid, Gid, ErrorCode)
//!      ↑
//! sealfs-auth   ◄── THIS CRATE
//! (Mode, Seal, Operation, Account, AccessDenied)
//!      ↑
//! sealfs-tree   (nodes carry a Seal)
//!      ↑
//! sealfs-runtime (Syscall checks Account::permitted at each path step)
//! ```

pub mod account;
pub mod error;
pub mod mode;
pub mod operation;
pub mod seal;

pub use account::{Account, AccountRecord};
pub use error::AccessDenied;
pub use mode::Mode;
pub use operation::{Operation, TierBits};
pub use seal::{Seal, Sealed};

// Re-export ids for convenience
pub use sealfs_types::{Gid, Uid};
