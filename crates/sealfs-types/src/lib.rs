//! Core types for sealfs.
//!
//! sealfs is an in-memory resource tree where every path segment is
//! guarded by a Unix-style permission check with an extra tier for
//! anonymous access. This crate holds the pieces every other crate needs
//! and nothing more.
//!
//! # Crate Architecture
//!
//! ```text
//! sealfs-types    : Uid, Gid, ErrorCode           ◄── HERE
//!     ↑
//! sealfs-auth     : Mode, Seal, Operation, Account
//!     ↑
//! sealfs-tree     : Tree, Node, Walker
//!     ↑
//! sealfs-runtime  : System, Syscall, builtin commands, config
//!     ↑
//! sealfs-cli      : `sealfs` binary
//! ```
//!
//! # Example
//!
//! ```
//! use sealfs_types::{Gid, Uid};
//!
//! let uid = Uid::new(2);
//! assert_eq!(Gid::from(uid), Gid::new(2));
//! assert!(Uid::ROOT.is_root());
//! ```

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{Gid, Uid};
