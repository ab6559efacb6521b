//! Ordered tree of sealed nodes.
//!
//! A [`Tree`] is one mount: a root node plus everything below it, stored
//! in an [`Arena`] and guarded by a single structural lock. Nodes carry a
//! [`Seal`](sealfs_auth::Seal) and an optional payload behind their own
//! lock.
//!
//! ```text
//!   /                      (ROOT | DIR | SORT | DISTINCT)
//!   ├── bin
//!   │   └── ls             payload: executable
//!   ├── etc
//!   │   └── accounts
//!   └── tmp
//! ```
//!
//! # Ordering policy
//!
//! The parent's mode decides where a new child goes:
//!
//! - [`Mode::SORT`](sealfs_auth::Mode::SORT): ascending byte order by name
//! - [`Mode::DISTINCT`](sealfs_auth::Mode::DISTINCT): a same-name sibling
//!   is removed first
//! - neither: appended
//!
//! Children inherit the parent's seal (minus the root flag) when attached.
//!
//! No permission checks happen here. Access control is layered on top
//! by `sealfs-runtime`.

mod arena;
mod error;
mod node;
pub mod path;
mod tree;
mod walker;

pub use arena::Arena;
pub use error::TreeError;
pub use node::{Node, NodeId, SharedPayload};
pub use tree::Tree;
pub use walker::{Step, Walker};
