//! Nodes stored in an [`Arena`](crate::Arena).

use crate::path;
use parking_lot::RwLock;
use sealfs_auth::{Mode, Seal, Sealed};
use sealfs_types::{Gid, Uid};
use std::sync::Arc;

/// Index of a node within its arena.
///
/// Ids are only meaningful for the arena that issued them. A slot freed
/// by a delete may be reused, so holding an id across a structural
/// change of the tree is a logic error; arena methods report it as
/// [`TreeError::Stale`](crate::TreeError::Stale) or `None` when the slot
/// is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared, individually locked payload slot of a node.
///
/// Handles clone the `Arc` and take an owned guard so the payload lock
/// outlives the arena's structural lock.
pub type SharedPayload<P> = Arc<RwLock<Option<P>>>;

/// A named, sealed node.
///
/// A node built with [`Node::new`] is detached; it gets its seal and
/// position when [`Arena::add`](crate::Arena::add) attaches it.
#[derive(Debug)]
pub struct Node<P> {
    name: String,
    seal: Seal,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    payload: SharedPayload<P>,
}

impl<P> Node<P> {
    /// Creates a detached node, escaping `name` so it never contains `/`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::raw(path::escape(name), Mode::empty())
    }

    /// Creates a mount root named by the cleaned `abspath`.
    ///
    /// The root always carries [`Mode::DIR`] and [`Mode::ROOT`] in
    /// addition to `mode`.
    #[must_use]
    pub fn root(abspath: &str, mode: Mode) -> Self {
        Self::raw(path::clean(abspath), mode | Mode::DIR | Mode::ROOT)
    }

    fn raw(name: String, mode: Mode) -> Self {
        Self {
            name,
            seal: Seal::new(Uid::ANONYMOUS, Gid::ANONYMOUS, mode),
            parent: None,
            children: Vec::new(),
            payload: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets the initial payload of a detached node.
    #[must_use]
    pub fn with_payload(self, payload: P) -> Self {
        *self.payload.write() = Some(payload);
        self
    }

    /// Base name, escaped. For a mount root this is the mount path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.seal.mode
    }

    #[must_use]
    pub fn uid(&self) -> Uid {
        self.seal.uid
    }

    #[must_use]
    pub fn gid(&self) -> Gid {
        self.seal.gid
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.seal.mode.is_dir()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.seal.mode.is_root()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in sibling order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn payload(&self) -> &SharedPayload<P> {
        &self.payload
    }

    pub(crate) fn seal_mut(&mut self) -> &mut Seal {
        &mut self.seal
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Copy with the same name and seal, no relations and an empty payload.
    #[must_use]
    pub fn detached_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            seal: self.seal,
            parent: None,
            children: Vec::new(),
            payload: Arc::new(RwLock::new(None)),
        }
    }
}

impl<P> Sealed for Node<P> {
    fn seal(&self) -> Seal {
        self.seal
    }
}

impl<P> std::fmt::Display for Node<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.seal, self.name)
    }
}
