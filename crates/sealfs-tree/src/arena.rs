//! Slot arena holding every node of one mounted tree.

use crate::{path, Node, NodeId, TreeError};
use sealfs_auth::{Mode, Seal, Sealed};
use sealfs_types::{Gid, Uid};
use tracing::debug;

/// Flat storage for the nodes of one tree.
///
/// Parent and child links are [`NodeId`]s into `slots`. Removing a node
/// frees the slots of its whole subtree; freed slots are reused by later
/// inserts.
///
/// An arena is always reached through [`Tree::read`](crate::Tree::read)
/// or [`Tree::write`](crate::Tree::write), so mutations here never race.
#[derive(Debug)]
pub struct Arena<P> {
    slots: Vec<Option<Node<P>>>,
    free: Vec<usize>,
    root: NodeId,
}

impl<P> Arena<P> {
    /// Creates an arena whose only node is a mount root for `abspath`.
    #[must_use]
    pub fn new(abspath: &str, mode: Mode) -> Self {
        Self {
            slots: vec![Some(Node::root(abspath, mode))],
            free: Vec::new(),
            root: NodeId::new(0),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always false; the root cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node<P>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Like [`get`](Self::get) but reports a missing node as an error.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if the slot is empty.
    pub fn node(&self, id: NodeId) -> Result<&Node<P>, TreeError> {
        self.get(id).ok_or(TreeError::Stale { id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<P>, TreeError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TreeError::Stale { id })
    }

    fn alloc(&mut self, node: Node<P>) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId::new(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Attaches `child` under `parent` and returns its id.
    ///
    /// The child inherits the parent's uid, gid and mode with
    /// [`Mode::ROOT`] cleared. If the parent is distinct, an existing
    /// sibling of the same name is removed first. If the parent is
    /// sorted, the child lands before the first sibling whose name is
    /// greater than or equal to its own; otherwise it is appended.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `parent` no longer exists.
    pub fn add(&mut self, parent: NodeId, mut child: Node<P>) -> Result<NodeId, TreeError> {
        let inherited = self.node(parent)?.seal();
        *child.seal_mut() = Seal::new(inherited.uid, inherited.gid, inherited.mode - Mode::ROOT);
        child.set_parent(Some(parent));
        child.children_mut().clear();

        if inherited.mode.is_distinct() {
            self.delete(parent, child.name());
        }
        let pos = if inherited.mode.is_sorted() {
            let siblings = self.node(parent)?.children();
            siblings.partition_point(|id| {
                self.get(*id)
                    .is_some_and(|sibling| sibling.name() < child.name())
            })
        } else {
            self.node(parent)?.children().len()
        };

        debug!(parent = %parent, name = %child.name(), pos, "add node");
        let id = self.alloc(child);
        self.node_mut(parent)?.children_mut().insert(pos, id);
        Ok(id)
    }

    /// Attaches each child in order.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `parent` no longer exists.
    pub fn add_all(
        &mut self,
        parent: NodeId,
        children: impl IntoIterator<Item = Node<P>>,
    ) -> Result<Vec<NodeId>, TreeError> {
        children
            .into_iter()
            .map(|child| self.add(parent, child))
            .collect()
    }

    /// Creates and attaches a child named `name`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `parent` no longer exists.
    pub fn make(&mut self, parent: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.add(parent, Node::new(name))
    }

    /// Creates and attaches one child per name, in order.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `parent` no longer exists.
    pub fn make_all<S: AsRef<str>>(
        &mut self,
        parent: NodeId,
        names: &[S],
    ) -> Result<Vec<NodeId>, TreeError> {
        names
            .iter()
            .map(|name| self.make(parent, name.as_ref()))
            .collect()
    }

    /// Unlinks the first child of `parent` named exactly `name`.
    ///
    /// The removed node is returned detached; the slots of its whole
    /// subtree are freed. Returns `None` if there is no such child.
    pub fn delete(&mut self, parent: NodeId, name: &str) -> Option<Node<P>> {
        let pos = self.get(parent)?.children().iter().position(|id| {
            self.get(*id)
                .is_some_and(|child| child.name() == name)
        })?;
        let id = self.slots[parent.index()]
            .as_mut()?
            .children_mut()
            .remove(pos);

        let mut stack: Vec<NodeId> = self.get(id)?.children().to_vec();
        let mut freed = 0usize;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.slots.get_mut(next.index()).and_then(Option::take) {
                stack.extend_from_slice(node.children());
                self.free.push(next.index());
                freed += 1;
            }
        }

        let mut removed = self.slots.get_mut(id.index()).and_then(Option::take)?;
        self.free.push(id.index());
        removed.set_parent(None);
        removed.children_mut().clear();
        debug!(parent = %parent, name, descendants = freed, "delete node");
        Some(removed)
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.children().first().copied()
    }

    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.children().last().copied()
    }

    /// Child ids of `id`, empty if the node does not exist.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], Node::children)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent()
    }

    /// Detached snapshot: same name and seal, no relations, no payload.
    #[must_use]
    pub fn copy(&self, id: NodeId) -> Option<Node<P>> {
        self.get(id).map(Node::detached_copy)
    }

    /// # Errors
    ///
    /// [`TreeError::Stale`] if `id` no longer exists.
    pub fn set_uid(&mut self, id: NodeId, uid: Uid) -> Result<(), TreeError> {
        self.node_mut(id)?.seal_mut().uid = uid;
        Ok(())
    }

    /// # Errors
    ///
    /// [`TreeError::Stale`] if `id` no longer exists.
    pub fn set_gid(&mut self, id: NodeId, gid: Gid) -> Result<(), TreeError> {
        self.node_mut(id)?.seal_mut().gid = gid;
        Ok(())
    }

    /// Replaces only the twelve permission bits.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `id` no longer exists.
    pub fn set_perm(&mut self, id: NodeId, perm: u32) -> Result<(), TreeError> {
        let seal = self.node_mut(id)?.seal_mut();
        seal.mode = seal.mode.with_perm(perm);
        Ok(())
    }

    /// Sets owner, group and permission bits in one step.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `id` no longer exists.
    pub fn set_seal(&mut self, id: NodeId, uid: Uid, gid: Gid, perm: u32) -> Result<(), TreeError> {
        let seal = self.node_mut(id)?.seal_mut();
        seal.uid = uid;
        seal.gid = gid;
        seal.mode = seal.mode.with_perm(perm);
        Ok(())
    }

    /// Clears the bits of `mask`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `id` no longer exists.
    pub fn unset_mode(&mut self, id: NodeId, mask: Mode) -> Result<(), TreeError> {
        let seal = self.node_mut(id)?.seal_mut();
        seal.mode -= mask;
        Ok(())
    }

    /// Replaces the payload; `None` clears it.
    ///
    /// Blocks while a handle holds the node's payload lock, so callers
    /// only use it on nodes no handle can reach yet.
    ///
    /// # Errors
    ///
    /// [`TreeError::Stale`] if `id` no longer exists.
    pub fn set_payload(&mut self, id: NodeId, payload: Option<P>) -> Result<(), TreeError> {
        *self.node(id)?.payload().write() = payload;
        Ok(())
    }

    /// Absolute path of `id`: ancestor names joined from the mount root.
    #[must_use]
    pub fn abs_path(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut cur = Some(id);
        while let Some(next) = cur {
            let node = self.get(next)?;
            names.push(node.name());
            cur = node.parent();
        }
        let mut abspath = String::new();
        for name in names.iter().rev() {
            abspath = path::join(&abspath, name);
        }
        Some(abspath)
    }

    /// Resolves `abspath` to the chain of ids from the mount root to the
    /// target, matching each segment exactly against child names.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NotRoot`] if `abspath` is outside this mount.
    /// - [`TreeError::NotFound`] at the first segment with no matching
    ///   child; `found` holds the chain resolved so far.
    pub fn locate(&self, abspath: &str) -> Result<Vec<NodeId>, TreeError> {
        let root = self.node(self.root)?;
        let cleaned = path::clean(abspath);
        let rest = strip_mount(&cleaned, root.name()).ok_or_else(|| TreeError::NotRoot {
            path: abspath.to_string(),
            root: root.name().to_string(),
        })?;

        let mut chain = vec![self.root];
        let mut cur = self.root;
        for segment in path::segments(rest) {
            let next = self.children(cur).iter().copied().find(|id| {
                self.get(*id)
                    .is_some_and(|child| child.name() == segment)
            });
            match next {
                Some(id) => {
                    chain.push(id);
                    cur = id;
                }
                None => {
                    return Err(TreeError::NotFound {
                        path: abspath.to_string(),
                        found: chain,
                    })
                }
            }
        }
        Ok(chain)
    }

    /// Resolves `abspath` to its node id.
    ///
    /// # Errors
    ///
    /// Same as [`locate`](Self::locate).
    pub fn find(&self, abspath: &str) -> Result<NodeId, TreeError> {
        let chain = self.locate(abspath)?;
        chain.last().copied().ok_or(TreeError::NotFound {
            path: abspath.to_string(),
            found: Vec::new(),
        })
    }
}

/// Returns the part of `cleaned` below `mount`, or `None` if `cleaned`
/// is not `mount` itself or a path beneath it.
fn strip_mount<'a>(cleaned: &'a str, mount: &str) -> Option<&'a str> {
    if mount == "/" {
        return cleaned.strip_prefix('/');
    }
    let rest = cleaned.strip_prefix(mount)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
