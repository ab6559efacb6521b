//! A mounted tree: an [`Arena`] behind one structural lock.

use crate::Arena;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use sealfs_auth::Mode;

/// One mounted tree.
///
/// All structural changes (adding, deleting, seal setters) go through
/// [`write`](Self::write); lookups and walks go through
/// [`read`](Self::read). Payloads have their own per-node locks, see
/// [`SharedPayload`](crate::SharedPayload).
///
/// # Example
///
/// ```
/// use sealfs_auth::Mode;
/// use sealfs_tree::Tree;
///
/// let tree: Tree<String> = Tree::new("/", Mode::SORT | Mode::DISTINCT);
/// {
///     let mut arena = tree.write();
///     let root = arena.root();
///     arena.make_all(root, &["b", "a"]).unwrap();
/// }
/// let arena = tree.read();
/// assert_eq!(arena.abs_path(arena.find("/a").unwrap()).unwrap(), "/a");
/// ```
#[derive(Debug)]
pub struct Tree<P> {
    mount: String,
    arena: RwLock<Arena<P>>,
}

impl<P> Tree<P> {
    /// Creates a tree whose root is named by the cleaned `abspath`.
    #[must_use]
    pub fn new(abspath: &str, mode: Mode) -> Self {
        Self {
            mount: crate::path::clean(abspath),
            arena: RwLock::new(Arena::new(abspath, mode)),
        }
    }

    /// Cleaned mount path; never changes after construction.
    #[must_use]
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Shared access for lookups and walks.
    pub fn read(&self) -> RwLockReadGuard<'_, Arena<P>> {
        self.arena.read()
    }

    /// Exclusive access for structural changes.
    pub fn write(&self) -> RwLockWriteGuard<'_, Arena<P>> {
        self.arena.write()
    }
}
