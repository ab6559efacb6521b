//! Depth-first traversal with cooperative controls.
//!
//! A walk visits nodes in preorder. The visitor steers the walk through
//! the [`Step`] it returns for each node:
//!
//! | Field | Effect |
//! |-------|--------|
//! | `skip_child` | do not descend into this node |
//! | `skip_sibling` | do not visit the remaining siblings of this node |
//! | `stop` | end the whole walk now |
//!
//! Each control applies to the node just visited and nothing else.
//!
//! # Example
//!
//! ```
//! use sealfs_auth::Mode;
//! use sealfs_tree::{Step, Tree, Walker};
//!
//! let tree: Tree<()> = Tree::new("/", Mode::SORT | Mode::DISTINCT);
//! {
//!     let mut arena = tree.write();
//!     let root = arena.root();
//!     let b = arena.make(root, "b").unwrap();
//!     arena.make(root, "a").unwrap();
//!     arena.make_all(b, &["2", "1"]).unwrap();
//! }
//!
//! let arena = tree.read();
//! let mut seen = Vec::new();
//! Walker::new().walk(&arena, arena.root(), |_, _, abspath| {
//!     seen.push(abspath.to_string());
//!     Step::CONTINUE
//! });
//! assert_eq!(seen, ["/", "/a", "/b", "/b/1", "/b/2"]);
//! ```

use crate::{path, Arena, Node, NodeId};

/// Visitor verdict for the node just visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    pub skip_child: bool,
    pub skip_sibling: bool,
    pub stop: bool,
}

impl Step {
    /// Keep walking normally.
    pub const CONTINUE: Self = Self {
        skip_child: false,
        skip_sibling: false,
        stop: false,
    };

    #[must_use]
    pub const fn skip_child() -> Self {
        Self {
            skip_child: true,
            ..Self::CONTINUE
        }
    }

    #[must_use]
    pub const fn skip_sibling() -> Self {
        Self {
            skip_sibling: true,
            ..Self::CONTINUE
        }
    }

    #[must_use]
    pub const fn stop() -> Self {
        Self {
            stop: true,
            ..Self::CONTINUE
        }
    }
}

/// Walk configuration.
///
/// Recursive by default. A non-recursive walk still descends one level
/// from the start node and from a mount root, which is what a plain
/// directory listing needs.
#[derive(Debug, Clone)]
pub struct Walker {
    recursive: bool,
    skip_visit: bool,
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

impl Walker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recursive: true,
            skip_visit: false,
        }
    }

    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Do not call the visitor for the start node. Its children are
    /// still walked.
    #[must_use]
    pub fn skip_visit(mut self) -> Self {
        self.skip_visit = true;
        self
    }

    #[must_use]
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Walks the subtree rooted at `start`.
    ///
    /// The visitor receives the node id, the node and its absolute path.
    /// Siblings of `start` are not walked. Returns `false` if a visitor
    /// stopped the walk, `true` if it ran to completion.
    pub fn walk<P, F>(&self, arena: &Arena<P>, start: NodeId, mut visitor: F) -> bool
    where
        F: FnMut(NodeId, &Node<P>, &str) -> Step,
    {
        let parent_path = arena
            .parent(start)
            .and_then(|parent| arena.abs_path(parent))
            .unwrap_or_default();
        !self.visit(arena, start, &parent_path, true, &mut visitor).stop
    }

    fn visit<P, F>(
        &self,
        arena: &Arena<P>,
        id: NodeId,
        parent_path: &str,
        start: bool,
        visitor: &mut F,
    ) -> Step
    where
        F: FnMut(NodeId, &Node<P>, &str) -> Step,
    {
        let Some(node) = arena.get(id) else {
            return Step::CONTINUE;
        };
        let abspath = path::join(parent_path, node.name());
        let step = if start && self.skip_visit {
            Step::CONTINUE
        } else {
            visitor(id, node, &abspath)
        };
        if step.stop {
            return step;
        }

        let descend = node.is_root() || start || self.recursive;
        if descend && !step.skip_child {
            for child in node.children() {
                let inner = self.visit(arena, *child, &abspath, false, visitor);
                if inner.stop {
                    return Step::stop();
                }
                if inner.skip_sibling {
                    break;
                }
            }
        }
        Step {
            skip_child: false,
            ..step
        }
    }
}
