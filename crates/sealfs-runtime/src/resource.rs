//! Resource descriptions and open handles.

use crate::Payload;
use parking_lot::{ArcRwLockReadGuard, ArcRwLockWriteGuard, RawRwLock};
use sealfs_auth::{Mode, Seal, Sealed};
use sealfs_tree::Node;
use std::io;

/// Snapshot of a resource, as returned by [`Syscall::stat`](crate::Syscall::stat)
/// and passed to walk visitors.
///
/// Changes to the tree after the snapshot was taken are not reflected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResInfo {
    name: String,
    abspath: String,
    seal: Seal,
}

impl ResInfo {
    pub(crate) fn new(node: &Node<Payload>, abspath: impl Into<String>) -> Self {
        Self {
            name: node.name().to_string(),
            abspath: abspath.into(),
            seal: node.seal(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn abspath(&self) -> &str {
        &self.abspath
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.seal.mode
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.seal.mode.is_dir()
    }
}

impl Sealed for ResInfo {
    fn seal(&self) -> Seal {
        self.seal
    }
}

impl std::fmt::Display for ResInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.seal, self.name)
    }
}

/// Read access to a resource's content.
///
/// Holds the node's shared payload lock until dropped or closed. Other
/// readers proceed. Recreating the path does not wait on the handle: the
/// new node gets its own lock and this handle keeps the old content.
pub struct ReadHandle {
    abspath: String,
    guard: ArcRwLockReadGuard<RawRwLock, Option<Payload>>,
    pos: usize,
}

impl ReadHandle {
    pub(crate) fn new(
        abspath: impl Into<String>,
        guard: ArcRwLockReadGuard<RawRwLock, Option<Payload>>,
    ) -> Self {
        Self {
            abspath: abspath.into(),
            guard,
            pos: 0,
        }
    }

    #[must_use]
    pub fn abspath(&self) -> &str {
        &self.abspath
    }

    fn content(&self) -> &[u8] {
        (*self.guard)
            .as_ref()
            .and_then(Payload::as_bytes)
            .unwrap_or_default()
    }

    /// Total content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Releases the payload lock.
    pub fn close(self) {}
}

impl io::Read for ReadHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = self.content().get(self.pos..).unwrap_or_default();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl std::fmt::Debug for ReadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadHandle")
            .field("abspath", &self.abspath)
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}

/// Write access to a freshly created resource.
///
/// Holds the node's exclusive payload lock. Written bytes become the
/// payload when the handle is closed or dropped.
pub struct WriteHandle {
    abspath: String,
    guard: Option<ArcRwLockWriteGuard<RawRwLock, Option<Payload>>>,
    buf: Vec<u8>,
}

impl WriteHandle {
    pub(crate) fn new(
        abspath: impl Into<String>,
        guard: ArcRwLockWriteGuard<RawRwLock, Option<Payload>>,
    ) -> Self {
        Self {
            abspath: abspath.into(),
            guard: Some(guard),
            buf: Vec::new(),
        }
    }

    #[must_use]
    pub fn abspath(&self) -> &str {
        &self.abspath
    }

    /// Stores the written bytes and releases the lock.
    pub fn close(mut self) {
        self.commit();
    }

    fn commit(&mut self) {
        if let Some(mut guard) = self.guard.take() {
            *guard = Some(Payload::Bytes(std::mem::take(&mut self.buf)));
        }
    }
}

impl io::Write for WriteHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for WriteHandle {
    fn drop(&mut self) {
        self.commit();
    }
}

impl std::fmt::Debug for WriteHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteHandle")
            .field("abspath", &self.abspath)
            .field("buffered", &self.buf.len())
            .finish_non_exhaustive()
    }
}
