//! Permission-checked access to a [`System`].
//!
//! # Path resolution
//!
//! Every operation cleans its path, picks the mount that covers it and
//! resolves the chain of nodes from that mount's root to the target.
//! The account needs `exec` on every node of the chain except the
//! target itself; the operation then checks its own permission on the
//! target or on its parent:
//!
//! | Operation | Checked on target | Checked on parent |
//! |-----------|-------------------|-------------------|
//! | `stat` | | |
//! | `open` | read | |
//! | `exec` | exec | |
//! | `mkdir`, `create`, `install` | | write |
//! | `remove_all` | | write |
//! | `set_mode` | owner or root | |
//!
//! When a path does not resolve, the part that did resolve is still
//! checked, so an account that cannot pass a directory gets
//! `PermissionDenied` rather than learning what is missing behind it.

use crate::{audit, Cmd, FsError, FsTree, Payload, ReadHandle, ResInfo, System, WriteHandle};
use sealfs_auth::{Account, AccountRecord, Mode, Operation, Sealed};
use sealfs_tree::{path, Arena, Node, NodeId, Step, Tree, TreeError, Walker};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Directory holding one `<name>.acc` resource per account.
pub const ACCOUNTS_DIR: &str = "/etc/accounts";

/// Permission bits of a mount root.
pub const DEFAULT_ROOT_PERM: u32 = 0o1755;

/// Permission bits of a resource made by [`Syscall::create`].
pub const CREATE_PERM: u32 = 0o644;

/// A [`System`] as seen by one account.
///
/// # Example
///
/// ```
/// use sealfs_auth::Account;
/// use sealfs_runtime::System;
/// use sealfs_types::Uid;
/// use std::io::{Read, Write};
///
/// let sys = System::new().unwrap();
/// let john = Account::new("john", Uid::new(2));
/// let asjohn = sys.syscall(&john);
///
/// let mut w = asjohn.create("/tmp/note").unwrap();
/// w.write_all(b"hello").unwrap();
/// w.close();
///
/// let mut content = String::new();
/// asjohn.open("/tmp/note").unwrap().read_to_string(&mut content).unwrap();
/// assert_eq!(content, "hello");
/// ```
#[derive(Clone, Copy)]
pub struct Syscall<'a> {
    system: &'a System,
    account: &'a Account,
}

impl<'a> Syscall<'a> {
    pub(crate) fn new(system: &'a System, account: &'a Account) -> Self {
        Self { system, account }
    }

    #[must_use]
    pub fn account(&self) -> &'a Account {
        self.account
    }

    #[must_use]
    pub fn system(&self) -> &'a System {
        self.system
    }

    /// Describes the resource at `abspath`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not resolve
    /// - [`FsError::PermissionDenied`] if an ancestor lacks `exec`
    pub fn stat(&self, abspath: &str) -> Result<ResInfo, FsError> {
        let abspath = normalize(abspath)?;
        let tree = self.system.root_for(&abspath)?;
        let arena = tree.read();
        let id = self.resolve(&arena, &abspath)?;
        self.info(&arena, id, &abspath)
    }

    /// Creates a directory with permission bits `perm`. The parent must
    /// exist.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidMode`] if `perm` exceeds `0o7777`
    /// - [`FsError::NotADirectory`] if the parent is not a directory
    /// - [`FsError::AlreadyExists`] if the name is taken
    /// - [`FsError::PermissionDenied`] without `write` on the parent
    pub fn mkdir(&self, abspath: &str, perm: u32) -> Result<ResInfo, FsError> {
        let abspath = normalize(abspath)?;
        check_perm(&abspath, perm)?;
        let (dir, name) = split_target(&abspath)?;
        let tree = self.system.root_for(dir)?;
        let mut arena = tree.write();

        let parent = self.writable_dir(&arena, dir, &abspath)?;
        let escaped = path::escape(name);
        let taken = arena
            .children(parent)
            .iter()
            .filter_map(|id| arena.get(*id))
            .any(|child| child.name() == escaped);
        if taken {
            return Err(FsError::AlreadyExists { path: abspath });
        }

        let id = arena.make(parent, name)?;
        arena.set_perm(id, perm)?;
        debug!(uid = %self.account.uid(), path = %abspath, perm = format_args!("{perm:04o}"), "mkdir");
        self.info(&arena, id, &abspath)
    }

    /// Opens a text or bytes resource for reading.
    ///
    /// The handle holds the resource's shared payload lock, not the tree
    /// lock. A [`create`](Self::create) of the same path does not wait
    /// for it: it replaces or appends a node with a fresh payload, and
    /// the open handle keeps reading the old content.
    ///
    /// # Errors
    ///
    /// - [`FsError::PermissionDenied`] without `read` on the resource
    /// - [`FsError::IsADirectory`] for directories
    /// - [`FsError::NotReadable`] for executables and empty resources
    pub fn open(&self, abspath: &str) -> Result<ReadHandle, FsError> {
        let abspath = normalize(abspath)?;
        let tree = self.system.root_for(&abspath)?;
        let slot = {
            let arena = tree.read();
            let id = self.resolve(&arena, &abspath)?;
            let node = arena.node(id)?;
            self.check(&abspath, Operation::Read, node)?;
            if node.is_dir() {
                return Err(FsError::IsADirectory { path: abspath });
            }
            Arc::clone(node.payload())
        };
        let guard = slot.read_arc();
        if !(*guard).as_ref().is_some_and(Payload::is_readable) {
            return Err(FsError::NotReadable { path: abspath });
        }
        debug!(uid = %self.account.uid(), path = %abspath, "open");
        Ok(ReadHandle::new(abspath, guard))
    }

    /// Creates, or replaces in a distinct directory, a resource with
    /// permission bits `0o644` and returns a handle for writing it.
    ///
    /// # Errors
    ///
    /// - [`FsError::IsADirectory`] if `abspath` is a directory
    /// - [`FsError::NotADirectory`] if the parent is not a directory
    /// - [`FsError::PermissionDenied`] without `write` on the parent
    pub fn create(&self, abspath: &str) -> Result<WriteHandle, FsError> {
        let abspath = normalize(abspath)?;
        let (dir, name) = split_target(&abspath)?;
        let tree = self.system.root_for(dir)?;
        let mut arena = tree.write();

        let parent = self.writable_dir(&arena, dir, &abspath)?;
        ensure_not_dir(&arena, parent, name, &abspath)?;
        let id = arena.make(parent, name)?;
        arena.set_perm(id, CREATE_PERM)?;
        arena.unset_mode(id, Mode::DIR)?;

        // nobody else can reach the new node while the tree is locked
        let guard = arena.node(id)?.payload().write_arc();
        debug!(uid = %self.account.uid(), path = %abspath, "create");
        Ok(WriteHandle::new(abspath, guard))
    }

    /// Attaches `payload` at `abspath` with permission bits `perm`.
    ///
    /// Authorization is the same as for [`create`](Self::create).
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create), plus [`FsError::InvalidMode`].
    pub fn install(&self, abspath: &str, payload: Payload, perm: u32) -> Result<ResInfo, FsError> {
        let abspath = normalize(abspath)?;
        check_perm(&abspath, perm)?;
        let (dir, name) = split_target(&abspath)?;
        let tree = self.system.root_for(dir)?;
        let mut arena = tree.write();

        let parent = self.writable_dir(&arena, dir, &abspath)?;
        ensure_not_dir(&arena, parent, name, &abspath)?;
        let id = arena.make(parent, name)?;
        arena.set_payload(id, Some(payload))?;
        arena.set_perm(id, perm)?;
        arena.unset_mode(id, Mode::DIR)?;
        debug!(uid = %self.account.uid(), path = %abspath, perm = format_args!("{perm:04o}"), "install");
        self.info(&arena, id, &abspath)
    }

    /// Runs the executable at the command's path as this account.
    ///
    /// The tree is not locked while the command runs, so commands may
    /// issue syscalls of their own. Every attempt that reaches the
    /// executable is audited.
    ///
    /// # Errors
    ///
    /// - [`FsError::PermissionDenied`] without `exec` on the resource
    /// - [`FsError::NotExecutable`] if the payload is not executable
    /// - any error returned by the command itself
    pub fn exec(&self, mut cmd: Cmd<'_>) -> Result<(), FsError> {
        let abspath = normalize(cmd.abspath())?;
        let tree = self.system.root_for(&abspath)?;
        let slot = {
            let arena = tree.read();
            let id = self.resolve(&arena, &abspath)?;
            let node = arena.node(id)?;
            self.check(&abspath, Operation::Execute, node)?;
            Arc::clone(node.payload())
        };
        let executable = (*slot.read()).as_ref().and_then(Payload::executable);
        let executable = executable.ok_or(FsError::NotExecutable { path: abspath })?;

        let result = executable.exec(self, &mut cmd);
        self.system
            .audit(&audit::record(self.account.uid(), &cmd, result.is_err()));
        result
    }

    /// Runs `abspath` with `args`, discarding output.
    ///
    /// # Errors
    ///
    /// Same as [`exec`](Self::exec).
    pub fn run<I, S>(&self, abspath: &str, args: I) -> Result<(), FsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exec(Cmd::new(abspath, args))
    }

    /// Runs `abspath` with `args`, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Same as [`exec`](Self::exec).
    pub fn fexec<I, S>(&self, out: &mut dyn Write, abspath: &str, args: I) -> Result<(), FsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exec(Cmd::new(abspath, args).with_output(out))
    }

    /// Replaces the permission bits of `abspath`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidMode`] if `perm` exceeds `0o7777`
    /// - [`FsError::NotOwner`] unless the account owns the resource or is root
    pub fn set_mode(&self, abspath: &str, perm: u32) -> Result<(), FsError> {
        let abspath = normalize(abspath)?;
        check_perm(&abspath, perm)?;
        let tree = self.system.root_for(&abspath)?;
        let mut arena = tree.write();
        let id = self.resolve(&arena, &abspath)?;
        let owner = arena.node(id)?.uid();
        if !self.account.owns(owner) && !self.account.is_root() {
            warn!(uid = %self.account.uid(), path = %abspath, owner = %owner, "set_mode denied");
            return Err(FsError::NotOwner {
                path: abspath,
                uid: self.account.uid(),
            });
        }
        arena.set_perm(id, perm)?;
        debug!(uid = %self.account.uid(), path = %abspath, perm = format_args!("{perm:04o}"), "set_mode");
        Ok(())
    }

    /// Removes `abspath` and everything below it.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] for a mount root
    /// - [`FsError::PermissionDenied`] without `exec` on an ancestor or
    ///   `write` on the parent
    pub fn remove_all(&self, abspath: &str) -> Result<(), FsError> {
        let abspath = normalize(abspath)?;
        let tree = self.system.root_for(&abspath)?;
        if abspath == tree.mount() {
            return Err(FsError::InvalidPath { path: abspath });
        }
        let mut arena = tree.write();
        let chain = self.resolve_chain(&arena, &abspath)?;
        let &[.., parent, target] = chain.as_slice() else {
            return Err(FsError::InvalidPath { path: abspath });
        };
        self.check(&abspath, Operation::Write, arena.node(parent)?)?;

        let name = arena.node(target)?.name().to_string();
        let removed = arena.delete(parent, &name);
        if removed.is_none() {
            return Err(FsError::NotFound { path: abspath });
        }
        debug!(uid = %self.account.uid(), path = %abspath, "remove_all");
        Ok(())
    }

    /// Walks the tree from `abspath`, calling `visitor` for each node the
    /// account may see.
    ///
    /// Children of a directory the account cannot `exec` are skipped
    /// without error. The tree stays read-locked for the whole walk, so
    /// the visitor must not modify it.
    ///
    /// # Errors
    ///
    /// Same as [`stat`](Self::stat) for the start path.
    pub fn walk<F>(&self, abspath: &str, recursive: bool, visitor: F) -> Result<(), FsError>
    where
        F: FnMut(&ResInfo) -> Step,
    {
        self.walk_with(abspath, &Walker::new().recursive(recursive), visitor)
    }

    /// Like [`walk`](Self::walk) with a preconfigured [`Walker`].
    ///
    /// # Errors
    ///
    /// Same as [`stat`](Self::stat) for the start path.
    pub fn walk_with<F>(&self, abspath: &str, walker: &Walker, mut visitor: F) -> Result<(), FsError>
    where
        F: FnMut(&ResInfo) -> Step,
    {
        let abspath = normalize(abspath)?;
        let tree = self.system.root_for(&abspath)?;
        let arena = tree.read();
        let start = self.resolve(&arena, &abspath)?;
        walker.walk(&arena, start, |_, node, nodepath| {
            let mut step = visitor(&ResInfo::new(node, nodepath));
            if node.is_dir() && self.account.permitted(Operation::Execute, &node.seal()).is_err() {
                step.skip_child = true;
            }
            step
        });
        Ok(())
    }

    /// Stores `value` as JSON at `abspath`, replacing an existing
    /// resource.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create), plus [`FsError::Codec`].
    pub fn save<T: Serialize + ?Sized>(&self, abspath: &str, value: &T) -> Result<(), FsError> {
        let mut w = self.create(abspath)?;
        let encoded = serde_json::to_writer(&mut w, value);
        encoded.map_err(|e| FsError::codec(w.abspath(), e))?;
        w.close();
        Ok(())
    }

    /// Like [`save`](Self::save) but refuses to overwrite.
    ///
    /// # Errors
    ///
    /// [`FsError::AlreadyExists`] if `abspath` is already present.
    pub fn save_as<T: Serialize + ?Sized>(&self, abspath: &str, value: &T) -> Result<(), FsError> {
        if self.stat(abspath).is_ok() {
            return Err(FsError::AlreadyExists {
                path: normalize(abspath)?,
            });
        }
        self.save(abspath, value)
    }

    /// Reads a JSON value stored with [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open), plus [`FsError::Codec`].
    pub fn load<T: DeserializeOwned>(&self, abspath: &str) -> Result<T, FsError> {
        let r = self.open(abspath)?;
        let path = r.abspath().to_string();
        serde_json::from_reader(r).map_err(|e| FsError::codec(path, e))
    }

    /// Stores `account` as `/etc/accounts/<name>.acc`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if the name is empty or needs escaping
    /// - [`FsError::AlreadyExists`] if the account is already stored
    pub fn add_account(&self, account: &Account) -> Result<(), FsError> {
        let abspath = account_path(account.name())?;
        self.save_as(&abspath, &account.record())?;
        info!(uid = %self.account.uid(), name = account.name(), account_uid = %account.uid(), "account added");
        Ok(())
    }

    /// Loads a stored account by name.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_account(&self, name: &str) -> Result<Account, FsError> {
        let record: AccountRecord = self.load(&account_path(name)?)?;
        Ok(Account::from(record))
    }

    /// Mounts a new tree at `abspath`, owned by this account.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotRoot`] unless the account is root
    /// - [`FsError::MountExists`] if `abspath` is already a mount
    pub fn mount(&self, abspath: &str, mode: Mode) -> Result<(), FsError> {
        self.mount_with_perm(abspath, mode, DEFAULT_ROOT_PERM)
    }

    pub(crate) fn mount_with_perm(&self, abspath: &str, mode: Mode, perm: u32) -> Result<(), FsError> {
        let abspath = normalize(abspath)?;
        if !self.account.is_root() {
            return Err(FsError::NotRoot {
                path: abspath,
                uid: self.account.uid(),
            });
        }
        check_perm(&abspath, perm)?;
        let tree: FsTree = Tree::new(&abspath, mode);
        {
            let mut arena = tree.write();
            let root = arena.root();
            arena.set_seal(root, self.account.uid(), self.account.gid(), perm)?;
        }
        self.system.mount_tree(tree)
    }

    fn check(&self, abspath: &str, op: Operation, node: &Node<Payload>) -> Result<(), FsError> {
        self.account.permitted(op, &node.seal()).map_err(|source| {
            warn!(uid = %self.account.uid(), path = abspath, op = %op, seal = %source.seal, "permission denied");
            FsError::denied(abspath, source)
        })
    }

    /// Chain from the mount root to `abspath` with `exec` checked on
    /// every node but the last.
    fn resolve_chain(&self, arena: &Arena<Payload>, abspath: &str) -> Result<Vec<NodeId>, FsError> {
        let chain = match arena.locate(abspath) {
            Ok(chain) => chain,
            Err(TreeError::NotFound { path, found }) => {
                // every resolved node is an ancestor of the missing one
                for id in &found {
                    self.check(abspath, Operation::Execute, arena.node(*id)?)?;
                }
                debug!(uid = %self.account.uid(), path = %path, "not found");
                return Err(FsError::NotFound { path });
            }
            Err(err) => return Err(err.into()),
        };
        if let Some((_, ancestors)) = chain.split_last() {
            for id in ancestors {
                self.check(abspath, Operation::Execute, arena.node(*id)?)?;
            }
        }
        Ok(chain)
    }

    fn resolve(&self, arena: &Arena<Payload>, abspath: &str) -> Result<NodeId, FsError> {
        let chain = self.resolve_chain(arena, abspath)?;
        chain.last().copied().ok_or_else(|| FsError::NotFound {
            path: abspath.to_string(),
        })
    }

    /// Resolves `dir` and checks it is a directory this account may
    /// write to. `target` is used in error messages.
    fn writable_dir(&self, arena: &Arena<Payload>, dir: &str, target: &str) -> Result<NodeId, FsError> {
        let parent = self.resolve(arena, dir)?;
        let node = arena.node(parent)?;
        if !node.is_dir() {
            return Err(FsError::NotADirectory {
                path: path::clean(dir),
            });
        }
        self.check(target, Operation::Write, node)?;
        Ok(parent)
    }

    fn info(&self, arena: &Arena<Payload>, id: NodeId, fallback: &str) -> Result<ResInfo, FsError> {
        let abspath = arena.abs_path(id).unwrap_or_else(|| fallback.to_string());
        Ok(ResInfo::new(arena.node(id)?, abspath))
    }
}

impl std::fmt::Debug for Syscall<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Syscall")
            .field("account", &self.account.name())
            .field("uid", &self.account.uid())
            .finish_non_exhaustive()
    }
}

/// Cleans `abspath` and rejects relative paths.
fn normalize(abspath: &str) -> Result<String, FsError> {
    let cleaned = path::clean(abspath);
    if cleaned.starts_with('/') {
        Ok(cleaned)
    } else {
        Err(FsError::InvalidPath {
            path: abspath.to_string(),
        })
    }
}

/// Splits a cleaned path into parent directory and a non-empty name.
fn split_target(abspath: &str) -> Result<(&str, &str), FsError> {
    match path::split(abspath) {
        (dir, name) if !name.is_empty() => Ok((dir, name)),
        _ => Err(FsError::InvalidPath {
            path: abspath.to_string(),
        }),
    }
}

fn check_perm(abspath: &str, perm: u32) -> Result<(), FsError> {
    match Mode::perm_from(perm) {
        Some(_) => Ok(()),
        None => Err(FsError::InvalidMode {
            path: abspath.to_string(),
            mode: perm,
        }),
    }
}

/// Rejects `name` under `parent` if it is a directory. Only called once
/// the parent has passed its permission checks.
fn ensure_not_dir(arena: &Arena<Payload>, parent: NodeId, name: &str, abspath: &str) -> Result<(), FsError> {
    let escaped = path::escape(name);
    let is_dir = arena
        .children(parent)
        .iter()
        .filter_map(|id| arena.get(*id))
        .any(|child| child.name() == escaped && child.is_dir());
    if is_dir {
        return Err(FsError::IsADirectory {
            path: abspath.to_string(),
        });
    }
    Ok(())
}

fn account_path(name: &str) -> Result<String, FsError> {
    if name.is_empty() || path::escape(name) != name {
        return Err(FsError::InvalidPath {
            path: format!("{ACCOUNTS_DIR}/{name}.acc"),
        });
    }
    Ok(format!("{ACCOUNTS_DIR}/{name}.acc"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealfs_types::{Gid, Uid};
    use std::io::Read;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn john() -> Account {
        Account::new("john", Uid::new(2))
    }

    #[test]
    fn normalize_rejects_relative() {
        assert_eq!(normalize("/a/../b/").expect("absolute"), "/b");
        assert!(matches!(normalize("a/b"), Err(FsError::InvalidPath { .. })));
        assert!(matches!(normalize(""), Err(FsError::InvalidPath { .. })));
    }

    #[test]
    fn split_target_needs_name() {
        assert_eq!(split_target("/tmp/x").expect("has name"), ("/tmp/", "x"));
        assert!(split_target("/").is_err());
    }

    #[test]
    fn account_path_rejects_unsafe_names() {
        assert_eq!(account_path("eva").expect("safe"), "/etc/accounts/eva.acc");
        assert!(account_path("").is_err());
        assert!(account_path("a/b").is_err());
        assert!(account_path("a b").is_err());
    }

    #[test]
    fn stat_root_and_tmp() {
        let sys = System::new().expect("bootstrap");
        let anon = Account::anonymous();
        let info = sys.syscall(&anon).stat("/").expect("stat /");
        assert_eq!(info.to_string(), "d--xrwxr-xr-x 1 1 /");
        let tmp = sys.syscall(&john()).stat("/tmp").expect("stat /tmp");
        assert_eq!(tmp.abspath(), "/tmp");
        assert_eq!(tmp.mode().perm(), 0o7777);
    }

    #[test]
    fn mkdir_inherits_owner_and_sets_perm() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let info = sys.syscall(&root).mkdir("/etc/conf", 0o0750).expect("mkdir");
        assert_eq!(info.seal().uid, Uid::ROOT);
        assert_eq!(info.seal().gid, Gid::ROOT);
        assert!(info.is_dir());
        assert_eq!(info.mode().perm(), 0o0750);
    }

    #[test]
    fn mkdir_existing_is_refused() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).mkdir("/tmp", 0o755).expect_err("exists");
        assert!(matches!(err, FsError::AlreadyExists { .. }));
    }

    #[test]
    fn mkdir_invalid_mode() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).mkdir("/x", 0o10000).expect_err("mode");
        assert!(matches!(err, FsError::InvalidMode { mode: 0o10000, .. }));
    }

    #[test]
    fn mkdir_under_resource_is_not_a_directory() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot.save("/tmp/file", &1).expect("save");
        let err = asroot.mkdir("/tmp/file/sub", 0o755).expect_err("file parent");
        assert!(matches!(err, FsError::NotADirectory { .. }), "{err}");
    }

    #[test]
    fn create_then_open_roundtrip() {
        let sys = System::new().expect("bootstrap");
        let acc = john();
        let asjohn = sys.syscall(&acc);

        let mut w = asjohn.create("/tmp/data").expect("create");
        w.write_all(&[0, 1, 2, 255]).expect("write");
        w.close();

        let info = asjohn.stat("/tmp/data").expect("stat");
        assert!(!info.is_dir());
        assert_eq!(info.mode().perm(), CREATE_PERM);

        let mut buf = Vec::new();
        asjohn
            .open("/tmp/data")
            .expect("open")
            .read_to_end(&mut buf)
            .expect("read");
        assert_eq!(buf, [0, 1, 2, 255]);
    }

    #[test]
    fn create_on_directory_fails() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).create("/tmp").expect_err("dir");
        assert!(matches!(err, FsError::IsADirectory { .. }));
    }

    #[test]
    fn open_directory_fails() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).open("/etc").expect_err("dir");
        assert!(matches!(err, FsError::IsADirectory { .. }));
    }

    #[test]
    fn open_executable_is_not_readable() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).open("/bin/ls").expect_err("exec payload");
        assert!(matches!(err, FsError::NotReadable { .. }));
    }

    #[test]
    fn anonymous_cannot_create_in_etc() {
        let sys = System::new().expect("bootstrap");
        let anon = Account::anonymous();
        let err = sys.syscall(&anon).create("/etc/x").expect_err("no write");
        assert!(err.is_permission_denied());
    }

    #[test]
    fn install_sets_payload_and_mode() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        let info = asroot
            .install("/tmp/motd", Payload::from("welcome"), 0o0444)
            .expect("install");
        assert_eq!(info.mode().perm(), 0o0444);

        let mut text = String::new();
        asroot
            .open("/tmp/motd")
            .expect("open")
            .read_to_string(&mut text)
            .expect("read");
        assert_eq!(text, "welcome");
    }

    #[test]
    fn exec_requires_executable_payload() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot
            .install("/tmp/text", Payload::from("x"), 0o755)
            .expect("install");
        let err = asroot.run("/tmp/text", Vec::<String>::new()).expect_err("text");
        assert!(matches!(err, FsError::NotExecutable { .. }));
    }

    #[test]
    fn exec_waiting_on_writer_leaves_tree_unlocked() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        let w = asroot.create("/tmp/busy").expect("create");

        let (tx, rx) = mpsc::channel();
        let ran = thread::scope(|s| {
            let runner = s.spawn(|| asroot.run("/tmp/busy", Vec::<String>::new()));
            thread::sleep(Duration::from_millis(50));
            s.spawn(move || tx.send(asroot.mkdir("/tmp/unrelated", 0o755)));
            let made = rx.recv_timeout(Duration::from_secs(2));
            w.close();
            made.expect("mkdir done while exec waits").expect("mkdir");
            runner.join().expect("runner")
        });
        // the writer committed bytes, not an executable
        assert!(matches!(ran, Err(FsError::NotExecutable { .. })), "{ran:?}");
        asroot.stat("/tmp/unrelated").expect("stat");
    }

    #[test]
    fn create_in_locked_dir_hides_existing_names() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot.mkdir("/tmp/locked", 0).expect("mkdir");
        asroot.mkdir("/tmp/locked/secretdir", 0o755).expect("mkdir");

        let acc = john();
        let asjohn = sys.syscall(&acc);
        for target in ["/tmp/locked/secretdir", "/tmp/locked/nothing"] {
            let err = asjohn.create(target).expect_err("locked");
            assert!(err.is_permission_denied(), "{target}: {err}");
            let err = asjohn
                .install(target, Payload::from("x"), 0o644)
                .expect_err("locked");
            assert!(err.is_permission_denied(), "{target}: {err}");
        }
        let err = asroot.create("/tmp/locked/secretdir").expect_err("dir");
        assert!(matches!(err, FsError::IsADirectory { .. }));
    }

    #[test]
    fn set_mode_owner_or_root() {
        let sys = System::new().expect("bootstrap");
        let acc = john();
        let asjohn = sys.syscall(&acc);
        let err = asjohn.set_mode("/etc", 0o777).expect_err("not owner");
        assert!(matches!(err, FsError::NotOwner { .. }));

        // new nodes inherit the owner of their directory
        asjohn.save("/tmp/mine", &"x").expect("save");
        assert_eq!(asjohn.stat("/tmp/mine").expect("stat").seal().uid, Uid::ROOT);
        assert!(asjohn.set_mode("/tmp/mine", 0o600).is_err());

        let root = Account::root();
        sys.syscall(&root).set_mode("/tmp/mine", 0o600).expect("root may chmod");
        assert_eq!(asjohn.stat("/tmp/mine").expect("stat").mode().perm(), 0o600);
    }

    #[test]
    fn set_mode_validates_range() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).set_mode("/tmp", 0o17777).expect_err("range");
        assert!(matches!(err, FsError::InvalidMode { .. }));
    }

    #[test]
    fn remove_all_subtree() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot.mkdir("/tmp/a", 0o755).expect("mkdir");
        asroot.mkdir("/tmp/a/b", 0o755).expect("mkdir");
        asroot.remove_all("/tmp/a").expect("remove");
        assert!(asroot.stat("/tmp/a/b").expect_err("gone").is_not_found());
        assert!(asroot.stat("/tmp/a").expect_err("gone").is_not_found());
    }

    #[test]
    fn remove_all_mount_root_is_invalid() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).remove_all("/").expect_err("root");
        assert!(matches!(err, FsError::InvalidPath { .. }));
    }

    #[test]
    fn remove_all_needs_parent_write() {
        let sys = System::new().expect("bootstrap");
        let acc = john();
        let err = sys.syscall(&acc).remove_all("/etc/accounts").expect_err("write");
        assert!(err.is_permission_denied());
    }

    #[test]
    fn missing_path_behind_locked_dir_is_denied() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        sys.syscall(&root).mkdir("/tmp/locked", 0).expect("mkdir");
        let acc = john();
        let err = sys.syscall(&acc).stat("/tmp/locked/nothing").expect_err("denied");
        assert!(err.is_permission_denied(), "{err}");
    }

    #[test]
    fn save_as_refuses_overwrite_and_load_roundtrips() {
        let sys = System::new().expect("bootstrap");
        let acc = john();
        let asjohn = sys.syscall(&acc);
        asjohn.save_as("/tmp/v", &vec![1, 2, 3]).expect("save_as");
        let err = asjohn.save_as("/tmp/v", &vec![4]).expect_err("exists");
        assert!(matches!(err, FsError::AlreadyExists { .. }));
        let back: Vec<i32> = asjohn.load("/tmp/v").expect("load");
        assert_eq!(back, [1, 2, 3]);
    }

    #[test]
    fn load_wrong_type_is_codec_error() {
        let sys = System::new().expect("bootstrap");
        let acc = john();
        let asjohn = sys.syscall(&acc);
        asjohn.save("/tmp/s", &"text").expect("save");
        let err = asjohn.load::<Vec<u8>>("/tmp/s").expect_err("codec");
        assert!(matches!(err, FsError::Codec { .. }));
    }

    #[test]
    fn accounts_roundtrip() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        let eva = Account::new("eva", Uid::new(3)).with_gid(Gid::new(4));
        asroot.add_account(&eva).expect("add");

        let loaded = asroot.load_account("eva").expect("load");
        assert_eq!(loaded.uid(), Uid::new(3));
        assert_eq!(loaded.gid(), Gid::new(4));
        assert!(asroot.add_account(&eva).is_err());
    }

    #[test]
    fn mount_requires_root_and_rejects_duplicates() {
        let sys = System::new().expect("bootstrap");
        let acc = john();
        let err = sys.syscall(&acc).mount("/mnt/usb", Mode::DIR).expect_err("root only");
        assert!(matches!(err, FsError::NotRoot { .. }));

        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot.mount("/mnt/usb", Mode::SORT).expect("mount");
        let err = asroot.mount("/mnt/usb/", Mode::SORT).expect_err("dup");
        assert!(matches!(err, FsError::MountExists { .. }));

        asroot.mkdir("/mnt/usb/photos", 0o755).expect("mkdir on mount");
        let info = asroot.stat("/mnt/usb/photos").expect("stat");
        assert_eq!(info.abspath(), "/mnt/usb/photos");
        assert!(asroot.stat("/mnt").expect_err("not in /").is_not_found());
    }

    #[test]
    fn walk_prunes_unexecutable_dirs() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot.mkdir("/tmp/open", 0o755).expect("mkdir");
        asroot.mkdir("/tmp/open/inner", 0o755).expect("mkdir");
        asroot.mkdir("/tmp/closed", 0o700).expect("mkdir");
        asroot.mkdir("/tmp/closed/secret", 0o755).expect("mkdir");

        let acc = john();
        let mut seen = Vec::new();
        sys.syscall(&acc)
            .walk("/tmp", true, |info| {
                seen.push(info.abspath().to_string());
                Step::CONTINUE
            })
            .expect("walk");
        assert_eq!(seen, ["/tmp", "/tmp/closed", "/tmp/open", "/tmp/open/inner"]);
    }
}
