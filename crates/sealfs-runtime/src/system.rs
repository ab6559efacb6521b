//! Mount table and bootstrap.

use crate::audit::{Auditer, TracingAuditer};
use crate::config::SystemConfig;
use crate::syscall::{Syscall, ACCOUNTS_DIR};
use crate::{builtins, FsError, FsTree};
use parking_lot::RwLock;
use sealfs_auth::{Account, Mode};
use sealfs_tree::path;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A set of mounted trees and the accounts' view of them.
///
/// A `System` has no notion of a current account; every operation goes
/// through a [`Syscall`] obtained with [`syscall`](Self::syscall).
///
/// # Example
///
/// ```
/// use sealfs_auth::Account;
/// use sealfs_runtime::System;
///
/// let sys = System::new().unwrap();
/// let root = Account::root();
/// let asroot = sys.syscall(&root);
///
/// let mut out = Vec::new();
/// asroot.fexec(&mut out, "/bin/ls", ["/"]).unwrap();
/// assert!(String::from_utf8(out).unwrap().contains(" tmp\n"));
/// ```
pub struct System {
    mounts: RwLock<BTreeMap<String, Arc<FsTree>>>,
    auditer: RwLock<Option<Arc<dyn Auditer>>>,
}

impl System {
    /// A system with nothing mounted.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            mounts: RwLock::new(BTreeMap::new()),
            auditer: RwLock::new(None),
        }
    }

    /// A system bootstrapped from the default [`SystemConfig`].
    ///
    /// # Errors
    ///
    /// Same as [`from_config`](Self::from_config).
    pub fn new() -> Result<Self, FsError> {
        Self::from_config(&SystemConfig::default())
    }

    /// Bootstraps a system as root: mounts `/`, creates the configured
    /// directories, installs the builtins under `/bin` and stores the
    /// root and anonymous accounts under `/etc/accounts`.
    ///
    /// # Errors
    ///
    /// Any syscall failure during bootstrap, e.g. a configured directory
    /// whose parent is missing.
    pub fn from_config(config: &SystemConfig) -> Result<Self, FsError> {
        let sys = Self::bare();
        if config.audit {
            sys.set_auditer(Arc::new(TracingAuditer));
        }

        let root = Account::root();
        let asroot = sys.syscall(&root);

        let mut mode = Mode::DIR;
        if config.sorted {
            mode |= Mode::SORT;
        }
        if config.distinct {
            mode |= Mode::DISTINCT;
        }
        asroot.mount_with_perm("/", mode, config.root_perm)?;

        for dir in &config.dirs {
            asroot.mkdir(&dir.path, dir.mode)?;
        }
        if config.builtins {
            if asroot.stat(builtins::BIN_DIR).is_err() {
                asroot.mkdir(builtins::BIN_DIR, 0o1755)?;
            }
            builtins::install(&asroot)?;
        }
        if asroot.stat(ACCOUNTS_DIR).is_ok() {
            asroot.add_account(&Account::root())?;
            asroot.add_account(&Account::anonymous())?;
        }

        info!(
            sorted = config.sorted,
            distinct = config.distinct,
            dirs = config.dirs.len(),
            builtins = config.builtins,
            "system ready"
        );
        Ok(sys)
    }

    /// Binds `account` to this system.
    #[must_use]
    pub fn syscall<'a>(&'a self, account: &'a Account) -> Syscall<'a> {
        Syscall::new(self, account)
    }

    /// Sets the receiver of exec audit records, replacing any previous one.
    pub fn set_auditer(&self, auditer: Arc<dyn Auditer>) {
        *self.auditer.write() = Some(auditer);
    }

    /// Stops auditing.
    pub fn clear_auditer(&self) {
        *self.auditer.write() = None;
    }

    pub(crate) fn audit(&self, record: &str) {
        let auditer = self.auditer.read().clone();
        if let Some(auditer) = auditer {
            auditer.audit(record);
        }
    }

    /// Mount paths, in order.
    #[must_use]
    pub fn mounts(&self) -> Vec<String> {
        self.mounts.read().keys().cloned().collect()
    }

    pub(crate) fn mount_tree(&self, tree: FsTree) -> Result<(), FsError> {
        let mount = tree.mount().to_string();
        let mut mounts = self.mounts.write();
        if mounts.contains_key(&mount) {
            return Err(FsError::MountExists { path: mount });
        }
        info!(mount = %mount, "mounted");
        mounts.insert(mount, Arc::new(tree));
        Ok(())
    }

    /// The tree whose mount path is the longest segment-aligned prefix
    /// of `abspath`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] for relative paths
    /// - [`FsError::NotFound`] if no mount covers `abspath`
    pub fn root_for(&self, abspath: &str) -> Result<Arc<FsTree>, FsError> {
        let cleaned = path::clean(abspath);
        if !cleaned.starts_with('/') {
            return Err(FsError::InvalidPath {
                path: abspath.to_string(),
            });
        }
        let mounts = self.mounts.read();
        let found = mounts
            .iter()
            .filter(|(mount, _)| covers(mount, &cleaned))
            .max_by_key(|(mount, _)| mount.len())
            .map(|(_, tree)| Arc::clone(tree));
        match found {
            Some(tree) => Ok(tree),
            None => {
                debug!(path = %cleaned, "no mount");
                Err(FsError::NotFound { path: cleaned })
            }
        }
    }
}

impl std::fmt::Debug for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("System")
            .field("mounts", &self.mounts())
            .field("audited", &self.auditer.read().is_some())
            .finish()
    }
}

/// Returns `true` if `mount` is `cleaned` or one of its directories.
fn covers(mount: &str, cleaned: &str) -> bool {
    if mount == "/" {
        return true;
    }
    match cleaned.strip_prefix(mount) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirConfig;
    use parking_lot::Mutex;

    #[test]
    fn covers_is_segment_aligned() {
        assert!(covers("/", "/anything"));
        assert!(covers("/mnt", "/mnt"));
        assert!(covers("/mnt", "/mnt/usb"));
        assert!(!covers("/mnt", "/mntx"));
        assert!(!covers("/mnt/usb", "/mnt"));
    }

    #[test]
    fn bare_system_has_no_mounts() {
        let sys = System::bare();
        assert!(sys.mounts().is_empty());
        assert!(sys.root_for("/").expect_err("empty").is_not_found());
    }

    #[test]
    fn root_for_prefers_longest_mount() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        sys.syscall(&root).mount("/mnt", Mode::DIR).expect("mount");
        sys.syscall(&root).mount("/mnt/usb", Mode::DIR).expect("mount");

        assert_eq!(sys.root_for("/mnt/usb/a").expect("covered").mount(), "/mnt/usb");
        assert_eq!(sys.root_for("/mnt/usbx").expect("covered").mount(), "/mnt");
        assert_eq!(sys.root_for("/etc/").expect("covered").mount(), "/");
        assert_eq!(sys.mounts(), ["/", "/mnt", "/mnt/usb"]);
    }

    #[test]
    fn root_for_rejects_relative() {
        let sys = System::new().expect("bootstrap");
        let err = sys.root_for("etc").expect_err("relative");
        assert!(matches!(err, FsError::InvalidPath { .. }));
    }

    #[test]
    fn bootstrap_layout() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        for (path, perm) in [("/bin", 0o1755), ("/etc", 0o755), ("/etc/accounts", 0o755), ("/tmp", 0o7777)] {
            let info = asroot.stat(path).expect(path);
            assert!(info.is_dir(), "{path}");
            assert_eq!(info.mode().perm(), perm, "{path}");
        }
        for cmd in ["mkdir", "ls", "chmod", "mkacc"] {
            let info = asroot.stat(&format!("/bin/{cmd}")).expect(cmd);
            assert_eq!(info.mode().perm(), 0o755);
        }
        asroot.stat("/etc/accounts/root.acc").expect("root account");
        asroot.stat("/etc/accounts/anonymous.acc").expect("anonymous account");
    }

    #[test]
    fn bootstrap_without_builtins_or_accounts_dir() {
        let config = SystemConfig {
            builtins: false,
            dirs: vec![DirConfig::new("/tmp", 0o7777)],
            ..SystemConfig::default()
        };
        let sys = System::from_config(&config).expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        assert!(asroot.stat("/bin").expect_err("no bin").is_not_found());
        assert!(asroot.stat("/etc").expect_err("no etc").is_not_found());
        asroot.stat("/tmp").expect("tmp");
    }

    #[test]
    fn bootstrap_fails_on_orphan_dir() {
        let config = SystemConfig {
            dirs: vec![DirConfig::new("/a/b", 0o755)],
            builtins: false,
            ..SystemConfig::default()
        };
        let err = System::from_config(&config).expect_err("missing parent");
        assert!(err.is_not_found());
    }

    #[test]
    fn auditer_receives_exec_records() {
        let sys = System::new().expect("bootstrap");
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        sys.set_auditer(Arc::new(move |r: &str| sink.lock().push(r.to_string())));

        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot.run("/bin/mkdir", ["/tmp/x"]).expect("mkdir");
        assert!(asroot.run("/bin/mkdir", ["/tmp/x"]).is_err());

        assert_eq!(
            *lines.lock(),
            ["1 /bin/mkdir /tmp/x", "1 /bin/mkdir /tmp/x ERR"]
        );

        sys.clear_auditer();
        asroot.run("/bin/mkdir", ["/tmp/y"]).expect("mkdir");
        assert_eq!(lines.lock().len(), 2);
    }
}
