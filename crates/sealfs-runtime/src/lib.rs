//! sealfs runtime: mounted trees, permission-checked syscalls and the
//! builtin commands.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  sealfs-types : Uid, Gid, ErrorCode                          │
//! │  sealfs-auth  : Mode, Seal, Operation, Account              │
//! │  sealfs-tree  : Arena, Tree, Walker (no permission checks)  │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  System    : mount table, bootstrap, auditer                │
//! │  Syscall   : one account's checked view of a System         │
//! │  builtins  : mkdir, ls, chmod, mkacc under /bin             │
//! │  config    : SystemConfig, ConfigLoader                     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  sealfs-cli : runs commands against a fresh System          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use sealfs_auth::Account;
//! use sealfs_runtime::System;
//! use sealfs_types::Uid;
//!
//! let sys = System::new()?;
//! let root = Account::root();
//! sys.syscall(&root).run("/bin/mkacc", ["--uid", "2", "--gid", "2", "john"])?;
//!
//! let john = sys.syscall(&root).load_account("john")?;
//! assert_eq!(john.uid(), Uid::new(2));
//!
//! let asjohn = sys.syscall(&john);
//! asjohn.run("/bin/mkdir", ["/tmp/john"])?;
//! assert!(asjohn.stat("/etc/accounts/john.acc").is_ok());
//! # Ok::<(), sealfs_runtime::FsError>(())
//! ```

pub mod audit;
pub mod builtins;
mod cmd;
pub mod config;
mod error;
mod payload;
mod resource;
mod syscall;
mod system;

pub use audit::{Auditer, TracingAuditer};
pub use cmd::Cmd;
pub use error::FsError;
pub use payload::{Executable, Payload};
pub use resource::{ReadHandle, ResInfo, WriteHandle};
pub use syscall::{Syscall, ACCOUNTS_DIR, CREATE_PERM, DEFAULT_ROOT_PERM};
pub use system::System;

pub use sealfs_tree::{Step, Walker};

/// A mounted tree of resources.
pub type FsTree = sealfs_tree::Tree<Payload>;
