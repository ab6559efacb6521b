//! Accounts: the acting identity of every syscall.

use crate::{AccessDenied, Operation, Seal};
use parking_lot::Mutex;
use sealfs_types::{Gid, Uid};
use serde::{Deserialize, Serialize};

/// An identity with a uid and a list of group memberships.
///
/// The first group is the primary group; [`Account::new`] makes it equal
/// to the uid. Group membership is interior-mutable so an account shared
/// behind an `Arc` by several syscall handles can gain or lose groups.
///
/// # Example
///
/// ```
/// use sealfs_auth::{Account, Mode, Operation, Seal};
/// use sealfs_types::{Gid, Uid};
///
/// let john = Account::new("john", Uid::new(2));
/// let seal = Seal::new(Uid::ROOT, Gid::new(7), Mode::from_bits_retain(0o0040));
///
/// assert!(john.permitted(Operation::Read, &seal).is_err());
/// john.add_group(Gid::new(7));
/// assert!(john.permitted(Operation::Read, &seal).is_ok());
/// ```
#[derive(Debug)]
pub struct Account {
    name: String,
    uid: Uid,
    groups: Mutex<Vec<Gid>>,
}

/// Serialized form of an [`Account`].
///
/// Stored as the payload of `/etc/accounts/<name>.acc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    pub uid: Uid,
    pub groups: Vec<Gid>,
}

impl Account {
    /// Creates an account whose primary group id equals its uid.
    #[must_use]
    pub fn new(name: impl Into<String>, uid: Uid) -> Self {
        Self {
            name: name.into(),
            uid,
            groups: Mutex::new(vec![Gid::from(uid)]),
        }
    }

    /// The unauthenticated account, uid 0.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new("anonymous", Uid::ANONYMOUS)
    }

    /// The superuser, uid 1.
    #[must_use]
    pub fn root() -> Self {
        Self::new("root", Uid::ROOT)
    }

    /// Replaces the primary group.
    #[must_use]
    pub fn with_gid(self, gid: Gid) -> Self {
        {
            let mut groups = self.groups.lock();
            match groups.first_mut() {
                Some(first) => *first = gid,
                None => groups.push(gid),
            }
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Primary group id.
    #[must_use]
    pub fn gid(&self) -> Gid {
        self.groups
            .lock()
            .first()
            .copied()
            .unwrap_or_else(|| Gid::from(self.uid))
    }

    /// Snapshot of all group memberships, primary first.
    #[must_use]
    pub fn groups(&self) -> Vec<Gid> {
        self.groups.lock().clone()
    }

    /// Adds a group membership. Adding an existing group is a no-op.
    pub fn add_group(&self, gid: Gid) {
        let mut groups = self.groups.lock();
        if !groups.contains(&gid) {
            groups.push(gid);
        }
    }

    /// Removes a group membership if present.
    pub fn del_group(&self, gid: Gid) {
        let mut groups = self.groups.lock();
        if let Some(pos) = groups.iter().position(|g| *g == gid) {
            groups.remove(pos);
        }
    }

    #[must_use]
    pub fn member(&self, gid: Gid) -> bool {
        self.groups.lock().contains(&gid)
    }

    #[must_use]
    pub fn owns(&self, uid: Uid) -> bool {
        self.uid == uid
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.uid.is_root()
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.uid.is_anonymous()
    }

    /// Checks whether this account may perform `op` on something sealed
    /// with `seal`.
    ///
    /// Root is always granted. Otherwise the first satisfied tier wins:
    /// anonymous (uid 0), owner, group member, then any other
    /// authenticated account.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no tier grants the operation.
    pub fn permitted(&self, op: Operation, seal: &Seal) -> Result<(), AccessDenied> {
        if self.is_root() {
            return Ok(());
        }
        let bits = op.tier_bits();
        let mode = seal.mode;
        let granted = (self.uid.is_anonymous() && mode.contains(bits.anonymous))
            || (self.owns(seal.uid) && mode.contains(bits.owner))
            || (self.member(seal.gid) && mode.contains(bits.group))
            || (self.uid.is_authenticated() && mode.contains(bits.other));
        if granted {
            Ok(())
        } else {
            Err(AccessDenied {
                uid: self.uid,
                seal: *seal,
                op,
            })
        }
    }

    /// Serializable snapshot of this account.
    #[must_use]
    pub fn record(&self) -> AccountRecord {
        AccountRecord {
            name: self.name.clone(),
            uid: self.uid,
            groups: self.groups(),
        }
    }

    /// Rebuilds an account from its stored record.
    ///
    /// An empty group list falls back to the uid as primary group.
    #[must_use]
    pub fn from_record(record: AccountRecord) -> Self {
        let groups = if record.groups.is_empty() {
            vec![Gid::from(record.uid)]
        } else {
            record.groups
        };
        Self {
            name: record.name,
            uid: record.uid,
            groups: Mutex::new(groups),
        }
    }
}

impl Clone for Account {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            uid: self.uid,
            groups: Mutex::new(self.groups()),
        }
    }
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self::from_record(record)
    }
}
