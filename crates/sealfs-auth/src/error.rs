//! Access denied error.
//!
//! [`AccessDenied`] is what [`Account::permitted`](crate::Account::permitted)
//! returns when no tier grants the operation. It carries everything an
//! audit line needs: who asked, for what, against which seal.

use crate::{Operation, Seal};
use sealfs_types::{ErrorCode, Uid};
use thiserror::Error;

/// No tier of the seal grants the operation to the account.
///
/// # Example
///
/// ```
/// use sealfs_auth::{AccessDenied, Mode, Operation, Seal};
/// use sealfs_types::{Gid, Uid};
///
/// let err = AccessDenied {
///     uid: Uid::ANONYMOUS,
///     seal: Seal::new(Uid::ROOT, Gid::ROOT, Mode::DIR | Mode::from_bits_retain(0o0755)),
///     op: Operation::Execute,
/// };
/// assert_eq!(err.to_string(), "d---rwxr-xr-x 1 1 exec denied");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{seal} {op} denied")]
pub struct AccessDenied {
    /// The acting account.
    pub uid: Uid,
    /// The seal that denied access.
    pub seal: Seal,
    /// The denied operation.
    pub op: Operation,
}

impl ErrorCode for AccessDenied {
    fn code(&self) -> &'static str {
        "AUTH_PERMISSION_DENIED"
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
