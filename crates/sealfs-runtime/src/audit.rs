//! Exec auditing.
//!
//! Each exec produces one record: `"<uid> <cmd> <args>"`, with `" ERR"`
//! appended when the command failed. The error itself is not part of
//! the record.

use crate::Cmd;
use sealfs_types::Uid;
use tracing::info;

/// Tracing target of audit records.
pub const AUDIT_TARGET: &str = "sealfs::audit";

/// Receiver of exec audit records.
pub trait Auditer: Send + Sync {
    fn audit(&self, record: &str);
}

impl<F> Auditer for F
where
    F: Fn(&str) + Send + Sync,
{
    fn audit(&self, record: &str) {
        self(record);
    }
}

/// Formats the audit record for one exec.
#[must_use]
pub fn record(uid: Uid, cmd: &Cmd<'_>, failed: bool) -> String {
    if failed {
        format!("{uid} {cmd} ERR")
    } else {
        format!("{uid} {cmd}")
    }
}

/// Auditer writing records as `info` events under [`AUDIT_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditer;

impl Auditer for TracingAuditer {
    fn audit(&self, record: &str) {
        info!(target: AUDIT_TARGET, record, "exec");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn record_format() {
        let cmd = Cmd::new("/bin/mkdir", ["/tmp/x"]);
        assert_eq!(record(Uid::new(2), &cmd, false), "2 /bin/mkdir /tmp/x");
        assert_eq!(record(Uid::ROOT, &cmd, true), "1 /bin/mkdir /tmp/x ERR");
    }

    #[test]
    fn closures_are_auditers() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let auditer: Arc<dyn Auditer> = Arc::new(move |r: &str| sink.lock().push(r.to_string()));
        auditer.audit("1 /bin/ls");
        assert_eq!(*lines.lock(), vec!["1 /bin/ls".to_string()]);
    }
}
