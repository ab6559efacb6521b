//! Shared E2E test helpers for `sealfs` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

const ENV_VARS: &[&str] = &["SEALFS_AUDIT", "SEALFS_SORTED", "SEALFS_DISTINCT", "RUST_LOG"];

/// Build a Command for the `sealfs` binary with an empty home directory,
/// so no user config file is picked up.
///
/// Keep the returned guard alive for the duration of the test.
pub fn sealfs_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let home = tempfile::tempdir().expect("create temp home");
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("sealfs");
    cmd.timeout(TIMEOUT_BASIC);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home.path());
    (cmd, home)
}
