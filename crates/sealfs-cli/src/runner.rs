//! Line-oriented command runner.

use sealfs_auth::Account;
use sealfs_runtime::{builtins::BIN_DIR, FsError, Syscall, System};
use sealfs_types::Uid;
use std::io::Write;
use tracing::debug;

/// Resolves `--as`: `root`, `anonymous`, a numeric uid or the name of
/// an account stored under `/etc/accounts`.
///
/// # Errors
///
/// Fails if a name does not match a stored account.
pub fn resolve_account(sys: &System, who: &str) -> Result<Account, FsError> {
    match who {
        "root" => return Ok(Account::root()),
        "anonymous" => return Ok(Account::anonymous()),
        _ => {}
    }
    if let Ok(raw) = who.parse::<u32>() {
        let uid = Uid::new(raw);
        return Ok(if uid.is_root() {
            Account::root()
        } else if uid.is_anonymous() {
            Account::anonymous()
        } else {
            Account::new(format!("uid{raw}"), uid)
        });
    }
    let root = Account::root();
    sys.syscall(&root).load_account(who)
}

/// Absolute path of a command word; bare names are looked up in `/bin`.
#[must_use]
pub fn command_path(word: &str) -> String {
    if word.starts_with('/') {
        word.to_string()
    } else {
        format!("{BIN_DIR}/{word}")
    }
}

/// Runs commands as one account.
#[derive(Debug)]
pub struct Runner<'a> {
    sys: Syscall<'a>,
}

impl<'a> Runner<'a> {
    #[must_use]
    pub fn new(sys: Syscall<'a>) -> Self {
        Self { sys }
    }

    /// Runs one command given as words, the first naming the command.
    /// An empty slice is a no-op.
    ///
    /// # Errors
    ///
    /// Whatever the command fails with.
    pub fn run(&self, out: &mut dyn Write, words: &[String]) -> Result<(), FsError> {
        let Some((first, args)) = words.split_first() else {
            return Ok(());
        };
        let abspath = command_path(first);
        debug!(uid = %self.sys.account().uid(), cmd = %abspath, "run");
        self.sys.fexec(out, &abspath, args.iter().cloned())
    }

    /// Runs one input line. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_line(&self, out: &mut dyn Write, line: &str) -> Result<(), FsError> {
        let line = line.trim();
        if line.starts_with('#') {
            return Ok(());
        }
        let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        self.run(out, &words)
    }
}
