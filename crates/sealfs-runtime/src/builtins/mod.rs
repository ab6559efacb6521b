//! Commands installed under `/bin`.
//!
//! Each command parses its arguments with `clap`. `--help` output goes
//! to the command's output; any other parse failure is returned as
//! [`FsError::Usage`].

mod chmod;
mod ls;
mod mkacc;
mod mkdir;

pub use chmod::Chmod;
pub use ls::Ls;
pub use mkacc::Mkacc;
pub use mkdir::Mkdir;

use crate::{Cmd, FsError, Payload, Syscall};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

/// Directory holding the builtins.
pub const BIN_DIR: &str = "/bin";

/// Permission bits of an installed builtin.
pub const BIN_PERM: u32 = 0o755;

/// Installs every builtin under [`BIN_DIR`].
///
/// # Errors
///
/// Same as [`Syscall::install`].
pub fn install(sys: &Syscall<'_>) -> Result<(), FsError> {
    let builtins = [
        ("mkdir", Payload::exec(Mkdir)),
        ("ls", Payload::exec(Ls)),
        ("chmod", Payload::exec(Chmod)),
        ("mkacc", Payload::exec(Mkacc)),
    ];
    for (name, payload) in builtins {
        sys.install(&format!("{BIN_DIR}/{name}"), payload, BIN_PERM)?;
    }
    debug!(dir = BIN_DIR, "builtins installed");
    Ok(())
}

/// Parses a mode the way `strconv.ParseUint(s, 0, 32)` does: `0x` is
/// hex, `0b` binary, `0o` or a leading `0` octal, anything else decimal.
///
/// # Errors
///
/// Returns a message for empty or malformed input.
pub fn parse_mode(s: &str) -> Result<u32, String> {
    let lower = s.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(format!("invalid mode {s:?}"));
    }
    u32::from_str_radix(digits, radix).map_err(|e| format!("invalid mode {s:?}: {e}"))
}

/// Parses the command's arguments into `T`.
///
/// Returns `Ok(None)` when help or version was printed instead.
fn parse_args<T: Parser>(cmd: &mut Cmd<'_>) -> Result<Option<T>, FsError> {
    let name = cmd.name().to_string();
    let argv = std::iter::once(name.clone()).chain(cmd.args().iter().cloned());
    match T::try_parse_from(argv) {
        Ok(args) => Ok(Some(args)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let abspath = cmd.abspath().to_string();
            write!(cmd.out(), "{e}").map_err(|err| FsError::io(abspath, err))?;
            Ok(None)
        }
        Err(e) => {
            let rendered = e.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            Err(FsError::usage(name, first.trim_start_matches("error: ")))
        }
    }
}
