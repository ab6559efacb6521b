use super::{parse_args, parse_mode};
use crate::{Cmd, Executable, FsError, Syscall};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chmod", about = "Change permission bits")]
struct ChmodArgs {
    /// Permission bits, e.g. 0755
    #[arg(short = 'm', value_parser = parse_mode)]
    mode: u32,

    path: String,
}

/// `chmod -m MODE PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct Chmod;

impl Executable for Chmod {
    fn exec(&self, sys: &Syscall<'_>, cmd: &mut Cmd<'_>) -> Result<(), FsError> {
        let Some(args) = parse_args::<ChmodArgs>(cmd)? else {
            return Ok(());
        };
        sys.set_mode(&args.path, args.mode)
    }
}

#[cfg(test)]
mod tests {
    use crate::{FsError, System};
    use sealfs_auth::Account;
    use sealfs_types::Uid;

    #[test]
    fn root_changes_mode() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let asroot = sys.syscall(&root);
        asroot.run("/bin/chmod", ["-m", "0700", "/tmp"]).expect("chmod");
        assert_eq!(asroot.stat("/tmp").expect("stat").mode().perm(), 0o700);
    }

    #[test]
    fn mode_is_required() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys.syscall(&root).run("/bin/chmod", ["/tmp"]).expect_err("usage");
        assert!(matches!(err, FsError::Usage { .. }), "{err}");
    }

    #[test]
    fn bad_mode_is_usage_error() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys
            .syscall(&root)
            .run("/bin/chmod", ["-m", "rw", "/tmp"])
            .expect_err("usage");
        assert!(matches!(err, FsError::Usage { .. }), "{err}");
    }

    #[test]
    fn non_owner_is_refused() {
        let sys = System::new().expect("bootstrap");
        let eva = Account::new("eva", Uid::new(3));
        let err = sys
            .syscall(&eva)
            .run("/bin/chmod", ["-m", "0", "/tmp"])
            .expect_err("not owner");
        assert!(matches!(err, FsError::NotOwner { .. }));
    }
}
