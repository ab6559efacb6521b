use super::parse_args;
use crate::{Cmd, Executable, FsError, Syscall};
use clap::Parser;
use sealfs_auth::Account;
use sealfs_types::{Gid, Uid};

#[derive(Parser, Debug)]
#[command(name = "mkacc", about = "Create an account")]
struct MkaccArgs {
    /// Uid of the new account, at least 2
    #[arg(long)]
    uid: u32,

    /// Primary group of the new account, at least 2
    #[arg(long)]
    gid: u32,

    name: String,
}

/// `mkacc --uid UID --gid GID NAME`
///
/// Stores the account under `/etc/accounts`; the caller needs write
/// access there.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mkacc;

impl Executable for Mkacc {
    fn exec(&self, sys: &Syscall<'_>, cmd: &mut Cmd<'_>) -> Result<(), FsError> {
        let Some(args) = parse_args::<MkaccArgs>(cmd)? else {
            return Ok(());
        };
        // 0 and 1 belong to anonymous and root
        if args.uid < 2 {
            return Err(FsError::usage(cmd.name(), format!("invalid uid {}", args.uid)));
        }
        if args.gid < 2 {
            return Err(FsError::usage(cmd.name(), format!("invalid gid {}", args.gid)));
        }
        let account = Account::new(args.name, Uid::new(args.uid)).with_gid(Gid::new(args.gid));
        sys.add_account(&account)
    }
}
