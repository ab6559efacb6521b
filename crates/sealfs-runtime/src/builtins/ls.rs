use super::parse_args;
use crate::{Cmd, Executable, FsError, Syscall};
use clap::Parser;
use sealfs_auth::Sealed;
use sealfs_tree::Step;

#[derive(Parser, Debug)]
#[command(name = "ls", about = "List directory contents")]
struct LsArgs {
    /// List subdirectories recursively, with absolute paths
    #[arg(short = 'R')]
    recursive: bool,

    path: String,
}

/// `ls [-R] PATH`
///
/// Prints `"<seal> <name>"` for the path and its children, or with `-R`
/// `"<seal> <abspath>"` for everything below it the account may see.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ls;

impl Executable for Ls {
    fn exec(&self, sys: &Syscall<'_>, cmd: &mut Cmd<'_>) -> Result<(), FsError> {
        let Some(args) = parse_args::<LsArgs>(cmd)? else {
            return Ok(());
        };

        // collected first so output is not written under the tree lock
        let mut lines = Vec::new();
        sys.walk(&args.path, args.recursive, |info| {
            if args.recursive {
                lines.push(format!("{} {}", info.seal(), info.abspath()));
            } else {
                lines.push(info.to_string());
            }
            Step::CONTINUE
        })?;

        let abspath = cmd.abspath().to_string();
        let out = cmd.out();
        for line in lines {
            writeln!(out, "{line}").map_err(|e| FsError::io(&abspath, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::System;
    use sealfs_auth::Account;

    fn ls(sys: &System, account: &Account, args: &[&str]) -> String {
        let mut out = Vec::new();
        sys.syscall(account)
            .fexec(&mut out, "/bin/ls", args.iter().copied())
            .expect("ls");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn lists_children_with_seal_and_name() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let out = ls(&sys, &root, &["/"]);
        assert_eq!(
            out,
            "d--xrwxr-xr-x 1 1 /\n\
             d--xrwxr-xr-x 1 1 bin\n\
             d---rwxr-xr-x 1 1 etc\n\
             drwxrwxrwxrwx 1 1 tmp\n"
        );
    }

    #[test]
    fn recursive_uses_abspaths() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let out = ls(&sys, &root, &["-R", "/etc"]);
        assert_eq!(
            out,
            "d---rwxr-xr-x 1 1 /etc\n\
             d---rwxr-xr-x 1 1 /etc/accounts\n\
             ----rw-r--r-- 1 1 /etc/accounts/anonymous.acc\n\
             ----rw-r--r-- 1 1 /etc/accounts/root.acc\n"
        );
    }

    #[test]
    fn missing_path_fails() {
        let sys = System::new().expect("bootstrap");
        let root = Account::root();
        let err = sys
            .syscall(&root)
            .run("/bin/ls", ["/nope"])
            .expect_err("missing");
        assert!(err.is_not_found());
    }
}
