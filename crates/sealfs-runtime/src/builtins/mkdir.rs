use super::{parse_args, parse_mode};
use crate::{Cmd, Executable, FsError, Syscall};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "mkdir", about = "Create a directory")]
struct MkdirArgs {
    /// Permission bits, e.g. 0755
    #[arg(short = 'm', value_parser = parse_mode, default_value = "0755")]
    mode: u32,

    path: String,
}

/// `mkdir [-m MODE] PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct Mkdir;

impl Executable for Mkdir {
    fn exec(&self, sys: &Syscall<'_>, cmd: &mut Cmd<'_>) -> Result<(), FsError> {
        let Some(args) = parse_args::<MkdirArgs>(cmd)? else {
            return Ok(());
        };
        sys.mkdir(&args.path, args.mode)?;
        Ok(())
    }
}
