//! sealfs CLI - run builtin commands against a fresh in-memory system
//!
//! # Usage
//!
//! ```text
//! sealfs [-d] [-v] [--config PATH] [--as ACCOUNT] [COMMAND...]
//! ```
//!
//! With a trailing command, runs it once. Otherwise reads commands from
//! stdin, one per line, against the same system, so later lines see
//! what earlier lines created. Command output goes to stdout, errors
//! and logs to stderr. The exit status is 1 if any command failed.
//!
//! # Configuration
//!
//! 1. Environment variables (`SEALFS_*`, highest priority)
//! 2. Config file (`--config`, else `~/.sealfs/config.toml`)
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `SEALFS_AUDIT`: Log exec audit records (`true`/`false`)
//! - `SEALFS_SORTED`: Keep the root tree sorted
//! - `SEALFS_DISTINCT`: Replace same-name siblings
//! - `RUST_LOG`: Log filter when neither `-d` nor `-v` is given

mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use runner::{resolve_account, Runner};
use sealfs_runtime::config::ConfigLoader;
use sealfs_runtime::System;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// sealfs - permission-checked in-memory filesystem
#[derive(Parser, Debug)]
#[command(name = "sealfs")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to ~/.sealfs/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Account to act as: root, anonymous, a uid or a stored account name
    #[arg(long = "as", value_name = "ACCOUNT", default_value = "root")]
    account: String,

    /// Command to execute (optional)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn init_tracing(args: &Args) {
    // --debug > --verbose > RUST_LOG env > default "warn"
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args);

    let mut loader = ConfigLoader::new();
    if let Some(ref path) = args.config {
        loader = loader.with_config_file(path);
    }
    let config = loader.load().context("Config error")?;
    let sys = System::from_config(&config).context("Bootstrap failed")?;

    let account = resolve_account(&sys, &args.account)
        .with_context(|| format!("Unknown account '{}'", args.account))?;
    info!(account = account.name(), uid = %account.uid(), "Acting account");
    let runner = Runner::new(sys.syscall(&account));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    if args.command.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            if let Err(e) = runner.run_line(&mut out, &line) {
                eprintln!("error: {e}");
                failed = true;
            }
        }
    } else {
        info!(cmd = %args.command.join(" "), "Command mode");
        if let Err(e) = runner.run(&mut out, &args.command) {
            eprintln!("error: {e}");
            failed = true;
        }
    }
    out.flush().context("Failed to flush stdout")?;

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
