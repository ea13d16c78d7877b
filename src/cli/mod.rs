//! CLI argument parsing for latch.
//!
//! Uses clap derive macros for declarative argument definitions. The action
//! argument is intentionally a free-form string: validating it belongs to
//! the controller boundary (`LockAction::from_str`), so an unknown action
//! surfaces as the InvalidAction error kind rather than a clap usage error.
//! Actual command implementations are in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

/// Latch: advisory file-based lock coordination.
///
/// A lock is a marker file at `<dir>/<resource>.lock` containing a
/// human-readable YAML record of who locked the resource, why, and when it
/// expires. Locks are cooperative: they are observed by convention, not
/// enforced by the operating system, and carry no cross-process mutual
/// exclusion guarantee.
#[derive(Parser, Debug)]
#[command(name = "latch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resource name to operate on (e.g. "web-1").
    ///
    /// Derives the lock path as `<dir>/<resource>.lock`.
    #[arg(required_unless_present = "list")]
    pub resource: Option<String>,

    /// Action to perform: status, lock, or unlock.
    #[arg(default_value = "status")]
    pub action: String,

    /// Directory lock files are stored in.
    #[arg(short, long, default_value = ".locks", value_name = "DIR")]
    pub dir: PathBuf,

    /// Metadata entry to merge into the lock record (repeatable).
    ///
    /// Values are parsed as YAML scalars, so `--data attempts=3` stores a
    /// number and `--data drain=true` stores a boolean.
    #[arg(long = "data", value_name = "KEY=VALUE")]
    pub data: Vec<String>,

    /// Reason for the lock (metadata key `msg`).
    #[arg(short, long)]
    pub message: Option<String>,

    /// Person or team responsible for the lock (metadata key `contact`).
    #[arg(long)]
    pub contact: Option<String>,

    /// Advisory expiry timestamp (metadata key `expire`).
    ///
    /// Interpreted by an external auditor; latch never enforces it.
    #[arg(long)]
    pub expire: Option<String>,

    /// Fail if the resource is already locked (checked before locking).
    #[arg(long)]
    pub require_unlocked: bool,

    /// Fail if the resource is not locked (checked before unlocking).
    #[arg(long)]
    pub require_locked: bool,

    /// List all locks in the directory instead of acting on a resource.
    #[arg(long, conflicts_with = "resource")]
    pub list: bool,

    /// Skip the audit log append for mutating actions.
    #[arg(long)]
    pub no_audit: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
