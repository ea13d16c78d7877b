//! Command implementations for latch.
//!
//! The dispatcher translates parsed CLI arguments into a controller
//! request: it validates the action string at the boundary, assembles the
//! metadata map from flags, runs the state machine, appends the audit
//! event for mutating actions, and renders the merged result as YAML.

use crate::cli::Cli;
use crate::controller::{self, LockAction, LockEntry, LockRequest, Metadata};
use crate::error::{LatchError, Result};
use crate::events::{self, Event};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use serde_yaml::Value;
use std::path::Path;
use std::str::FromStr;

/// Dispatch a parsed CLI invocation.
pub fn dispatch(cli: Cli) -> Result<()> {
    if cli.list {
        return cmd_list(&cli.dir);
    }
    cmd_act(&cli)
}

/// Run a status/lock/unlock action on a single resource.
fn cmd_act(cli: &Cli) -> Result<()> {
    // Boundary validation: anything but status/lock/unlock fails here,
    // before any directory or file is touched.
    let action = LockAction::from_str(&cli.action)?;

    let resource = cli
        .resource
        .clone()
        .ok_or_else(|| LatchError::UserError("a resource name is required".to_string()))?;

    let mut request = LockRequest::new(cli.dir.clone(), resource)
        .with_action(action)
        .with_metadata(build_metadata(cli, action)?);
    if cli.require_unlocked {
        request = request.require_unlocked_first();
    }
    if cli.require_locked {
        request = request.require_locked_first();
    }

    let result = controller::run(&request)?;

    // Best-effort audit: a failed append warns but never undoes a lock
    // transition that already happened.
    if action.is_mutating() && !cli.no_audit {
        let event = Event::new(action, &request.resource).with_details(json!({
            "lock_file_location": request.lock_path().display().to_string(),
            "require_unlocked_first": request.require_unlocked_first,
            "require_locked_first": request.require_locked_first,
            "metadata_keys": request.metadata.keys().collect::<Vec<_>>(),
        }));
        if let Err(e) = events::append_event(&cli.dir, &event) {
            eprintln!("Warning: failed to append audit event: {}", e);
        }
    }

    print_metadata(&result)
}

/// List all locks in the lock directory.
fn cmd_list(dir: &Path) -> Result<()> {
    let locks = controller::list(dir)?;

    if locks.is_empty() {
        println!("No locks in '{}'.", dir.display());
        return Ok(());
    }

    println!("Locks in '{}' ({}):", dir.display(), locks.len());
    println!();
    for lock in &locks {
        print_lock_entry(lock);
    }

    Ok(())
}

fn print_lock_entry(lock: &LockEntry) {
    println!("  {}:", lock.resource);
    if let Some(msg) = lock.value("msg") {
        println!("    Message:    {}", msg);
    }
    if let Some(contact) = lock.value("contact") {
        println!("    Contact:    {}", contact);
    }
    if let Some(by) = lock.value("locked_by") {
        println!("    Locked by:  {}", by);
    }
    if let Some(at) = lock.value("locked_at") {
        println!("    Locked at:  {}", at);
    }
    if let Some(expire) = lock.value("expire") {
        println!("    Expires:    {}", expire);
    }
    println!("    Path:       {}", lock.path.display());
    println!();
}

/// Assemble the request metadata from `--data` pairs and convenience flags.
///
/// For lock actions, `locked_by` and `locked_at` are filled in from the
/// environment unless the caller supplied them. A fresh map is built per
/// invocation; nothing is shared across calls.
fn build_metadata(cli: &Cli, action: LockAction) -> Result<Metadata> {
    let mut metadata = Metadata::new();

    for pair in &cli.data {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            LatchError::UserError(format!(
                "invalid --data entry '{}': expected KEY=VALUE",
                pair
            ))
        })?;
        if key.is_empty() {
            return Err(LatchError::UserError(format!(
                "invalid --data entry '{}': empty key",
                pair
            )));
        }
        metadata.insert(key.to_string(), parse_scalar(value));
    }

    if let Some(msg) = &cli.message {
        metadata.insert("msg".to_string(), Value::String(msg.clone()));
    }
    if let Some(contact) = &cli.contact {
        metadata.insert("contact".to_string(), Value::String(contact.clone()));
    }
    if let Some(expire) = &cli.expire {
        metadata.insert("expire".to_string(), Value::String(expire.clone()));
    }

    if action == LockAction::Lock {
        metadata
            .entry("locked_by".to_string())
            .or_insert_with(|| Value::String(events::actor_string()));
        metadata.entry("locked_at".to_string()).or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
        });
    }

    Ok(metadata)
}

/// Parse a `--data` value as a YAML scalar.
///
/// Numbers, booleans, and null come out typed; anything the YAML parser
/// rejects stays a plain string.
fn parse_scalar(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Print the merged result metadata as YAML on stdout.
fn print_metadata(metadata: &Metadata) -> Result<()> {
    let yaml = serde_yaml::to_string(metadata)
        .map_err(|e| LatchError::UserError(format!("failed to render result: {}", e)))?;
    print!("{}", yaml);
    Ok(())
}
