//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::command::{Command, CommandError, Executor};
use crate::report;
use std::io::{self, Write};
use std::path::Path;
use synthgraph_core::{
    Session, SynthError, primitives::MAX_SNAPSHOT_SIZE, session_from_bytes, session_to_bytes,
};

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: usize) -> Result<(), SynthError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SynthError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size as u64 {
        return Err(SynthError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(state_path: &Path, host: &str, port: u16) -> Result<(), CommandError> {
    let session = load_or_create_session(state_path)?;

    println!("synthgraph server starting...");
    println!();
    println!("Configuration:");
    println!("  Host:  {}", host);
    println!("  Port:  {}", port);
    println!("  State: {:?}", state_path);
    println!();
    println!("Endpoints:");
    println!("  GET    /health             - Health check");
    println!("  GET    /status             - Session counts");
    println!("  GET    /graph              - Items and recipes");
    println!("  POST   /nodes              - Add an item");
    println!("  DELETE /nodes/{{label}}      - Remove an item");
    println!("  POST   /nodes/rename       - Rename an item");
    println!("  POST   /edges              - Add a recipe");
    println!("  POST   /edges/remove       - Remove recipes");
    println!("  GET    /inventory          - List predicates");
    println!("  POST   /inventory          - Add a predicate");
    println!("  DELETE /inventory/{{name}}   - Remove a predicate");
    println!("  POST   /synthesize         - Cheapest synthesis path");
    println!("  GET    /export/dot         - Graphviz rendering");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    let session = api::run_server(&addr, session).await?;

    save_session(&session, state_path)?;
    tracing::info!(path = %state_path.display(), "session saved");
    Ok(())
}

// =============================================================================
// INIT & STATUS COMMANDS
// =============================================================================

/// Create an empty state file.
pub fn cmd_init(state_path: &Path, force: bool) -> Result<(), CommandError> {
    if state_path.exists() && !force {
        return Err(SynthError::IoError(format!(
            "State file {:?} already exists (use --force to overwrite)",
            state_path
        ))
        .into());
    }

    save_session(&Session::new(), state_path)?;
    println!("Initialized empty session at {:?}", state_path);
    Ok(())
}

/// Show session counts.
pub fn cmd_status(state_path: &Path, json_mode: bool) -> Result<(), CommandError> {
    let session = load_or_create_session(state_path)?;

    if json_mode {
        let mut output = report::status_json(&session);
        output["state"] = serde_json::Value::from(state_path.to_string_lossy().into_owned());
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("synthgraph Session Status");
    println!("=========================");
    println!("State:       {:?}", state_path);
    println!();
    println!("Items:       {}", session.graph().node_count());
    println!("Recipes:     {}", session.graph().edge_count());
    println!("Conditions:  {}", session.inventory().len());
    println!("Highlighted: {}", session.highlighted().len());

    Ok(())
}

// =============================================================================
// ONE-SHOT & INTERACTIVE COMMANDS
// =============================================================================

/// Run one command against the saved session.
pub fn cmd_one_shot(
    state_path: &Path,
    executor: &Executor,
    command: Command,
) -> Result<(), CommandError> {
    let mut session = load_or_create_session(state_path)?;
    let mutates = command.mutates();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    executor.execute(&mut session, command, &mut out)?;
    out.flush()?;

    if mutates {
        save_session(&session, state_path)?;
    }
    Ok(())
}

/// Interactive command loop on stdin/stdout. The session is saved on exit.
pub fn cmd_repl(state_path: &Path, executor: &Executor) -> Result<(), CommandError> {
    let mut session = load_or_create_session(state_path)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    executor.run_loop(&mut session, &mut stdin.lock(), &mut stdout.lock())?;

    save_session(&session, state_path)?;
    Ok(())
}

// =============================================================================
// SESSION PERSISTENCE
// =============================================================================

/// Load the session snapshot, or start empty when there is none.
pub fn load_or_create_session(state_path: &Path) -> Result<Session, SynthError> {
    if !state_path.exists() {
        tracing::debug!(path = %state_path.display(), "no state file, starting empty");
        return Ok(Session::new());
    }

    validate_file_size(state_path, MAX_SNAPSHOT_SIZE)?;
    let data = std::fs::read(state_path)
        .map_err(|e| SynthError::IoError(format!("Read state: {}", e)))?;
    session_from_bytes(&data)
}

/// Write the session snapshot.
pub fn save_session(session: &Session, state_path: &Path) -> Result<(), SynthError> {
    let data = session_to_bytes(session)?;
    std::fs::write(state_path, &data)
        .map_err(|e| SynthError::IoError(format!("Write state: {}", e)))?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
