//! # synthgraph CLI Module
//!
//! This module implements the CLI interface for synthgraph.
//!
//! Every one-shot command loads the session snapshot named by `--state`,
//! runs, and saves the snapshot back when the command changed something.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `repl` - Interactive command loop (the default)
//! - `init` - Create an empty state file
//! - `status` - Show session counts
//! - `add-node`, `remove-node`, `rename-node` - Item maintenance
//! - `add-edge`, `remove-edge` - Recipe maintenance
//! - `add-condition`, `remove-condition`, `inventory` - Inventory maintenance
//! - `show` - Adjacency list
//! - `synthesize` - Cheapest synthesis path
//! - `visualize` - Graphviz rendering
//! - `load` - Apply a TOML recipe book

mod commands;

use crate::command::{Command, CommandError, Executor};
use crate::graphviz::VisualizeTarget;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use synthgraph_core::EdgeWeight;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// synthgraph - cheapest synthesis paths through condition-gated recipe graphs
///
/// Items are nodes, recipes are weighted edges that may require predicates
/// from the inventory.
#[derive(Parser, Debug)]
#[command(name = "synthgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print the search trace for synthesis
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the session snapshot
    #[arg(
        short = 'S',
        long,
        global = true,
        env = "SYNTHGRAPH_STATE",
        default_value = "synthgraph.state"
    )]
    pub state: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Interactive command loop
    Repl,

    /// Create an empty state file
    Init {
        /// Overwrite an existing state file
        #[arg(short, long)]
        force: bool,
    },

    /// Show session counts
    Status,

    /// Add an item
    AddNode { label: String },

    /// Remove an item and every recipe touching it
    RemoveNode { label: String },

    /// Rename an item
    RenameNode { old: String, new: String },

    /// Add a recipe
    AddEdge {
        from: String,
        to: String,
        weight: u64,

        /// Condition expression, e.g. "anvil&hammer|forge"
        #[arg(short, long, default_value = "")]
        condition: String,
    },

    /// Remove every recipe between two items
    RemoveEdge { from: String, to: String },

    /// Add a predicate to the inventory
    AddCondition { name: String },

    /// Remove a predicate from the inventory
    RemoveCondition { name: String },

    /// List held predicates
    Inventory,

    /// Show the adjacency list
    Show,

    /// Find the cheapest synthesis path
    Synthesize { start: String, goal: String },

    /// Render the graph with Graphviz
    Visualize {
        /// Base name of the output files
        name: String,

        /// Run `dot -Tpng` and keep only the PNG
        #[arg(long)]
        png: bool,

        /// Directory for the PNG
        #[arg(short, long, default_value = "img")]
        out_dir: PathBuf,
    },

    /// Apply a TOML recipe book
    Load { file: PathBuf },
}

impl Commands {
    /// The command-loop equivalent of a one-shot subcommand, if any.
    fn to_command(&self) -> Option<Command> {
        let command = match self {
            Self::AddNode { label } => Command::AddNode {
                label: label.clone(),
            },
            Self::RemoveNode { label } => Command::RemoveNode {
                label: label.clone(),
            },
            Self::RenameNode { old, new } => Command::UpdateNode {
                old: old.clone(),
                new: new.clone(),
            },
            Self::AddEdge {
                from,
                to,
                weight,
                condition,
            } => Command::AddEdge {
                from: from.clone(),
                to: to.clone(),
                weight: EdgeWeight::new(*weight),
                condition: condition.clone(),
            },
            Self::RemoveEdge { from, to } => Command::RemoveEdge {
                from: from.clone(),
                to: to.clone(),
            },
            Self::AddCondition { name } => Command::AddCondition { name: name.clone() },
            Self::RemoveCondition { name } => Command::RemoveCondition { name: name.clone() },
            Self::Inventory => Command::ShowInventory,
            Self::Show => Command::Show,
            Self::Synthesize { start, goal } => Command::Synthesize {
                start: start.clone(),
                goal: goal.clone(),
            },
            Self::Visualize { name, .. } => Command::Visualize { name: name.clone() },
            Self::Load { file } => Command::Load { path: file.clone() },
            Self::Serve { .. } | Self::Repl | Self::Init { .. } | Self::Status => return None,
        };
        Some(command)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CommandError> {
    let mut executor = Executor {
        verbose: cli.verbose,
        json_mode: cli.json_mode,
        visualize: VisualizeTarget::default(),
    };

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(&cli.state, &host, port).await,
        Some(Commands::Init { force }) => cmd_init(&cli.state, force),
        Some(Commands::Status) => cmd_status(&cli.state, cli.json_mode),
        None | Some(Commands::Repl) => cmd_repl(&cli.state, &executor),
        Some(other) => {
            if let Commands::Visualize { png, out_dir, .. } = &other {
                executor.visualize.png_dir = png.then(|| out_dir.clone());
            }
            match other.to_command() {
                Some(command) => cmd_one_shot(&cli.state, &executor, command),
                None => Ok(()),
            }
        }
    }
}
