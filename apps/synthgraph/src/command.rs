//! # Command Loop
//!
//! The interactive, line-oriented command language and its executor.
//!
//! ```text
//! help                                 Show the command list
//! addNode <label>                      Add an item
//! removeNode <label>                   Remove an item and its recipes
//! updateNode <old> <new>               Rename an item
//! addEdge <from> <to> <w>,<cond>       Add a recipe (condition may be empty)
//! removeEdge <from> <to>               Remove every recipe from -> to
//! addCondition <cond>                  Add a predicate to the inventory
//! removeCondition <cond>               Remove a predicate from the inventory
//! showInventory                        List held predicates
//! show                                 Show the adjacency list
//! synthesize <start> <goal>            Find the cheapest synthesis path
//! visualize <name>                     Render the graph with Graphviz
//! load <file>                          Apply a TOML recipe book
//! exit                                 Leave the loop
//! ```
//!
//! Core errors pass through unchanged; the loop prints them and carries on.

use crate::graphviz::{self, VisualizeTarget};
use crate::report;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use synthgraph_core::{Condition, EdgeWeight, RecipeBook, Session, SynthError};
use thiserror::Error;

/// Maximum accepted recipe book size (16 MB).
const MAX_BOOK_FILE_SIZE: u64 = 16 * 1024 * 1024;

pub const HELP: &str = "\
Commands:
  help                                 - Show this help message
  addNode <label>                      - Add a node
  removeNode <label>                   - Remove a node
  updateNode <old> <new>               - Rename a node
  addEdge <from> <to> <w>,<cond>       - Add edge with weight & condition
  removeEdge <from> <to>               - Remove all edges from->to
  addCondition <cond>                  - Add condition to inventory
  removeCondition <cond>               - Remove condition from inventory
  showInventory                        - List all current conditions
  show                                 - Show graph (sorted)
  synthesize <start> <goal>            - Find best synthesis path
  visualize <name>                     - Export the graph with Graphviz
  load <file>                          - Load a TOML recipe book
  exit                                 - Exit the program
";

// =============================================================================
// ERRORS
// =============================================================================

/// Why a command line could not be carried out.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("Invalid weight '{0}': expected a non-negative integer")]
    InvalidWeight(String),

    #[error(transparent)]
    Core(#[from] SynthError),

    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

// =============================================================================
// COMMANDS
// =============================================================================

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    AddNode { label: String },
    RemoveNode { label: String },
    UpdateNode { old: String, new: String },
    AddEdge {
        from: String,
        to: String,
        weight: EdgeWeight,
        condition: String,
    },
    RemoveEdge { from: String, to: String },
    AddCondition { name: String },
    RemoveCondition { name: String },
    ShowInventory,
    Show,
    Synthesize { start: String, goal: String },
    Visualize { name: String },
    Load { path: PathBuf },
    Exit,
}

/// Parse the `<w>,<cond>` argument of `addEdge`.
pub fn parse_weight_condition(arg: &str) -> Result<(EdgeWeight, String), CommandError> {
    let (weight, condition) = arg
        .split_once(',')
        .ok_or(CommandError::Usage("addEdge <from> <to> <weight>,<condition>"))?;
    let weight = weight
        .trim()
        .parse::<u64>()
        .map_err(|_| CommandError::InvalidWeight(weight.trim().to_string()))?;
    Ok((EdgeWeight::new(weight), condition.trim().to_string()))
}

impl Command {
    /// Parse a command line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();
        let owned = |index: usize| args.get(index).map(|s| (*s).to_string());

        let command = match verb {
            "help" => Self::Help,
            "exit" | "quit" => Self::Exit,
            "show" => Self::Show,
            "showInventory" => Self::ShowInventory,
            "addNode" => Self::AddNode {
                label: owned(0).ok_or(CommandError::Usage("addNode <label>"))?,
            },
            "removeNode" => Self::RemoveNode {
                label: owned(0).ok_or(CommandError::Usage("removeNode <label>"))?,
            },
            "updateNode" => match (owned(0), owned(1)) {
                (Some(old), Some(new)) => Self::UpdateNode { old, new },
                _ => return Err(CommandError::Usage("updateNode <old> <new>")),
            },
            "addEdge" => {
                const USAGE: &str = "addEdge <from> <to> <weight>,<condition>";
                let (Some(from), Some(to)) = (owned(0), owned(1)) else {
                    return Err(CommandError::Usage(USAGE));
                };
                // Conditions may be written with spaces around the operators.
                let rest = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
                if rest.is_empty() {
                    return Err(CommandError::Usage(USAGE));
                }
                let (weight, condition) = parse_weight_condition(&rest)?;
                Self::AddEdge {
                    from,
                    to,
                    weight,
                    condition,
                }
            }
            "removeEdge" => match (owned(0), owned(1)) {
                (Some(from), Some(to)) => Self::RemoveEdge { from, to },
                _ => return Err(CommandError::Usage("removeEdge <from> <to>")),
            },
            "addCondition" => Self::AddCondition {
                name: owned(0).ok_or(CommandError::Usage("addCondition <cond>"))?,
            },
            "removeCondition" => Self::RemoveCondition {
                name: owned(0).ok_or(CommandError::Usage("removeCondition <cond>"))?,
            },
            "synthesize" => match (owned(0), owned(1)) {
                (Some(start), Some(goal)) => Self::Synthesize { start, goal },
                _ => return Err(CommandError::Usage("synthesize <start> <goal>")),
            },
            "visualize" => Self::Visualize {
                name: owned(0).ok_or(CommandError::Usage("visualize <name>"))?,
            },
            "load" => Self::Load {
                path: owned(0)
                    .map(PathBuf::from)
                    .ok_or(CommandError::Usage("load <file>"))?,
            },
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// True for commands that change the session.
    #[must_use]
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Self::Help | Self::Exit | Self::Show | Self::ShowInventory | Self::Visualize { .. }
        )
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Executes commands against a session, writing human or JSON output.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    /// Print the search trace before synthesis results.
    pub verbose: bool,
    /// Emit JSON instead of text for listing and synthesis commands.
    pub json_mode: bool,
    pub visualize: VisualizeTarget,
}

impl Executor {
    pub fn execute(
        &self,
        session: &mut Session,
        command: Command,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        match command {
            Command::Help => write!(out, "{HELP}")?,
            Command::Exit => return Ok(Flow::Exit),

            Command::AddNode { label } => {
                let id = session.add_node(&label)?;
                tracing::info!(node = id.0, %label, "node added");
                writeln!(out, "Node '{label}' added.")?;
            }
            Command::RemoveNode { label } => {
                let removed = session.remove_node(&label)?;
                tracing::info!(%label, edges = removed.len(), "node removed");
                writeln!(out, "Node '{label}' and its edges removed.")?;
            }
            Command::UpdateNode { old, new } => {
                session.rename_node(&old, &new)?;
                tracing::info!(%old, %new, "node renamed");
                writeln!(out, "Node '{old}' renamed to '{new}'.")?;
            }

            Command::AddEdge {
                from,
                to,
                weight,
                condition,
            } => {
                if !Condition::parse(&condition).is_well_formed() {
                    tracing::warn!(%condition, "condition has empty atoms; those clauses never hold");
                }
                let id = session.add_edge(&from, &to, weight, &condition)?;
                tracing::info!(edge = id.0, %from, %to, weight = weight.value(), "edge added");
                if condition.is_empty() {
                    writeln!(out, "Edge added: {from} -> {to} (w={})", weight.value())?;
                } else {
                    writeln!(
                        out,
                        "Edge added: {from} -> {to} (w={}, condition:{condition})",
                        weight.value()
                    )?;
                }
            }
            Command::RemoveEdge { from, to } => {
                let removed = session.remove_edge(&from, &to)?;
                tracing::info!(%from, %to, count = removed.len(), "edges removed");
                writeln!(out, "Edge(s) removed: {from} -> {to} ({})", removed.len())?;
            }

            Command::AddCondition { name } => {
                session.add_condition(&name)?;
                tracing::info!(%name, "condition added");
                writeln!(out, "Condition '{name}' added to inventory.")?;
            }
            Command::RemoveCondition { name } => {
                session.remove_condition(&name)?;
                tracing::info!(%name, "condition removed");
                writeln!(out, "Condition '{name}' removed from inventory.")?;
            }

            Command::ShowInventory => {
                if self.json_mode {
                    writeln!(out, "{}", pretty(&report::inventory_json(session.inventory())))?;
                } else {
                    write!(out, "{}", report::inventory(session.inventory()))?;
                }
            }
            Command::Show => {
                if self.json_mode {
                    writeln!(out, "{}", pretty(&report::graph_json(session)))?;
                } else {
                    write!(out, "{}", report::adjacency(session.graph()))?;
                }
            }

            Command::Synthesize { start, goal } => self.synthesize(session, &start, &goal, out)?,

            Command::Visualize { name } => {
                let path = graphviz::visualize(session, &self.visualize, &name)?;
                tracing::info!(path = %path.display(), "graph rendered");
                writeln!(out, "Generated {}", path.display())?;
            }

            Command::Load { path } => {
                let text = read_book(&path)?;
                let summary = RecipeBook::from_toml(&text)?.apply(session)?;
                tracing::info!(
                    path = %path.display(),
                    items = summary.items,
                    recipes = summary.recipes,
                    predicates = summary.predicates,
                    "recipe book loaded"
                );
                writeln!(
                    out,
                    "Loaded {}: {} items, {} recipes, {} conditions.",
                    path.display(),
                    summary.items,
                    summary.recipes,
                    summary.predicates
                )?;
            }
        }
        Ok(Flow::Continue)
    }

    fn synthesize(
        &self,
        session: &mut Session,
        start: &str,
        goal: &str,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let synthesis = session.synthesize(start, goal)?.clone();
        let graph = session.graph();

        for event in synthesis.trace() {
            tracing::debug!(?event, "search");
        }
        tracing::info!(%start, %goal, cost = ?synthesis.cost(), "synthesis finished");

        if self.json_mode {
            writeln!(out, "{}", pretty(&report::synthesis_json(graph, &synthesis)))?;
            return Ok(());
        }

        if self.verbose {
            writeln!(out, "Beginning synthesis from {start} to {goal} with inventory:")?;
            for predicate in session.inventory().iter() {
                writeln!(out, "  {predicate}")?;
            }
            write!(out, "{}", report::trace(graph, &synthesis))?;
        }
        write!(out, "{}", report::synthesis(graph, &synthesis))?;
        Ok(())
    }

    /// Parse and execute one line. Errors are reported on `out`.
    pub fn run_line(
        &self,
        session: &mut Session,
        line: &str,
        out: &mut dyn Write,
    ) -> io::Result<Flow> {
        let result = Command::parse(line)
            .and_then(|command| match command {
                Some(command) => self.execute(session, command, out),
                None => Ok(Flow::Continue),
            });

        match result {
            Ok(flow) => Ok(flow),
            Err(CommandError::Output(e)) => Err(e),
            Err(e) => {
                tracing::warn!(line = line.trim(), error = %e, "command rejected");
                writeln!(out, "Error: {e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Read commands until `exit` or end of input.
    pub fn run_loop(
        &self,
        session: &mut Session,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if session.graph().is_empty() {
            writeln!(out, "Started with an empty graph. Use 'load <file>' to load a recipe book.")?;
        } else {
            writeln!(
                out,
                "Resumed with {} items and {} recipes.",
                session.graph().node_count(),
                session.graph().edge_count()
            )?;
        }
        writeln!(out, "Type 'help' for instructions.")?;

        let mut line = String::new();
        loop {
            write!(out, "\n> ")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if self.run_line(session, &line, out)? == Flow::Exit {
                break;
            }
        }

        writeln!(out, "Goodbye!")?;
        Ok(())
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn read_book(path: &std::path::Path) -> Result<String, SynthError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SynthError::IoError(format!("Cannot read {}: {}", path.display(), e)))?;
    if metadata.len() > MAX_BOOK_FILE_SIZE {
        return Err(SynthError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_BOOK_FILE_SIZE
        )));
    }
    std::fs::read_to_string(path)
        .map_err(|e| SynthError::IoError(format!("Cannot read {}: {}", path.display(), e)))
}

// =============================================================================
// TESTS
// =============================================================================
