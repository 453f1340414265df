//! Command-line entry point wiring configuration, search and the editor together.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::resolve::{CompanionResolver, Resolution};
use crate::app::search::{WalkOptions, WorkspaceSearch};
use crate::app::toggle::ToggleController;
use crate::domain::model::{DocumentLocation, EditorContext, ViewColumn};
use crate::infra::config::Config;
use crate::infra::git;
use crate::ui::commands::{CommandRegistry, MessageSink, StderrMessages, TOGGLE_COMMAND};
use crate::ui::render;
use crate::ui::terminal::TerminalEditor;

#[derive(Debug, Parser)]
#[command(
    name = "togglehs",
    author,
    version,
    about = "Switch between corresponding header and source files",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the companion of FILE in the editor
    Toggle {
        #[command(flatten)]
        target: Target,
        /// View column of the active editor
        #[arg(long, default_value_t = 1)]
        column: u32,
    },
    /// List every companion candidate of FILE in rank order
    Candidates {
        #[command(flatten)]
        target: Target,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Report the extension slot of FILE
    Classify { file: PathBuf },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Debug, Args)]
pub struct Target {
    /// Path or URI of the active document
    pub file: String,
    /// Project root to search; defaults to the enclosing git work tree, then the current directory
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Toggle { target, column } => toggle(target, column).await,
        Commands::Candidates { target, json } => candidates(target, json).await,
        Commands::Classify { file } => classify(&file),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "togglehs", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn toggle(target: Target, column: u32) -> Result<ExitCode> {
    let session = Session::prepare(&target)?;
    let editor = TerminalEditor::new(session.config.editor.command.as_deref());
    let registry = CommandRegistry::register(
        ToggleController::new(session.resolver, editor),
        StderrMessages,
    );

    let context = EditorContext {
        document: session.location,
        column: ViewColumn(column),
    };
    match registry.execute(TOGGLE_COMMAND, &context).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

async fn candidates(target: Target, json: bool) -> Result<ExitCode> {
    let session = Session::prepare(&target)?;
    let messages = StderrMessages;

    let outcome = session
        .resolver
        .resolve(&session.location)
        .await
        .and_then(Resolution::into_companion);
    let companion = match outcome {
        Ok(companion) => companion,
        Err(err) => {
            messages.show_error(&err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    let rows = render::rows(&companion.ranking, session.resolver.root());
    if json {
        println!("{}", render::render_json(&rows)?);
    } else {
        print!("{}", render::render_table(&rows));
    }
    Ok(ExitCode::SUCCESS)
}

fn classify(file: &Path) -> Result<ExitCode> {
    let config = Config::load(&default_root(&absolute(file)?)?)?;
    let extensions = config.extension_set()?;
    match extensions.classify(file) {
        Some(slot) => {
            let canonical = extensions.get(slot).unwrap_or_default();
            println!("{canonical} (slot {slot})");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("unsupported");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Everything one invocation needs, built once from the command line and configuration.
struct Session {
    config: Config,
    location: DocumentLocation,
    resolver: CompanionResolver<WorkspaceSearch>,
}

impl Session {
    fn prepare(target: &Target) -> Result<Self> {
        let location = match DocumentLocation::parse(&target.file) {
            DocumentLocation::File(path) => DocumentLocation::File(normalize(&path)?),
            remote => remote,
        };
        let anchor = match &location {
            DocumentLocation::File(path) => path.clone(),
            DocumentLocation::Remote { .. } => {
                std::env::current_dir().context("unable to determine working directory")?
            }
        };

        let root = match &target.root {
            Some(root) => normalize(root)?,
            None => default_root(&anchor)?,
        };
        tracing::debug!(root = %root.display(), "project root");

        let config = Config::load(&root)?;
        let extensions = Arc::new(config.extension_set()?);

        let search = WorkspaceSearch::new(WalkOptions::from_config(&config));
        let resolver = CompanionResolver::new(extensions, search, root);
        Ok(Self {
            config,
            location,
            resolver,
        })
    }
}

fn default_root(anchor: &Path) -> Result<PathBuf> {
    match git::project_root(anchor) {
        Some(root) => Ok(root),
        None => normalize(&std::env::current_dir().context("unable to determine working directory")?),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("invalid path {}", path.display()))
}

/// Canonical form when the path exists, so walked paths and the reference share a prefix.
fn normalize(path: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(canonical) => Ok(canonical),
        Err(_) => absolute(path),
    }
}
