use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use interpreter_bridge::{HttpInterpreter, InterpreterPort, MockInterpreter};
use pagepilot_cli::{ActRequest, LoggingDriver, Session, Settings, SnapshotDom, SnapshotPort};
use pagepilot_core_types::{AutomationError, FrameIndex};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tree_indexer::{index, AccessibilityNode};

#[derive(Parser)]
#[command(
    name = "pagepilot",
    about = "Translate natural-language instructions into replayable browser actions",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ", ", env!("GIT_HASH"), ")")
)]
struct Cli {
    /// Settings file (JSON); PAGEPILOT_* environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// HTTP interpreter endpoint; the deterministic mock is used when absent.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Verbose tracing (equivalent to RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the validated proposals for an instruction without acting.
    Observe {
        /// Accessibility snapshot JSON file.
        snapshot: PathBuf,
        instruction: String,
    },
    /// Plan and execute one instruction against the snapshot.
    Act {
        snapshot: PathBuf,
        instruction: String,
    },
    /// Extract structured data conforming to a schema file.
    Extract {
        snapshot: PathBuf,
        instruction: String,
        /// Extraction schema JSON file.
        #[arg(long)]
        schema: PathBuf,
    },
}

/// Snapshot capture backed by a file: every capture re-serves the same tree.
struct FileSnapshot {
    root: AccessibilityNode,
}

#[async_trait]
impl SnapshotPort for FileSnapshot {
    async fn capture(&self, _frame: FrameIndex) -> Result<AccessibilityNode, AutomationError> {
        Ok(self.root.clone())
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_tree(path: &PathBuf) -> Result<AccessibilityNode> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing snapshot {}", path.display()))
}

fn build_interpreter(settings: &Settings) -> Result<Arc<dyn InterpreterPort>> {
    match &settings.interpreter.endpoint {
        Some(endpoint) => {
            info!(endpoint, "using HTTP interpreter");
            let http = HttpInterpreter::new(
                endpoint.clone(),
                std::time::Duration::from_millis(settings.interpreter.timeout_ms),
            )
            .context("building HTTP interpreter client")?;
            Ok(Arc::new(http))
        }
        None => {
            info!("using deterministic mock interpreter");
            Ok(Arc::new(MockInterpreter::new()))
        }
    }
}

fn build_session(settings: Settings, root: AccessibilityNode) -> Result<Session> {
    let snapshot = index(&root, 0)?;
    let interpreter = build_interpreter(&settings)?;
    Ok(Session::new(
        interpreter,
        Arc::new(LoggingDriver),
        Arc::new(SnapshotDom::new(snapshot)),
        Arc::new(FileSnapshot { root }),
        settings,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint.clone() {
        settings.interpreter.endpoint = Some(endpoint);
    }

    match cli.command {
        Commands::Observe {
            snapshot,
            instruction,
        } => {
            let session = build_session(settings, load_tree(&snapshot)?)?;
            let proposals = session.observe(&instruction).await?;
            println!("{}", serde_json::to_string_pretty(&proposals)?);
        }
        Commands::Act {
            snapshot,
            instruction,
        } => {
            let session = build_session(settings, load_tree(&snapshot)?)?;
            let outcome = session.act(ActRequest::Instruction(instruction)).await?;
            let summary = json!({
                "ok": outcome.report.ok,
                "state": format!("{:?}", outcome.report.state),
                "method": outcome.proposal.method.name(),
                "target": outcome.proposal.target_node_id.to_string(),
                "arguments": outcome.proposal.arguments,
                "resolvedPath": outcome.report.resolved_path,
                "fromCache": outcome.from_cache,
                "keystrokes": outcome.report.keystrokes,
                "latencyMs": outcome.report.latency_ms as u64,
                "error": outcome.report.error.as_ref().map(|err| err.to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Extract {
            snapshot,
            instruction,
            schema,
        } => {
            let content = std::fs::read_to_string(&schema)
                .with_context(|| format!("reading schema {}", schema.display()))?;
            let schema = serde_json::from_str(&content)
                .with_context(|| format!("parsing schema {}", schema.display()))?;
            let session = build_session(settings, load_tree(&snapshot)?)?;
            let value = session.extract(&instruction, &schema).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
