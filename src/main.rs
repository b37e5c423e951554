mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tradeflow_engine::{
  ApprovalRole, Catalog, ChannelNotifier, Variant, WorkflowDefinition, WorkflowEngine,
  WorkflowEvent, WorkflowStore,
};

use crate::script::{Replay, Report};

/// Tradeflow - approval workflows for trade operations
#[derive(Parser)]
#[command(name = "tradeflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.tradeflow)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Inspect workflow catalogs
  Catalog {
    #[command(subcommand)]
    command: CatalogCommand,
  },

  /// Replay an action script against a fresh store
  Run {
    /// Path to the script file (JSON list of actions)
    script_file: PathBuf,

    /// Catalog file to use instead of the data directory or built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Also report the pending approvals this role can decide
    #[arg(long)]
    role: Option<ApprovalRole>,
  },
}

#[derive(Subcommand)]
enum CatalogCommand {
  /// List the workflow definitions
  List {
    #[arg(long)]
    catalog: Option<PathBuf>,
  },

  /// Print one workflow definition as JSON
  Show {
    workflow_id: String,

    #[arg(long)]
    catalog: Option<PathBuf>,
  },

  /// Load and validate a catalog file
  Validate { catalog_file: PathBuf },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".tradeflow"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::Catalog { command }) => rt.block_on(run_catalog(command, data_dir)),
    Some(Commands::Run {
      script_file,
      catalog,
      role,
    }) => rt.block_on(run_script(script_file, catalog, role, data_dir)),
    None => {
      println!("tradeflow - use --help to see available commands");
      Ok(())
    }
  }
}

async fn run_catalog(command: CatalogCommand, data_dir: PathBuf) -> Result<()> {
  match command {
    CatalogCommand::List { catalog } => {
      let catalog = load_catalog(catalog, &data_dir).await?;
      for workflow in catalog.iter() {
        println!(
          "{}\t{}\t{} steps\t{}",
          workflow.id(),
          workflow.name(),
          workflow.steps().len(),
          role_chain(workflow)
        );
      }
    }
    CatalogCommand::Show {
      workflow_id,
      catalog,
    } => {
      let catalog = load_catalog(catalog, &data_dir).await?;
      let Some(workflow) = catalog.get(&workflow_id) else {
        bail!("workflow '{}' not found in catalog", workflow_id);
      };
      println!("{}", serde_json::to_string_pretty(workflow)?);
    }
    CatalogCommand::Validate { catalog_file } => {
      let catalog = read_catalog(&catalog_file).await?;
      println!(
        "{}: {} workflows, ok",
        catalog_file.display(),
        catalog.len()
      );
    }
  }

  Ok(())
}

async fn run_script(
  script_file: PathBuf,
  catalog: Option<PathBuf>,
  role: Option<ApprovalRole>,
  data_dir: PathBuf,
) -> Result<()> {
  let catalog = load_catalog(catalog, &data_dir).await?;
  eprintln!("Loaded catalog with {} workflows", catalog.len());

  let content = tokio::fs::read_to_string(&script_file)
    .await
    .with_context(|| format!("failed to read script file: {}", script_file.display()))?;
  let actions = script::parse(&content)
    .with_context(|| format!("failed to parse script file: {}", script_file.display()))?;

  let (notifier, mut events) = ChannelNotifier::channel();
  let mut engine = WorkflowEngine::with_notifier(WorkflowStore::new(catalog), notifier);
  let results = Replay::new(&mut engine).run(actions);

  while let Ok(event) = events.try_recv() {
    print_notification(&event);
  }

  let report = Report::new(engine.store(), results, role);
  println!("{}", serde_json::to_string_pretty(&report)?);

  Ok(())
}

fn print_notification(event: &WorkflowEvent) {
  let notification = event.notification();
  let marker = match notification.variant {
    Variant::Default => "*",
    Variant::Destructive => "!",
  };
  eprintln!(
    "{} {}: {}",
    marker, notification.title, notification.description
  );
}

/// Approver labels in chain order, e.g. `Buyer -> Purchasing Manager`.
fn role_chain(workflow: &WorkflowDefinition) -> String {
  workflow
    .steps()
    .iter()
    .map(|step| step.required_role.label())
    .collect::<Vec<_>>()
    .join(" -> ")
}

/// Resolve the catalog: explicit file, then `<data_dir>/workflows.json`,
/// then the built-in templates.
async fn load_catalog(explicit: Option<PathBuf>, data_dir: &Path) -> Result<Catalog> {
  if let Some(path) = explicit {
    return read_catalog(&path).await;
  }

  let default_path = data_dir.join("workflows.json");
  if tokio::fs::try_exists(&default_path).await.unwrap_or(false) {
    return read_catalog(&default_path).await;
  }

  Catalog::builtin().context("built-in catalog is invalid")
}

async fn read_catalog(path: &Path) -> Result<Catalog> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

  Catalog::from_json(&content)
    .with_context(|| format!("invalid catalog file: {}", path.display()))
}
