//! TaskMaster - CLI entry point

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{info, warn};

use taskmaster::app::{App, BreakdownOutcome};
use taskmaster::breakdown::{BreakdownError, BreakdownService, create_service};
use taskmaster::cli::{Cli, Command, ListCommand};
use taskmaster::config::Config;
use taskmaster::domain::{AppState, IdResolver, ListId, TaskId, ThemeColor};
use taskmaster::persistence::{FileSlot, Persistence};
use taskmaster::render;
use taskmaster::store::Store;

/// Log file location: `<data_local_dir>/taskmaster/logs/taskmaster.log`
fn log_file_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskmaster")
        .join("logs")
        .join("taskmaster.log")
}

/// Send tracing output to the log file, keeping the terminal for command output
///
/// `RUST_LOG` directives apply on top of the base level.
fn setup_logging(verbose: bool) -> Result<PathBuf> {
    let path = log_file_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context(format!("Failed to create log directory {}", dir.display()))?;
    }
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context(format!("Failed to open log file {}", path.display()))?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = setup_logging(cli.verbose).context("Failed to setup logging")?;
    info!(log = %log_path.display(), verbose = cli.verbose, "tm starting");

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    match &config.source {
        Some(path) => info!(config = %path.display(), "Using config file"),
        None => info!("Using built-in config defaults"),
    }

    let data_dir = config.storage.expanded_data_dir();
    let slot = FileSlot::open(&data_dir).context(format!("Failed to open data directory {}", data_dir.display()))?;
    info!(data_dir = %slot.dir().display(), "Opened data directory");

    let persistence = Persistence::with_key(slot, config.storage.key.clone());
    info!(
        key = persistence.key(),
        provider = %config.breakdown.provider,
        model = %config.breakdown.model,
        "Opening store"
    );
    let mut store = Store::open(persistence);

    match cli.command.unwrap_or(Command::Tasks) {
        Command::Lists => print_lines(render::lists_view(store.state())),
        Command::Tasks => print_lines(render::tasks_view(store.state())),
        Command::List { command } => cmd_list(&mut store, command)?,
        Command::Add { title } => {
            let title = non_empty(&title, "Task title")?;
            match store.add_task(title) {
                Some(id) => println!("{} Added task {}", "✓".green(), render::short_id(id.as_str()).cyan()),
                None => println!("{} No list to add to. Create one with `tm list add <name>`.", "!".yellow()),
            }
        }
        Command::Done { id } => {
            let id = resolve_task(store.state(), &id)?;
            store.toggle_task(&id);
            let done = store.state().task(&id).is_some_and(|t| t.completed);
            let status = if done { "done" } else { "open" };
            println!("{} Task {} is {}", "✓".green(), render::short_id(id.as_str()).cyan(), status);
        }
        Command::Rm { id } => {
            let id = resolve_task(store.state(), &id)?;
            store.delete_task(&id);
            println!("{} Deleted task {}", "✓".green(), render::short_id(id.as_str()));
        }
        Command::Breakdown { id } => cmd_breakdown(&config, store, &id).await?,
    }

    Ok(())
}

fn cmd_list(store: &mut Store, command: ListCommand) -> Result<()> {
    match command {
        ListCommand::Add { name, color } => {
            let name = non_empty(&name, "List name")?;
            let color = color.unwrap_or_else(ThemeColor::random);
            let id = store.add_list(name, color);
            println!(
                "{} Created list {} ({})",
                "✓".green(),
                render::short_id(id.as_str()).cyan(),
                color
            );
        }
        ListCommand::Rm { id } => {
            let id = resolve_list(store.state(), &id)?;
            let removed = store.state().tasks_in(&id).count();
            store.delete_list(&id);
            println!(
                "{} Deleted list {} and {} task(s)",
                "✓".green(),
                render::short_id(id.as_str()),
                removed
            );
        }
        ListCommand::Rename { id, name } => {
            let id = resolve_list(store.state(), &id)?;
            let name = non_empty(&name, "List name")?;
            store.rename_list(&id, name);
            println!("{} Renamed list {}", "✓".green(), render::short_id(id.as_str()).cyan());
        }
        ListCommand::Select { id } => {
            let id = resolve_list(store.state(), &id)?;
            store.select_list(&id);
            print_lines(render::tasks_view(store.state()));
        }
    }
    Ok(())
}

async fn cmd_breakdown(config: &Config, store: Store, reference: &str) -> Result<()> {
    let id = resolve_task(store.state(), reference)?;

    let service: Arc<dyn BreakdownService> = match create_service(&config.breakdown) {
        Ok(service) => service,
        Err(e) => {
            warn!(error = %e, "cmd_breakdown: breakdown service unavailable");
            println!("{} AI breakdown unavailable: {}", "!".yellow(), e);
            Arc::new(Unavailable)
        }
    };

    let mut app = App::new(store, service);
    println!("{}", "Asking for subtasks...".dimmed());
    match app.breakdown(&id).await {
        BreakdownOutcome::Added(ids) if ids.is_empty() => println!("{}", "No subtasks suggested".dimmed()),
        BreakdownOutcome::Added(ids) => {
            println!("{} Added {} subtask(s)", "✓".green(), ids.len());
            print_lines(render::tasks_view(app.store().state()));
        }
        BreakdownOutcome::Busy => println!("{}", "A breakdown is already running".dimmed()),
        BreakdownOutcome::TaskNotFound => println!("{} Task not found", "!".yellow()),
    }
    Ok(())
}

/// Stand-in service when none can be configured; yields no suggestions
struct Unavailable;

#[async_trait::async_trait]
impl BreakdownService for Unavailable {
    async fn suggest(&self, _task_title: &str) -> Result<Vec<String>, BreakdownError> {
        Err(BreakdownError::Config("no breakdown service configured".to_string()))
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn non_empty(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(eyre::eyre!("{} cannot be empty", what));
    }
    Ok(trimmed.to_string())
}

fn resolve(resolver: IdResolver<'_>, kind: &str, reference: &str) -> Result<String> {
    match resolver.resolve(reference) {
        Ok(Some(id)) => Ok(id.to_string()),
        Ok(None) => Err(eyre::eyre!("No {} matches '{}'", kind, reference)),
        Err(candidates) => Err(eyre::eyre!(
            "'{}' matches several {}s: {}",
            reference,
            kind,
            candidates.join(", ")
        )),
    }
}

fn resolve_list(state: &AppState, reference: &str) -> Result<ListId> {
    let resolver = IdResolver::new(state.lists.iter().map(|l| l.id.as_str()));
    resolve(resolver, "list", reference).map(ListId::from)
}

fn resolve_task(state: &AppState, reference: &str) -> Result<TaskId> {
    let resolver = IdResolver::new(state.tasks.iter().map(|t| t.id.as_str()));
    resolve(resolver, "task", reference).map(TaskId::from)
}
