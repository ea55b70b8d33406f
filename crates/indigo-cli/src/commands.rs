//! Command implementations.
//!
//! Each command opens the store described by the settings, runs once and
//! writes its result to the given output.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use indigo::{
    Indigo, IndigoAdmin, IndigoBuilder, LoggingProgressCallback, RebuildConfig, RocksStore,
    Settings, Store,
};
use indigo_index::{sanitize, IndexBuilder};

use crate::cli::{Cli, Commands};
use crate::document::Document;

/// Load settings and apply CLI overrides on top.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(path) = &cli.db_path {
        settings.db_path = path.clone();
    }
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    Ok(settings)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Build a record store over `store` with the configured indices.
pub fn build_indigo(settings: &Settings, store: Arc<dyn Store>) -> Result<Indigo<Document>> {
    let mut builder = IndigoBuilder::new()
        .namespace(settings.namespace.clone())
        .store(store);

    for index in &settings.indices {
        let field = index.field.clone();
        builder = builder.index(
            IndexBuilder::from_settings(index)
                .target(move |doc: &Document| doc.field_text(&field)),
        );
    }

    builder.build().context("Invalid index configuration")
}

/// Open the RocksDB store at the configured path.
pub fn open_indigo(settings: &Settings) -> Result<Indigo<Document>> {
    let db_path = settings.expanded_db_path();
    std::fs::create_dir_all(&db_path)
        .with_context(|| format!("Failed to create database directory {:?}", db_path))?;

    let store = open_store(&db_path, settings)?;
    build_indigo(settings, store)
}

fn open_store(path: &Path, settings: &Settings) -> Result<Arc<dyn Store>> {
    let store = RocksStore::open(path, settings.transaction.clone())
        .with_context(|| format!("Failed to open database at {:?}", path))?;
    Ok(Arc::new(store))
}

/// Parse, configure and run one command.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    init_logging(&settings.log_level)?;
    debug!(db_path = %settings.db_path, namespace = %settings.namespace, "Loaded configuration");

    let indigo = open_indigo(&settings)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    handle_command(&indigo, &settings, cli.command, &mut out)
}

/// Run a command against an open store.
pub fn handle_command(
    indigo: &Indigo<Document>,
    settings: &Settings,
    command: Commands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Put { json } => {
            let mut doc: Document =
                serde_json::from_str(&json).context("Record must be a JSON object")?;
            let id = indigo.put_one(&mut doc)?;
            info!(id, "Stored record");
            writeln!(out, "{}", id)?;
        }
        Commands::Get { id } => match indigo.get(id)? {
            Some(doc) => writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?,
            None => bail!("Record {} not found", id),
        },
        Commands::Delete { id } => {
            indigo.delete(id)?;
            info!(id, "Deleted record");
        }
        Commands::List => {
            for id in indigo.list()? {
                writeln!(out, "{}", id)?;
            }
        }
        Commands::Search { index, term } => {
            let mut ids: Vec<u64> = indigo.search(&index, &sanitize(&term))?.into_iter().collect();
            ids.sort_unstable();
            for id in ids {
                writeln!(out, "{}", id)?;
            }
        }
        Commands::Reindex { batch_size, clear } => {
            let config = RebuildConfig::default()
                .with_batch_size(batch_size.unwrap_or(settings.reindex_batch_size))
                .with_clear_first(clear);
            let progress =
                IndigoAdmin::new(indigo).regen_indices(&config, &LoggingProgressCallback::new(10))?;
            writeln!(
                out,
                "Reindexed {} of {} records in {} batches ({} skipped, {} index documents cleared)",
                progress.indexed, progress.total, progress.batches, progress.skipped, progress.cleared
            )?;
        }
    }
    Ok(())
}
