//! CLI entry point for the cookieport tool.

use anyhow::{Context, Result, bail};
use clap::Parser;
use cookieport_core::FileCookieStore;
use cookieport_core::config::{self, LoadedConfig};
use tracing::debug;

mod cli;
mod commands;

use cli::{Args, Command};
use commands::CommandContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let loaded = config::load_default_file_config().context("Failed to load configuration")?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level(&args, &loaded)));

    // Logs go to stderr; stdout carries exported payloads.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");
    if let Some(path) = loaded.path() {
        debug!(
            path = %path.display(),
            loaded = loaded.loaded_from_file,
            "Resolved config path"
        );
    }

    if let Command::Detect(detect) = &args.command {
        return commands::run_detect_command(detect);
    }

    let context = build_context(&args, &loaded)?;
    match &args.command {
        Command::Import(import) => commands::run_import_command(&context, import).await,
        Command::Export(export) => commands::run_export_command(&context, export).await,
        Command::Clear(clear) => commands::run_clear_command(&context, clear).await,
        Command::List(list) => commands::run_list_command(&context, list).await,
        Command::Set(set) => commands::run_set_command(&context, set).await,
        Command::Delete(delete) => commands::run_delete_command(&context, delete).await,
        Command::Detect(detect) => commands::run_detect_command(detect),
    }
}

fn default_level(args: &Args, loaded: &LoadedConfig) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => loaded
            .config
            .verbosity
            .map_or("info", config::VerbositySetting::filter_directive),
        1 => "debug",
        _ => "trace",
    }
}

fn build_context(args: &Args, loaded: &LoadedConfig) -> Result<CommandContext> {
    let Some(store_path) = args.store.clone().or_else(|| loaded.store_path()) else {
        bail!("Cannot determine cookie store location; pass --store <PATH>");
    };
    debug!(path = %store_path.display(), "Using cookie store");

    Ok(CommandContext {
        store: FileCookieStore::new(store_path),
        default_format: loaded.config.default_format.unwrap_or_default(),
        default_domain: loaded.config.default_domain.clone(),
    })
}
