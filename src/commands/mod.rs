//! CLI command handlers.

mod clear;
mod delete;
mod detect;
mod export;
mod import;
mod list;
mod set;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{Result, anyhow, bail};
use cookieport_core::{CookieFilter, CookieFormat, FileCookieStore};

pub use clear::run_clear_command;
pub use delete::run_delete_command;
pub use detect::run_detect_command;
pub use export::run_export_command;
pub use import::run_import_command;
pub use list::run_list_command;
pub use set::run_set_command;

/// Settings shared by every command after config and flags are merged.
#[derive(Debug)]
pub struct CommandContext {
    pub store: FileCookieStore,
    pub default_format: CookieFormat,
    pub default_domain: Option<String>,
}

impl CommandContext {
    fn format_or_default(&self, format: Option<CookieFormat>) -> CookieFormat {
        format.unwrap_or(self.default_format)
    }
}

fn domain_filter(domain: Option<&str>) -> CookieFilter {
    match domain.map(str::trim).filter(|domain| !domain.is_empty()) {
        Some(domain) => CookieFilter::for_domain(domain),
        None => CookieFilter::all(),
    }
}

/// Reads command input from `path`, or from stdin when absent or `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|error| anyhow!("Cannot read input file '{}': {error}", path.display())),
        _ => {
            if io::stdin().is_terminal() {
                bail!("No input provided. Pass a file path or pipe cookie data via stdin.");
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
