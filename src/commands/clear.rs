//! Clear command handler: remove cookies from the store.

use anyhow::{Result, anyhow};
use cookieport_core::clear_cookies;
use tracing::info;

use super::{CommandContext, domain_filter};
use crate::cli::ClearArgs;

pub async fn run_clear_command(context: &CommandContext, args: &ClearArgs) -> Result<()> {
    let removed = clear_cookies(&context.store, &domain_filter(args.domain.as_deref()))
        .await
        .map_err(|error| anyhow!("Failed to clear cookies: {error}"))?;

    match args.domain.as_deref() {
        Some(domain) => println!("Cleared {removed} cookies for {domain}"),
        None => println!("Cleared {removed} cookies"),
    }
    info!(store = %context.store.path().display(), removed, "Cookie store cleared");

    Ok(())
}
