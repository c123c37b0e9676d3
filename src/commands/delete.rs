//! Delete command handler: remove one named cookie.

use anyhow::{Result, anyhow, bail};
use cookieport_core::delete_cookie;
use tracing::info;

use super::CommandContext;
use crate::cli::DeleteArgs;

pub async fn run_delete_command(context: &CommandContext, args: &DeleteArgs) -> Result<()> {
    let removed = delete_cookie(&context.store, &args.name, &args.domain, &args.path)
        .await
        .map_err(|error| anyhow!("Failed to delete cookie: {error}"))?;

    if !removed {
        bail!("No cookie named '{}' found for {}", args.name, args.domain);
    }
    println!("Deleted cookie {} from {}", args.name, args.domain);
    info!(store = %context.store.path().display(), "Cookie store updated");

    Ok(())
}
