//! Set command handler: add or edit one cookie in the store.

use anyhow::{Result, anyhow};
use cookieport_core::{CookieRecord, upsert_cookie};
use tracing::info;

use super::CommandContext;
use crate::cli::SetArgs;

pub async fn run_set_command(context: &CommandContext, args: &SetArgs) -> Result<()> {
    let mut record = CookieRecord::new(args.name.as_str(), args.value.as_str())
        .with_path(&args.path)
        .with_secure(args.secure)
        .with_http_only(args.http_only)
        .with_same_site(args.same_site)
        .with_expiration(args.expires);
    if let Some(domain) = args.domain.as_deref() {
        record = record.with_domain(domain);
    }

    let request = upsert_cookie(
        &context.store,
        &record,
        context.default_domain.as_deref(),
    )
    .await
    .map_err(|error| anyhow!("Failed to save cookie '{}': {error}", args.name))?;

    println!("Saved cookie {} for {}", args.name, request.url);
    info!(store = %context.store.path().display(), "Cookie store updated");

    Ok(())
}
