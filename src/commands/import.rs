//! Import command handler: decode input and write it to the store.

use anyhow::{Result, anyhow};
use cookieport_core::{InterchangeError, import_payload};
use tracing::info;

use super::{CommandContext, read_input};
use crate::cli::ImportArgs;

pub async fn run_import_command(context: &CommandContext, args: &ImportArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let format = context.format_or_default(args.format);
    let fallback_domain = args
        .domain
        .as_deref()
        .or(context.default_domain.as_deref());

    let summary = import_payload(
        &context.store,
        &raw,
        format,
        args.password.as_ref().map(|password| password.expose()),
        fallback_domain,
    )
    .await
    .map_err(|error| match error {
        required @ InterchangeError::PasswordRequired => {
            anyhow!("{required} (use --password or set COOKIEPORT_PASSWORD)")
        }
        other => anyhow!("Import failed: {other}"),
    })?;

    if summary.decrypted {
        info!("Data decrypted successfully");
    }

    let report = &summary.report;
    if report.error_count > 0 {
        println!(
            "Imported {} cookies ({} failed)",
            report.success_count, report.error_count
        );
    } else {
        println!("Imported {} cookies", report.success_count);
    }
    info!(store = %context.store.path().display(), "Cookie store updated");

    Ok(())
}
