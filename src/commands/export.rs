//! Export command handler: serialize stored cookies to stdout or a file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use cookieport_core::{export_from_store, suggested_file_name};
use tracing::info;

use super::{CommandContext, domain_filter};
use crate::cli::ExportArgs;

pub async fn run_export_command(context: &CommandContext, args: &ExportArgs) -> Result<()> {
    let format = context.format_or_default(args.format);
    let domain = args.domain.as_deref();

    let payload = export_from_store(
        &context.store,
        &domain_filter(domain),
        format,
        args.password.as_ref().map(|password| password.expose()),
    )
    .await
    .map_err(|error| anyhow!("Export failed: {error}"))?;

    if payload.encrypted {
        info!("Data encrypted successfully");
    }

    let file_name = suggested_file_name(format, domain, unix_millis());
    match args.output.as_deref() {
        Some(output) => {
            let target = output_target(output, &file_name);
            fs::write(&target, &payload.text)
                .with_context(|| format!("Failed to write export to '{}'", target.display()))?;
            info!(
                path = %target.display(),
                format = %format,
                encrypted = payload.encrypted,
                "Export written"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(payload.text.as_bytes())?;
            if !payload.text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            info!(
                suggested_file = %file_name,
                format = %format,
                encrypted = payload.encrypted,
                "Export complete"
            );
        }
    }

    Ok(())
}

fn output_target(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis())
}
