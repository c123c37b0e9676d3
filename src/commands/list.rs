//! List command handler: print stored cookies, one per line.

use anyhow::{Result, anyhow};
use cookieport_core::{CookieRecord, CookieStore};
use tracing::debug;

use super::{CommandContext, domain_filter};
use crate::cli::ListArgs;

const REDACTED: &str = "[REDACTED]";

pub async fn run_list_command(context: &CommandContext, args: &ListArgs) -> Result<()> {
    let cookies = context
        .store
        .list_cookies(&domain_filter(args.domain.as_deref()))
        .await
        .map_err(|error| anyhow!("Failed to list cookies: {error}"))?;
    debug!(count = cookies.len(), "Listed cookies");

    if cookies.is_empty() {
        println!("No cookies found");
        return Ok(());
    }
    for cookie in &cookies {
        println!("{}", format_line(cookie, args.show_values));
    }

    Ok(())
}

/// Tab-separated `domain path name expiry value`.
fn format_line(cookie: &CookieRecord, show_value: bool) -> String {
    let expiry = cookie
        .expiration_date
        .map_or_else(|| "session".to_string(), |seconds| seconds.to_string());
    let value = if show_value { cookie.value() } else { REDACTED };
    format!(
        "{}\t{}\t{}\t{expiry}\t{value}",
        cookie.domain, cookie.path, cookie.name
    )
}
