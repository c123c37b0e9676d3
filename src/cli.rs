//! CLI argument definitions using clap derive macros.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args as ClapArgs, Parser, Subcommand};
use cookieport_core::{CookieFormat, SameSite};
use zeroize::Zeroizing;

/// Import, export and encrypt browser cookies.
///
/// Cookieport converts cookies between JSON, HTTP `Cookie` header and
/// Netscape cookies.txt formats, optionally sealed with a password.
#[derive(Parser, Debug)]
#[command(name = "cookieport")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Cookie store file (defaults to the config directory's cookies.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import cookies from a file or stdin into the store
    Import(ImportArgs),
    /// Export cookies from the store
    Export(ExportArgs),
    /// Report whether input looks encrypted
    Detect(DetectArgs),
    /// Remove cookies from the store
    Clear(ClearArgs),
    /// List stored cookies
    List(ListArgs),
    /// Add a cookie, or edit the one with the same name, domain and path
    Set(SetArgs),
    /// Delete a single cookie
    Delete(DeleteArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ImportArgs {
    /// Input file ("-" or omitted reads stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Input format: json, header or netscape
    #[arg(short, long)]
    pub format: Option<CookieFormat>,

    /// Password for encrypted input
    #[arg(short, long, env = "COOKIEPORT_PASSWORD", hide_env_values = true)]
    pub password: Option<Password>,

    /// Domain for cookies that carry none
    #[arg(short, long)]
    pub domain: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ExportArgs {
    /// Output format: json, header or netscape
    #[arg(short, long)]
    pub format: Option<CookieFormat>,

    /// Encrypt the output with this password
    #[arg(short, long, env = "COOKIEPORT_PASSWORD", hide_env_values = true)]
    pub password: Option<Password>,

    /// Only export cookies for this domain and its subdomains
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Write to this file, or into this directory under a generated name
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct DetectArgs {
    /// Input file ("-" or omitted reads stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ClearArgs {
    /// Only remove cookies for this domain and its subdomains
    #[arg(short, long)]
    pub domain: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Only list cookies for this domain and its subdomains
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Print cookie values instead of redacting them
    #[arg(long)]
    pub show_values: bool,
}

#[derive(ClapArgs, Debug)]
pub struct SetArgs {
    /// Cookie name
    pub name: String,

    /// Cookie value
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Cookie domain (a leading dot includes subdomains)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Cookie path
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Only send over HTTPS
    #[arg(long)]
    pub secure: bool,

    /// Hide from scripts
    #[arg(long)]
    pub http_only: bool,

    /// SameSite policy: strict, lax or no_restriction
    #[arg(long, default_value = "no_restriction", value_parser = parse_same_site)]
    pub same_site: SameSite,

    /// Expiry as Unix seconds (omit for a session cookie)
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub expires: Option<i64>,
}

#[derive(ClapArgs, Debug)]
pub struct DeleteArgs {
    /// Cookie name
    pub name: String,

    /// Cookie domain
    #[arg(short, long)]
    pub domain: String,

    /// Cookie path
    #[arg(long, default_value = "/")]
    pub path: String,
}

fn parse_same_site(label: &str) -> Result<SameSite, String> {
    SameSite::from_label(label)
        .ok_or_else(|| format!("'{label}' is not one of: strict, lax, no_restriction"))
}

/// Password argument, wiped on drop and redacted in debug output.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// The password text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for Password {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self(Zeroizing::new(value.to_string())))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}
