//! Text codecs converting between cookie export formats and [`CookieRecord`]s.
//!
//! # Formats
//!
//! - [`json`] - array (or single object) of cookie objects, strict per item
//! - [`header`] - `name=value; name2=value2` as in an HTTP `Cookie` header
//! - [`netscape`] - the 7-field TAB-separated `cookies.txt` format
//!
//! JSON rejects the whole batch on the first invalid entry; the header and
//! Netscape codecs skip malformed tokens/lines and only fail when nothing survives.

pub mod header;
pub mod json;
pub mod netscape;

use std::fmt;
use std::str::FromStr;

use crate::cookie::CookieRecord;
use crate::error::InterchangeError;

/// Format selector for import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookieFormat {
    /// JSON array of cookie objects.
    #[default]
    Json,
    /// HTTP `Cookie` header string.
    Header,
    /// Netscape `cookies.txt`.
    Netscape,
}

impl CookieFormat {
    /// All supported formats, in display order.
    pub const ALL: [Self; 3] = [Self::Json, Self::Header, Self::Netscape];

    /// Returns the stable label used on the command line and in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Header => "header",
            Self::Netscape => "netscape",
        }
    }

    /// Returns the file extension used for downloaded exports.
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Header | Self::Netscape => "txt",
        }
    }
}

impl fmt::Display for CookieFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookieFormat {
    type Err = InterchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "header" => Ok(Self::Header),
            "netscape" => Ok(Self::Netscape),
            _ => Err(InterchangeError::validation("Invalid format")),
        }
    }
}

/// Parses `text` with the codec for `format`.
///
/// # Errors
///
/// Returns the codec's [`InterchangeError`]; a successful result is never empty.
pub fn parse(format: CookieFormat, text: &str) -> Result<Vec<CookieRecord>, InterchangeError> {
    match format {
        CookieFormat::Json => json::parse(text),
        CookieFormat::Header => header::parse(text),
        CookieFormat::Netscape => netscape::parse(text),
    }
}

/// Serializes `records` with the codec for `format`.
///
/// # Errors
///
/// Returns [`InterchangeError::Format`] if JSON serialization fails.
pub fn stringify(format: CookieFormat, records: &[CookieRecord]) -> Result<String, InterchangeError> {
    match format {
        CookieFormat::Json => json::stringify(records),
        CookieFormat::Header => Ok(header::stringify(records)),
        CookieFormat::Netscape => Ok(netscape::stringify(records)),
    }
}
