//! Configuration file loading for command-line defaults.
//!
//! The file is a flat `key = value` subset of TOML:
//!
//! ```toml
//! store_path = "/home/me/.local/share/cookies.json"
//! default_format = "netscape"
//! default_domain = "example.com"  # used when an imported cookie has no domain
//! verbosity = "verbose"
//! ```

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::codec::CookieFormat;

/// Directory name under the platform config root.
pub const APP_DIR_NAME: &str = "cookieport";
/// Config file name inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Default cookie store file name inside [`APP_DIR_NAME`].
pub const STORE_FILE_NAME: &str = "cookies.json";

/// Errors raised while reading or parsing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A line is not `key = value`.
    #[error("invalid config syntax on line {line}: expected key = value")]
    Syntax {
        /// 1-based line number.
        line: usize,
    },
    /// A key outside the supported set.
    #[error("unknown configuration key: '{key}' on line {line}")]
    UnknownKey {
        /// The key as written.
        key: String,
        /// 1-based line number.
        line: usize,
    },
    /// A known key with a value it cannot take.
    #[error("invalid `{key}` value on line {line}: {reason}")]
    InvalidValue {
        /// The key being set.
        key: &'static str,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the value.
        reason: String,
    },
}

/// Defaults read from `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Cookie store file used by the CLI.
    pub store_path: Option<PathBuf>,
    /// Format used when `--format` is not given.
    pub default_format: Option<CookieFormat>,
    /// Fallback domain for imported cookies that carry none.
    pub default_domain: Option<String>,
    /// Log verbosity when no flag or `RUST_LOG` is set.
    pub verbosity: Option<VerbositySetting>,
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    /// Informational output (`info`).
    Default,
    /// Debug output (`debug`).
    Verbose,
    /// Errors only (`error`).
    Quiet,
    /// Everything (`trace`).
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Tracing filter directive for this setting.
    #[must_use]
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Config directory, if one could be resolved from the environment.
    pub dir: Option<PathBuf>,
    /// Parsed file config, default when no file exists.
    pub config: FileConfig,
    /// Whether a config file was actually read.
    pub loaded_from_file: bool,
}

impl LoadedConfig {
    /// Resolved config file path, if a config directory is known.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Store path from the config, else `<config dir>/cookies.json`.
    #[must_use]
    pub fn store_path(&self) -> Option<PathBuf> {
        self.config
            .store_path
            .clone()
            .or_else(|| self.dir.as_ref().map(|dir| dir.join(STORE_FILE_NAME)))
    }
}

/// Picks the config directory from the given environment values.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/cookieport`
/// 2. `$HOME/.config/cookieport`
/// 3. `%APPDATA%/cookieport`
///
/// Empty values are ignored.
#[must_use]
pub fn resolve_config_dir(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
    appdata: Option<OsString>,
) -> Option<PathBuf> {
    if let Some(xdg) = non_empty(xdg_config_home) {
        return Some(PathBuf::from(xdg).join(APP_DIR_NAME));
    }
    if let Some(home) = non_empty(home) {
        return Some(PathBuf::from(home).join(".config").join(APP_DIR_NAME));
    }
    non_empty(appdata).map(|appdata| PathBuf::from(appdata).join(APP_DIR_NAME))
}

/// Config directory for the current process environment.
#[must_use]
pub fn resolve_default_config_dir() -> Option<PathBuf> {
    resolve_config_dir(
        env::var_os("XDG_CONFIG_HOME"),
        env::var_os("HOME"),
        env::var_os("APPDATA"),
    )
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|value| !value.is_empty())
}

/// Loads the config file from the default directory if present.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but is unreadable or invalid.
pub fn load_default_file_config() -> Result<LoadedConfig, ConfigError> {
    load_from_dir(resolve_default_config_dir())
}

/// Loads `config.toml` from `dir` if present.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but is unreadable or invalid.
pub fn load_from_dir(dir: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let Some(path) = dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME)) else {
        return Ok(LoadedConfig::default());
    };

    if !path.exists() {
        return Ok(LoadedConfig {
            dir,
            ..LoadedConfig::default()
        });
    }

    let config = load_file_config(&path)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(LoadedConfig {
        dir,
        config,
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&raw)
}

/// Parses config text.
///
/// # Errors
///
/// Returns [`ConfigError`] with the offending line number.
pub fn parse_config_str(raw: &str) -> Result<FileConfig, ConfigError> {
    let mut cfg = FileConfig::default();

    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax { line: line_no });
        };
        let value = raw_value.trim();

        match raw_key.trim() {
            "store_path" => {
                let parsed = string_value("store_path", value, line_no)?;
                if parsed.trim().is_empty() {
                    return Err(invalid("store_path", line_no, "path must not be empty"));
                }
                cfg.store_path = Some(PathBuf::from(parsed));
            }
            "default_format" => {
                let parsed = string_value("default_format", value, line_no)?;
                let format = parsed.parse::<CookieFormat>().map_err(|_| {
                    invalid(
                        "default_format",
                        line_no,
                        format!("'{parsed}' is not one of: json, header, netscape"),
                    )
                })?;
                cfg.default_format = Some(format);
            }
            "default_domain" => {
                let parsed = string_value("default_domain", value, line_no)?;
                let trimmed = parsed.trim();
                if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
                    return Err(invalid(
                        "default_domain",
                        line_no,
                        "expected a host name",
                    ));
                }
                cfg.default_domain = Some(trimmed.to_string());
            }
            "verbosity" => {
                let parsed = string_value("verbosity", value, line_no)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).ok_or_else(|| {
                    invalid(
                        "verbosity",
                        line_no,
                        "expected one of: default, verbose, quiet, debug",
                    )
                })?);
            }
            unknown => {
                return Err(ConfigError::UnknownKey {
                    key: unknown.to_string(),
                    line: line_no,
                });
            }
        }
    }

    Ok(cfg)
}

fn invalid(key: &'static str, line: usize, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        line,
        reason: reason.into(),
    }
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn string_value(key: &'static str, raw_value: &str, line: usize) -> Result<String, ConfigError> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        return Err(invalid(key, line, "expected double-quoted string"));
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_verbosity(value: &str) -> Option<VerbositySetting> {
    match value {
        "default" => Some(VerbositySetting::Default),
        "verbose" => Some(VerbositySetting::Verbose),
        "quiet" => Some(VerbositySetting::Quiet),
        "debug" => Some(VerbositySetting::Debug),
        _ => None,
    }
}
