//! Cookieport Core Library
//!
//! Converts browser cookies between JSON, HTTP `Cookie` header and Netscape
//! `cookies.txt` text, optionally sealing the text with a password, and moves
//! the resulting records in and out of a cookie store.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`cookie`] - Canonical cookie record shared by every codec
//! - [`codec`] - Format codecs and the [`CookieFormat`] selector
//! - [`crypto`] - Password-based AES-GCM encryption and ciphertext detection
//! - [`store`] - Cookie store contract plus in-memory and file-backed stores
//! - [`interchange`] - Import and export pipelines over a store
//! - [`config`] - `config.toml` loading for command-line defaults

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod error;
pub mod interchange;
pub mod store;

// Re-export commonly used types
pub use codec::{CookieFormat, header, json, netscape};
pub use cookie::{CookieRecord, SameSite};
pub use crypto::{decrypt, encrypt, is_encrypted};
pub use error::InterchangeError;
pub use interchange::{
    DecodedPayload, ExportPayload, ImportFailure, ImportReport, ImportSummary, clear_cookies,
    cookie_url, decode_payload, delete_cookie, export_from_store, export_payload, import_payload,
    materialize, normalize_for_store, suggested_file_name, upsert_cookie,
};
pub use store::{
    CookieFilter, CookieStore, FileCookieStore, MemoryCookieStore, SetCookieRequest, StoreError,
};
