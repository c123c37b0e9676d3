//! Canonical cookie data model.
//!
//! Every codec parses into and stringifies from [`CookieRecord`]; the
//! orchestrator hands these records to a cookie store one at a time.

mod record;

pub use record::{
    CookieRecord, DEFAULT_PATH, SameSite, normalize_expiration, normalize_expiration_f64,
    normalize_path, validate,
};
