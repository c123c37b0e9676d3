//! Password-based encryption for exported cookie payloads.
//!
//! Blob layout, base64-encoded as a whole:
//!
//! ```text
//! salt (16 bytes) || nonce (12 bytes) || AES-256-GCM ciphertext || tag (16 bytes)
//! ```
//!
//! The key is derived with PBKDF2-HMAC-SHA256 over the salt, so only the
//! password is needed to decrypt.

use std::sync::LazyLock;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use regex::Regex;
use sha2::Sha256;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::error::InterchangeError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;
/// PBKDF2 rounds. Existing exports were produced with this count; changing it
/// makes them undecryptable.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Inputs at or below this UTF-16 length are never treated as ciphertext.
const MIN_ENCRYPTED_LEN: usize = 50;

#[allow(clippy::expect_used)]
static BASE64_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]+=*$").expect("base64 regex is valid")); // Static pattern, safe to panic

/// Encrypts `plaintext` under a key derived from `password`.
///
/// A fresh random salt and nonce are generated for every call, so encrypting
/// the same input twice yields different blobs.
///
/// # Errors
///
/// Returns [`InterchangeError::Validation`] if either argument is empty, or
/// [`InterchangeError::Encryption`] if the cipher rejects the input.
#[instrument(level = "debug", skip_all)]
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, InterchangeError> {
    if plaintext.is_empty() || password.is_empty() {
        return Err(InterchangeError::validation(
            "password and data are required",
        ));
    }

    let mut salt = [0_u8; SALT_LEN];
    let mut nonce = [0_u8; NONCE_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt);
    let cipher =
        Aes256Gcm::new_from_slice(&key[..]).map_err(|_| InterchangeError::Encryption)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|_| InterchangeError::Encryption)?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);

    debug!(bytes = blob.len(), "encrypted payload");
    Ok(STANDARD.encode(blob))
}

/// Decrypts a blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`InterchangeError::Validation`] if either argument is empty,
/// [`InterchangeError::Format`] if the decoded blob cannot hold a salt and
/// nonce, and [`InterchangeError::Decryption`] for every other failure
/// (bad base64, wrong password, tampering, invalid UTF-8).
#[instrument(level = "debug", skip_all)]
pub fn decrypt(encoded_blob: &str, password: &str) -> Result<String, InterchangeError> {
    if encoded_blob.trim().is_empty() || password.is_empty() {
        return Err(InterchangeError::validation(
            "password and encrypted data are required",
        ));
    }

    let blob = STANDARD
        .decode(encoded_blob.trim())
        .map_err(|_| InterchangeError::Decryption)?;

    if blob.len() < SALT_LEN + NONCE_LEN {
        return Err(InterchangeError::format(
            "encrypted",
            format!(
                "payload is {} bytes, shorter than salt and nonce ({} bytes)",
                blob.len(),
                SALT_LEN + NONCE_LEN
            ),
        ));
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(password, salt);
    let cipher =
        Aes256Gcm::new_from_slice(&key[..]).map_err(|_| InterchangeError::Decryption)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| InterchangeError::Decryption)?;

    debug!(bytes = plaintext.len(), "decrypted payload");
    String::from_utf8(plaintext).map_err(|_| InterchangeError::Decryption)
}

/// Heuristic ciphertext detector used to decide whether to ask for a password.
///
/// Valid JSON is always plaintext. Otherwise the trimmed text must be shaped
/// like base64 and the input must be longer than 50 UTF-16 units. Short or
/// JSON-shaped ciphertext is misclassified; the boundary is kept as is because
/// password prompting depends on it.
#[must_use]
pub fn is_encrypted(data: &str) -> bool {
    if serde_json::from_str::<serde::de::IgnoredAny>(data).is_ok() {
        return false;
    }
    BASE64_SHAPE.is_match(data.trim()) && data.encode_utf16().count() > MIN_ENCRYPTED_LEN
}

/// Runs [`encrypt`] on the blocking pool so key derivation does not stall the runtime.
///
/// # Errors
///
/// Same as [`encrypt`]; a panicked worker maps to [`InterchangeError::Encryption`].
pub async fn encrypt_in_background(
    plaintext: String,
    password: Zeroizing<String>,
) -> Result<String, InterchangeError> {
    tokio::task::spawn_blocking(move || encrypt(&plaintext, &password))
        .await
        .map_err(|_| InterchangeError::Encryption)?
}

/// Runs [`decrypt`] on the blocking pool so key derivation does not stall the runtime.
///
/// # Errors
///
/// Same as [`decrypt`]; a panicked worker maps to [`InterchangeError::Decryption`].
pub async fn decrypt_in_background(
    encoded_blob: String,
    password: Zeroizing<String>,
) -> Result<String, InterchangeError> {
    tokio::task::spawn_blocking(move || decrypt(&encoded_blob, &password))
        .await
        .map_err(|_| InterchangeError::Decryption)?
}

fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0_u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key[..]);
    key
}
