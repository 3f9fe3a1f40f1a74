//! Short code generation.
//!
//! Codes are drawn uniformly from a 64-character URL-safe alphabet using the
//! thread-local CSPRNG.

use rand::Rng;

/// URL-safe alphabet: letters, digits, `-` and `_`.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Default short code length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Codes that would be shadowed by fixed routes.
const RESERVED_CODES: &[&str] = &["health", "static", "api", "shorten", "favicon.ico"];

/// Generates a random short code of `length` characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` must never be handed out.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
