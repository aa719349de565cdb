// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Secure token generation for authentication
This module provides cryptographically secure token generation
for session tokens and CSRF tokens. */
use rand::{rngs::OsRng, TryRngCore};

/// Default token size in bytes (32 bytes = 256 bits of entropy)
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/** Generate a cryptographically secure random token
This uses OS-provided entropy to create a secure random token
that is suitable for session IDs and CSRF tokens.
# Returns
A lowercase hex string, or the OS error if no entropy is available */
pub fn generate_secure_token() -> Result<String, rand::rand_core::OsError> {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/** Generate a cryptographically secure random token with specified size
# Arguments
* `bytes` - The size of the random token in bytes
# Returns
A lowercase hex string of `2 * bytes` characters */
pub fn generate_secure_token_with_size(bytes: usize) -> Result<String, rand::rand_core::OsError> {
    let mut buffer = vec![0u8; bytes];
    OsRng.try_fill_bytes(&mut buffer)?;
    Ok(hex::encode(buffer))
}

/// Short prefix of a token that is safe to put in logs
pub fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
