//! Password-based Key Derivation Function (Password KDF)
//!
//! This crate derives symmetric key material from a shared passphrase using
//! PBKDF2-HMAC-SHA256.
//!
//! # Overview
//!
//! PBKDF2 strengthens a passphrase against brute force by running many
//! HMAC-SHA256 rounds over `(password, salt)`:
//! - **Iterated hashing**: A configurable round count slows offline guessing
//! - **Salt support**: A per-derivation salt separates otherwise equal
//!   passphrases and defeats precomputed tables
//! - **Deterministic**: Both ends of a link derive the identical key from the
//!   identical `(password, salt, iterations)` tuple
//!
//! The iteration count is a parameter rather than a constant baked into this
//! crate: transport protocols that derive per-session keys fix the count in
//! their profile, and both peers must use the same value to interoperate.
//!
//! # Security Considerations
//!
//! - **Iterations**: Pick the largest count the packet path can tolerate;
//!   protocols that re-derive on the hot path (at key-rotation boundaries)
//!   deliberately use moderate counts.
//! - **Salt**: PBKDF2 places no minimum on salt length. Short salts (such as
//!   a 4-byte session nonce) weaken rainbow-table resistance but still
//!   separate key generations, which is the property rotation relies on.
//! - **Output handling**: Derived keys should be scrubbed by the caller when
//!   no longer needed.
//!
//! # Example
//!
//! ```
//! use crypto_password_kdf::derive;
//!
//! let password = b"my-secure-password";
//! let salt = b"unique-salt";
//! let mut derived_key = [0u8; 32];
//!
//! derive(password, salt, 1024, &mut derived_key).expect("derivation failed");
//!
//! // The derived key can now be loaded into a cipher
//! assert_ne!(derived_key, [0u8; 32]);
//! ```

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;

/// Error returned when the underlying PBKDF2 computation refuses its inputs.
///
/// With an HMAC-SHA256 pseudo-random function this is unreachable for any
/// practical password and output length, but it is surfaced rather than
/// swallowed: a caller must never continue with an uninitialized key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveError;

impl std::fmt::Display for DeriveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PBKDF2-HMAC-SHA256 key derivation failed")
    }
}

impl std::error::Error for DeriveError {}

/// Derives key material from a password using PBKDF2-HMAC-SHA256.
///
/// The entire `output_buffer` is filled; its length selects the derived key
/// length (`dkLen`).
///
/// # Arguments
///
/// * `password` - The shared secret to derive from
/// * `salt` - Salt bytes; the same bytes must be used by both derivation ends
/// * `iterations` - PBKDF2 round count; fixed by the protocol profile
/// * `output_buffer` - Filled with the derived key material
///
/// # Errors
///
/// Returns [`DeriveError`] if the underlying PBKDF2 implementation rejects
/// the inputs. The output buffer contents are unspecified in that case and
/// must not be used as a key.
///
/// # Example
///
/// ```
/// use crypto_password_kdf::derive;
///
/// let mut key_a = [0u8; 32];
/// let mut key_b = [0u8; 32];
///
/// derive(b"correct horse battery staple", b"salt", 1024, &mut key_a).unwrap();
/// derive(b"correct horse battery staple", b"salt", 1024, &mut key_b).unwrap();
///
/// // Same inputs, same key on both ends
/// assert_eq!(key_a, key_b);
/// ```
pub fn derive(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_buffer: &mut [u8],
) -> Result<(), DeriveError> {
    pbkdf2::<Hmac<Sha256>>(password, salt, iterations, output_buffer).map_err(|_| DeriveError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answer_one_iteration() {
        // PBKDF2-HMAC-SHA256, P="password", S="salt", c=1, dkLen=32
        let expected = [
            0x12, 0x0f, 0xb6, 0xcf, 0xfc, 0xf8, 0xb3, 0x2c, 0x43, 0xe7, 0x22, 0x52, 0x56, 0xc4,
            0xf8, 0x37, 0xa8, 0x65, 0x48, 0xc9, 0x2c, 0xcc, 0x35, 0x48, 0x08, 0x05, 0x98, 0x7c,
            0xb7, 0x0b, 0xe1, 0x7b,
        ];

        let mut key = [0u8; 32];
        derive(b"password", b"salt", 1, &mut key).unwrap();

        assert_eq!(key, expected);
    }

    #[test]
    fn test_known_answer_4096_iterations() {
        // PBKDF2-HMAC-SHA256, P="password", S="salt", c=4096, dkLen=32
        let expected = [
            0xc5, 0xe4, 0x78, 0xd5, 0x92, 0x88, 0xc8, 0x41, 0xaa, 0x53, 0x0d, 0xb6, 0x84, 0x5c,
            0x4c, 0x8d, 0x96, 0x28, 0x93, 0xa0, 0x01, 0xce, 0x4e, 0x11, 0xa4, 0x96, 0x38, 0x73,
            0xaa, 0x98, 0x13, 0x4a,
        ];

        let mut key = [0u8; 32];
        derive(b"password", b"salt", 4096, &mut key).unwrap();

        assert_eq!(key, expected);
    }

    #[test]
    fn test_different_passwords_produce_different_keys() {
        let salt = b"common-salt";

        let mut key1 = [0u8; 32];
        let mut key2 = [0u8; 32];

        derive(b"password1", salt, 1024, &mut key1).unwrap();
        derive(b"password2", salt, 1024, &mut key2).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_different_salts_produce_different_keys() {
        let password = b"same-password";

        let mut key1 = [0u8; 32];
        let mut key2 = [0u8; 32];

        derive(password, b"salt1", 1024, &mut key1).unwrap();
        derive(password, b"salt2", 1024, &mut key2).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_different_iterations_produce_different_keys() {
        let mut key1 = [0u8; 32];
        let mut key2 = [0u8; 32];

        derive(b"password", b"salt", 1024, &mut key1).unwrap();
        derive(b"password", b"salt", 2048, &mut key2).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_reproducibility() {
        let password = b"reproducible";
        let salt = b"fixed-salt";

        let mut key1 = [0u8; 32];
        let mut key2 = [0u8; 32];

        derive(password, salt, 1024, &mut key1).unwrap();
        derive(password, salt, 1024, &mut key2).unwrap();

        // Same inputs should produce same output
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_variable_output_lengths() {
        let password = b"test-password";
        let salt = b"test-salt";

        let mut key16 = [0u8; 16];
        let mut key24 = [0u8; 24];
        let mut key32 = [0u8; 32];

        derive(password, salt, 1024, &mut key16).unwrap();
        derive(password, salt, 1024, &mut key24).unwrap();
        derive(password, salt, 1024, &mut key32).unwrap();

        assert_ne!(key16, [0u8; 16]);
        assert_ne!(key24, [0u8; 24]);
        assert_ne!(key32, [0u8; 32]);

        // dkLen <= 32 stays within the first HMAC-SHA256 block, so shorter
        // outputs are prefixes of longer ones
        assert_eq!(&key32[..16], &key16[..]);
        assert_eq!(&key32[..24], &key24[..]);
    }

    #[test]
    fn test_four_byte_salt() {
        // Transport profiles salt with a 4-byte session nonce
        let mut key1 = [0u8; 32];
        let mut key2 = [0u8; 32];

        derive(b"shared-secret", &0x0052_4a57u32.to_le_bytes(), 1024, &mut key1).unwrap();
        derive(b"shared-secret", &0x0052_4a58u32.to_le_bytes(), 1024, &mut key2).unwrap();

        // Adjacent nonces must still produce unrelated keys
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_empty_password() {
        let password = b"";
        let salt = b"test-salt";
        let mut key = [0u8; 32];

        derive(password, salt, 1024, &mut key).unwrap();

        // Even empty password should produce a key
        assert_ne!(key, [0u8; 32]);
    }

    #[test]
    fn test_long_password() {
        let password = b"this is a very long password that exceeds the typical length of passwords but should still work correctly";
        let salt = b"test-salt";
        let mut key = [0u8; 32];

        derive(password, salt, 1024, &mut key).unwrap();

        assert_ne!(key, [0u8; 32]);
    }
}
