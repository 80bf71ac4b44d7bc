//! Nonce randomness as an injected capability.
//!
//! Key rotation draws fresh 32-bit nonces at unpredictable points inside the
//! encrypt path, so the source of those draws is a capability the context
//! owns rather than a direct call into the process RNG. Production code uses
//! [`OsNonceSource`]; tests substitute a deterministic stream to script
//! rotation behavior.
//!
//! The nonce is a public key-derivation salt, not a secret, so the source
//! does not need to be cryptographically strong. It must produce a wide
//! distribution and must not return 0 forever: 0 is reserved on the wire for
//! "no key established" and is rejection-sampled away by the caller.

/// A supplier of 32-bit nonce candidates.
pub trait NonceSource {
    /// Draws the next candidate value. 0 is a legal return; callers that
    /// cannot use it redraw.
    fn next_u32(&mut self) -> u32;
}

/// Nonce source backed by the operating system's entropy pool.
///
/// # Examples
///
/// ```rust
/// use rist_psk::{NonceSource, OsNonceSource};
///
/// let mut source = OsNonceSource;
/// let candidate = source.next_u32();
/// # let _ = candidate;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_u32(&mut self) -> u32 {
        crypto_rng::random_u32()
    }
}
