//! # crypto-rng
//!
//! A minimal Rust library providing randomness from the operating system's
//! secure entropy source.
//!
//! This crate is the single place the rest of the workspace obtains random
//! bytes: bulk buffer fills for key material and salts, and 32-bit draws for
//! wire-visible session nonces.
//!
//! ## Features
//!
//! - **OS-provided entropy**: Uses the platform's secure random source
//! - **Simple API**: Fill a buffer, or draw a single 32-bit value
//! - **No manual seeding**: The OS seeds and maintains the generator
//! - **Thread-safe**: The underlying source can be called from any thread
//!
//! ## Platform Support
//!
//! - **Linux/Android**: `getrandom()` system call
//! - **macOS/iOS**: `getentropy()` or `SecRandomCopyBytes()`
//! - **Windows**: `BCryptGenRandom()`
//!
//! ## Security Notes
//!
//! - **Entropy quality**: This crate relies on the operating system to provide
//!   cryptographically secure entropy. The quality is as good as the
//!   platform's implementation.
//! - **Failure is fatal**: If the random source fails, this crate panics.
//!   Continuing without proper randomness would be a critical security
//!   failure, so the process does not proceed in an insecure state.
//!
//! ## Usage
//!
//! ```rust
//! use crypto_rng::{fill_buffer, random_u32};
//!
//! // Fill a buffer with random bytes
//! let mut salt = [0u8; 16];
//! fill_buffer(&mut salt);
//!
//! // Draw a single 32-bit value, e.g. for a session nonce
//! let nonce = random_u32();
//! # let _ = nonce;
//! ```

/// Fills a buffer with random bytes from the operating system.
///
/// # Arguments
///
/// * `buffer` - A mutable byte slice to be filled with random data
///
/// # Panics
///
/// Panics if the underlying random source fails. Random source failures are
/// extremely rare and typically indicate a serious system problem; refusing
/// to continue is safer than operating on predictable bytes.
///
/// # Examples
///
/// ```rust
/// use crypto_rng::fill_buffer;
///
/// let mut key = [0u8; 32];
/// fill_buffer(&mut key);
/// ```
pub fn fill_buffer(buffer: &mut [u8]) {
    getrandom::getrandom(buffer)
        .expect("Failed to generate random bytes: system random source unavailable");
}

/// Draws a single 32-bit value from the operating system's random source.
///
/// The four bytes are taken as a native-endian integer; every 32-bit value is
/// equally likely, including 0. Callers that reserve particular values (such
/// as a zero nonce meaning "no key established") must reject and redraw.
///
/// # Panics
///
/// Panics if the underlying random source fails, like [`fill_buffer`].
///
/// # Examples
///
/// ```rust
/// use crypto_rng::random_u32;
///
/// let a = random_u32();
/// let b = random_u32();
/// # let _ = (a, b);
/// ```
pub fn random_u32() -> u32 {
    let mut bytes = [0u8; 4];
    fill_buffer(&mut bytes);
    u32::from_ne_bytes(bytes)
}
