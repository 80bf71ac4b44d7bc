//! Pre-shared-key payload cryptography for a RIST endpoint.
//!
//! This crate derives symmetric AES keys from a shared passphrase plus a
//! per-session wire nonce, and transforms sequentially numbered transport
//! payloads under AES-CTR. It is the cryptographic core of the media path:
//! the surrounding protocol layer parses GRE frames, hands the nonce and
//! sequence number in, and embeds the current nonce into outgoing frames.
//!
//! # Overview
//!
//! Each peer association owns one [`KeyContext`]. The context couples four
//! concerns:
//!
//! - **Parameters**: passphrase, AES key width, rotation budget, current
//!   nonce
//! - **Derivation**: PBKDF2-HMAC-SHA256 over `(passphrase, nonce)` producing
//!   the raw AES key
//! - **Transform**: AES-CTR over one payload per call, with the IV built
//!   from the packet's GRE sequence number
//! - **Rotation**: the encrypt side retires keys before their reuse bounds;
//!   the decrypt side follows nonce changes announced on the wire
//!
//! # Security Notes
//!
//! - **No authentication**: CTR is malleable; integrity of the payload is
//!   the business of the surrounding protocol envelope, not this crate.
//! - **Counter uniqueness**: the IV contains no randomness, only the
//!   sequence number. Keys must rotate before the sequence space wraps,
//!   which the reuse bounds enforce.
//! - **Secret hygiene**: passphrases and derived keys are scrubbed from
//!   memory on drop, and no secret-bearing type implements `Debug`.
//! - **Interop**: the PBKDF2 iteration count, the reuse bound and the salt
//!   byte order are fixed by the transport profile; peers that disagree on
//!   any of them derive unrelated keys and decode garbage.
//!
//! # Usage
//!
//! ```rust
//! use rist_psk::{DecryptOutcome, KeyContext};
//!
//! // sender side: key material appears on first use
//! let mut sender = KeyContext::new(256, 0, b"hunter2").unwrap();
//! let payload = b"\x80\x60\x00\x01media payload".to_vec();
//! let mut ciphertext = vec![0u8; payload.len()];
//! sender.encrypt(1, 0, &payload, &mut ciphertext).unwrap();
//!
//! // the envelope announces the sender's nonce with every frame
//! let announced = sender.gre_nonce();
//!
//! // receiver side: an independent context with the same passphrase
//! let mut receiver = KeyContext::new(256, 0, b"hunter2").unwrap();
//! let mut recovered = vec![0u8; ciphertext.len()];
//! let outcome = receiver
//!     .decrypt(announced, 1, 0, &ciphertext, &mut recovered)
//!     .unwrap();
//!
//! assert_eq!(outcome, DecryptOutcome::Transformed);
//! assert_eq!(recovered, payload);
//! ```

mod key_context;
mod nonce;

pub use key_context::{DecryptOutcome, KeyContext, PskError};
pub use nonce::{NonceSource, OsNonceSource};

pub use crypto_cipher::KeySize;

/// PBKDF2 round count for passphrase-to-key derivation.
///
/// Fixed by the transport profile; both peers must use the same value.
/// Derivation runs on the packet path at key-rotation boundaries, so the
/// count is moderate rather than interactive-login sized.
pub const PBKDF2_HMAC_SHA256_ITERATIONS: u32 = 1024;

/// Absolute upper bound on packets transformed under one derived key.
///
/// Far below the 2^32 sequence space, so a `(key, sequence)` counter pair
/// can never repeat. The encrypt side rotates before crossing it; the
/// decrypt side refuses to operate past it even for a misbehaving sender.
pub const AES_KEY_REUSE_TIMES: u32 = 1 << 28;

/// Maximum passphrase length in bytes.
pub const MAX_PASSPHRASE_LEN: usize = 128;
