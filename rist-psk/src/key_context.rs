//! Per-association key state and the payload transform paths.
//!
//! A [`KeyContext`] holds everything one peer association needs to encrypt or
//! decrypt its payload stream: the shared passphrase, the configured AES key
//! width, the rotation budget, the current wire nonce and the key derived
//! from it. The encrypt path decides when to retire a key and draw a new
//! nonce; the decrypt path follows nonce changes announced by the sender.
//!
//! Derivation is PBKDF2-HMAC-SHA256 over `(passphrase, nonce)`; the payload
//! transform is AES-CTR with a per-packet IV built from the GRE sequence
//! number. No per-packet randomness enters the IV, so keystream uniqueness
//! rests entirely on the pair `(derived key, sequence number)`; the rotation
//! thresholds exist to keep that pair from ever repeating.

use zeroize::Zeroizing;

use crypto_cipher::{IV_SIZE, Iv, Key, KeySize};

use crate::nonce::{NonceSource, OsNonceSource};
use crate::{AES_KEY_REUSE_TIMES, MAX_PASSPHRASE_LEN, PBKDF2_HMAC_SHA256_ITERATIONS};

/// Errors surfaced by key-context configuration and derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PskError {
    /// The requested AES key size is not 128, 192 or 256 bits.
    InvalidKeySize(u32),
    /// The passphrase exceeds [`MAX_PASSPHRASE_LEN`] bytes.
    PassphraseTooLong(usize),
    /// The key derivation function refused; the context holds no usable key
    /// until a later derivation succeeds.
    Derivation,
}

impl std::fmt::Display for PskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PskError::InvalidKeySize(bits) => {
                write!(f, "invalid AES key size {bits} (expected 128, 192 or 256)")
            }
            PskError::PassphraseTooLong(len) => {
                write!(
                    f,
                    "passphrase is {len} bytes, maximum is {MAX_PASSPHRASE_LEN}"
                )
            }
            PskError::Derivation => write!(f, "key derivation failed"),
        }
    }
}

impl std::error::Error for PskError {}

/// What the decrypt path did with a packet.
///
/// An undecryptable packet is not an error: the sender may simply not have
/// established a key yet, or may have run a key past its reuse bound. The
/// caller accounts for skipped packets in its drop statistics and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// The payload was transformed into the output buffer.
    Transformed,
    /// The packet was not touched; the output buffer holds its previous
    /// contents.
    Skipped,
}

/// Builds the per-packet initial counter block from the GRE sequence number.
///
/// The block is zero except for the sequence number in network byte order:
/// version 1 frames carry it in bytes [0..4), all other versions in bytes
/// [12..16).
fn payload_iv(seq: u32, gre_version: u8) -> Iv {
    let mut iv = [0u8; IV_SIZE];
    let offset = if gre_version == 1 { 0 } else { IV_SIZE - 4 };
    iv[offset..offset + 4].copy_from_slice(&seq.to_be_bytes());
    Iv::from(iv)
}

/// Symmetric key state for one peer association.
///
/// The context is not internally synchronized: every operation takes
/// `&mut self`, and a context is owned by exactly one worker. Nothing here
/// blocks or suspends; derivation runs synchronously at nonce-change
/// boundaries.
///
/// The generic parameter is the randomness capability used to draw rotation
/// nonces. Production code uses the default [`OsNonceSource`]; tests inject
/// a scripted stream.
///
/// # Examples
///
/// ```rust
/// use rist_psk::{DecryptOutcome, KeyContext};
///
/// let mut sender = KeyContext::new(256, 0, b"hunter2").unwrap();
/// // the receiving side of the association shares the configuration but
/// // never the counter-mode state
/// let mut receiver = sender.clone();
///
/// let payload = vec![0u8; 1000];
/// let mut ciphertext = vec![0u8; 1000];
/// sender.encrypt(1, 0, &payload, &mut ciphertext).unwrap();
///
/// // the wire carries the sender's current nonce in every encrypted frame
/// let announced = sender.gre_nonce();
/// assert_ne!(announced, 0);
///
/// let mut recovered = vec![0u8; 1000];
/// let outcome = receiver
///     .decrypt(announced, 1, 0, &ciphertext, &mut recovered)
///     .unwrap();
/// assert_eq!(outcome, DecryptOutcome::Transformed);
/// assert_eq!(recovered, payload);
/// ```
pub struct KeyContext<R: NonceSource = OsNonceSource> {
    passphrase: Zeroizing<Vec<u8>>,
    key_size: KeySize,
    key_rotation: u32,
    gre_nonce: u32,
    used_times: u32,
    cipher_key: Option<Key>,
    bad_decryption: bool,
    bad_count: u32,
    nonce_source: R,
}

impl KeyContext<OsNonceSource> {
    /// Creates a context that draws rotation nonces from the OS entropy
    /// pool.
    ///
    /// No key is derived yet: the first encrypt bootstraps a nonce, and the
    /// decrypt path derives when the sender announces one.
    ///
    /// # Errors
    ///
    /// [`PskError::InvalidKeySize`] unless `key_size_bits` is 128, 192 or
    /// 256; [`PskError::PassphraseTooLong`] if the passphrase exceeds
    /// [`MAX_PASSPHRASE_LEN`] bytes.
    pub fn new(
        key_size_bits: u32,
        key_rotation: u32,
        passphrase: &[u8],
    ) -> Result<Self, PskError> {
        Self::with_nonce_source(key_size_bits, key_rotation, passphrase, OsNonceSource)
    }
}

impl<R: NonceSource> KeyContext<R> {
    /// Creates a context with an explicit nonce source.
    ///
    /// See [`KeyContext::new`] for the parameter contract.
    pub fn with_nonce_source(
        key_size_bits: u32,
        key_rotation: u32,
        passphrase: &[u8],
        nonce_source: R,
    ) -> Result<Self, PskError> {
        let key_size =
            KeySize::from_bits(key_size_bits).ok_or(PskError::InvalidKeySize(key_size_bits))?;
        if passphrase.len() > MAX_PASSPHRASE_LEN {
            return Err(PskError::PassphraseTooLong(passphrase.len()));
        }
        Ok(Self {
            passphrase: Zeroizing::new(passphrase.to_vec()),
            key_size,
            key_rotation,
            gre_nonce: 0,
            used_times: 0,
            cipher_key: None,
            bad_decryption: false,
            bad_count: 0,
            nonce_source,
        })
    }

    /// Replaces the passphrase and re-keys immediately.
    ///
    /// A fresh non-zero nonce is drawn and a key derived under it before the
    /// call returns, so no later packet can mix the new passphrase with an
    /// old nonce. On error the previous passphrase and key are untouched.
    ///
    /// # Errors
    ///
    /// [`PskError::PassphraseTooLong`] if the new passphrase exceeds
    /// [`MAX_PASSPHRASE_LEN`] bytes; [`PskError::Derivation`] if the KDF
    /// refuses, in which case the context holds no usable key.
    pub fn set_passphrase(&mut self, passphrase: &[u8]) -> Result<(), PskError> {
        if passphrase.len() > MAX_PASSPHRASE_LEN {
            return Err(PskError::PassphraseTooLong(passphrase.len()));
        }
        self.passphrase = Zeroizing::new(passphrase.to_vec());
        self.rotate()
    }

    /// Encrypts one payload, rotating the key first when required.
    ///
    /// The key is retired and a fresh nonce drawn when any of these hold:
    /// no nonce is established yet, the absolute reuse bound
    /// [`AES_KEY_REUSE_TIMES`] would be exceeded, or the configured
    /// `key_rotation` budget is spent. After the call, [`gre_nonce`]
    /// returns the value the surrounding envelope must announce with this
    /// packet.
    ///
    /// `seq` is the GRE sequence number of the packet; `gre_version` selects
    /// the IV layout.
    ///
    /// # Errors
    ///
    /// [`PskError::Derivation`] if re-keying fails; the output buffer is
    /// untouched.
    ///
    /// # Panics
    ///
    /// Panics if `inbuf` and `outbuf` differ in length.
    ///
    /// [`gre_nonce`]: KeyContext::gre_nonce
    pub fn encrypt(
        &mut self,
        seq: u32,
        gre_version: u8,
        inbuf: &[u8],
        outbuf: &mut [u8],
    ) -> Result<(), PskError> {
        assert_eq!(
            inbuf.len(),
            outbuf.len(),
            "input and output buffers must have equal length"
        );
        if self.must_rotate() {
            self.rotate()?;
        }
        self.transform(seq, gre_version, inbuf, outbuf)
    }

    /// Decrypts one payload under the nonce announced in its frame.
    ///
    /// A zero `announced_nonce` means the sender has not established a key:
    /// the packet is skipped. A changed nonce means the sender rotated: the
    /// context re-derives and resets its per-key accounting before
    /// transforming. A key already used past [`AES_KEY_REUSE_TIMES`] is
    /// refused outright, even if the sender keeps using it.
    ///
    /// # Errors
    ///
    /// [`PskError::Derivation`] if re-deriving for a changed nonce fails.
    ///
    /// # Panics
    ///
    /// Panics if `inbuf` and `outbuf` differ in length.
    pub fn decrypt(
        &mut self,
        announced_nonce: u32,
        seq: u32,
        gre_version: u8,
        inbuf: &[u8],
        outbuf: &mut [u8],
    ) -> Result<DecryptOutcome, PskError> {
        assert_eq!(
            inbuf.len(),
            outbuf.len(),
            "input and output buffers must have equal length"
        );
        if announced_nonce == 0 {
            return Ok(DecryptOutcome::Skipped);
        }
        if announced_nonce != self.gre_nonce {
            self.gre_nonce = announced_nonce;
            self.derive_key()?;
        }
        if self.used_times > AES_KEY_REUSE_TIMES {
            return Ok(DecryptOutcome::Skipped);
        }
        self.transform(seq, gre_version, inbuf, outbuf)?;
        Ok(DecryptOutcome::Transformed)
    }

    /// The nonce currently announced on the wire; 0 while no key is
    /// established.
    pub fn gre_nonce(&self) -> u32 {
        self.gre_nonce
    }

    /// Packets processed under the current derived key.
    pub fn used_times(&self) -> u32 {
        self.used_times
    }

    /// The configured AES key width.
    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    /// The proactive rotation budget; 0 means rotation on the absolute
    /// reuse bound only.
    pub fn key_rotation(&self) -> u32 {
        self.key_rotation
    }

    /// Marks a payload that decrypted to garbage.
    ///
    /// The receive path calls this when a decrypted payload fails the
    /// surrounding frame checks, typically meaning the peers' passphrases
    /// disagree. The flag and counter reset when the sender announces a new
    /// nonce.
    pub fn record_bad_decryption(&mut self) {
        self.bad_decryption = true;
        self.bad_count = self.bad_count.saturating_add(1);
    }

    /// Whether a garbage decryption was recorded under the current key.
    pub fn bad_decryption(&self) -> bool {
        self.bad_decryption
    }

    /// Garbage decryptions recorded under the current key.
    pub fn bad_count(&self) -> u32 {
        self.bad_count
    }

    /// Whether the encrypt path must re-key before transforming the next
    /// packet.
    fn must_rotate(&self) -> bool {
        self.gre_nonce == 0
            || self.used_times.saturating_add(1) > AES_KEY_REUSE_TIMES
            || (self.key_rotation > 0 && self.used_times >= self.key_rotation)
    }

    /// Draws a fresh nonce and derives a key under it.
    fn rotate(&mut self) -> Result<(), PskError> {
        // 0 is reserved on the wire for "no key established"
        self.gre_nonce = loop {
            let candidate = self.nonce_source.next_u32();
            if candidate != 0 {
                break candidate;
            }
        };
        self.derive_key()
    }

    /// Derives the AES key for the current `(passphrase, key_size, nonce)`
    /// tuple and resets the per-key accounting.
    ///
    /// The salt is the nonce as four little-endian bytes; both ends of the
    /// association must read the wire nonce with the same byte order for the
    /// derivations to agree.
    fn derive_key(&mut self) -> Result<(), PskError> {
        self.cipher_key = None;
        let mut raw = Zeroizing::new([0u8; 32]);
        let material = &mut raw[..self.key_size.bytes()];
        crypto_password_kdf::derive(
            &self.passphrase,
            &self.gre_nonce.to_le_bytes(),
            PBKDF2_HMAC_SHA256_ITERATIONS,
            material,
        )
        .map_err(|_| PskError::Derivation)?;
        self.cipher_key = Some(Key::new(self.key_size, material));
        self.used_times = 0;
        self.bad_decryption = false;
        self.bad_count = 0;
        Ok(())
    }

    /// Applies the CTR keystream for `(seq, gre_version)` to one payload and
    /// charges it against the current key.
    fn transform(
        &mut self,
        seq: u32,
        gre_version: u8,
        inbuf: &[u8],
        outbuf: &mut [u8],
    ) -> Result<(), PskError> {
        let key = self.cipher_key.as_ref().ok_or(PskError::Derivation)?;
        let iv = payload_iv(seq, gre_version);
        outbuf.copy_from_slice(inbuf);
        crypto_cipher::encrypt(key, &iv, outbuf);
        self.used_times = self.used_times.saturating_add(1);
        Ok(())
    }
}

/// Cloning copies the configuration only.
///
/// The clone starts with no nonce, no derived key and zeroed counters: two
/// contexts must never share counter-mode state, because reusing a `(key,
/// sequence)` pair leaks the XOR of the payloads.
impl<R: NonceSource + Clone> Clone for KeyContext<R> {
    fn clone(&self) -> Self {
        Self {
            passphrase: self.passphrase.clone(),
            key_size: self.key_size,
            key_rotation: self.key_rotation,
            gre_nonce: 0,
            used_times: 0,
            cipher_key: None,
            bad_decryption: false,
            bad_count: 0,
            nonce_source: self.nonce_source.clone(),
        }
    }
}
