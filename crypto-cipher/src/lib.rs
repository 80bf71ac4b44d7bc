//! # crypto-cipher
//!
//! A minimal Rust library providing AES-CTR symmetric encryption over the
//! three standard AES key sizes (128, 192 and 256 bits).
//!
//! This crate provides a simple interface for AES in counter (CTR) mode.
//! CTR mode turns a block cipher into a stream cipher, allowing encryption of
//! arbitrary length data without padding. The counter treats the 16-byte IV
//! as a big-endian integer and increments it once per block; the final
//! (possibly partial) block of keystream is truncated to the buffer length.
//!
//! ## Features
//!
//! - **AES-128/192/256**: Key width chosen at key-construction time
//! - **CTR mode**: Stream cipher mode for arbitrary length data
//! - **No authentication**: This is encryption only, not AEAD
//! - **Simple API**: Two in-place functions over a [`Key`] and an [`Iv`]
//!
//! ## Security Notes
//!
//! - **No authentication**: This crate provides encryption only. Integrity of
//!   the transformed bytes must be provided by the surrounding envelope.
//! - **Message length leaked**: CTR mode does not use padding, so the
//!   ciphertext length exactly matches the plaintext length.
//! - **IV reuse is catastrophic**: Never reuse the same key/IV pair. Each
//!   encryption must use a unique IV for a given key.
//!
//! ## Usage
//!
//! ```rust
//! use crypto_cipher::{Key, KeySize, Iv, encrypt, decrypt, IV_SIZE};
//!
//! // Build a key at the desired width and an initial counter block
//! let key = Key::new(KeySize::Aes256, &[42u8; 32]);
//! let iv = Iv::from([1u8; IV_SIZE]);
//!
//! // Encrypt some data in-place
//! let mut data = b"Hello, world!".to_vec();
//! encrypt(&key, &iv, &mut data);
//!
//! // Decrypt the data in-place
//! decrypt(&key, &iv, &mut data);
//!
//! assert_eq!(&data, b"Hello, world!");
//! ```

use aes::{Aes128, Aes192, Aes256};
use ctr::{
    Ctr128BE,
    cipher::{KeyIvInit, StreamCipher},
};
use zeroize::ZeroizeOnDrop;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// AES-CTR IV size in bytes (one AES block)
///
/// In CTR mode this is the initial counter value; the counter is the full
/// 128-bit block, incremented big-endian once per block of keystream.
pub const IV_SIZE: usize = 16;

/// Type aliases for AES in CTR mode with a 128-bit big-endian counter
type Aes128Ctr = Ctr128BE<Aes128>;
type Aes192Ctr = Ctr128BE<Aes192>;
type Aes256Ctr = Ctr128BE<Aes256>;

/// Supported AES key widths.
///
/// # Examples
///
/// ```rust
/// use crypto_cipher::KeySize;
///
/// assert_eq!(KeySize::from_bits(256), Some(KeySize::Aes256));
/// assert_eq!(KeySize::from_bits(512), None);
/// assert_eq!(KeySize::Aes192.bytes(), 24);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySize {
    /// 128-bit key
    Aes128,
    /// 192-bit key
    Aes192,
    /// 256-bit key
    Aes256,
}

impl KeySize {
    /// Key width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            KeySize::Aes128 => 128,
            KeySize::Aes192 => 192,
            KeySize::Aes256 => 256,
        }
    }

    /// Key width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    /// Maps a bit count to a key width; `None` for anything other than
    /// 128, 192 or 256.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            128 => Some(KeySize::Aes128),
            192 => Some(KeySize::Aes192),
            256 => Some(KeySize::Aes256),
            _ => None,
        }
    }
}

/// A key for AES-CTR encryption, held at its exact width.
///
/// The key bytes are automatically zeroed when dropped. The variant fixes the
/// AES key schedule used for every transform under this key, so callers never
/// branch on the width themselves.
///
/// # Examples
///
/// ```rust
/// use crypto_cipher::{Key, KeySize};
///
/// // From a derived-key buffer, at a runtime-selected width
/// let material = [7u8; 32];
/// let key = Key::new(KeySize::Aes128, &material[..16]);
/// assert_eq!(key.size(), KeySize::Aes128);
///
/// // Or directly from an exact-size array
/// let key = Key::from([7u8; 24]);
/// assert_eq!(key.size(), KeySize::Aes192);
/// ```
#[derive(ZeroizeOnDrop)]
pub enum Key {
    /// AES-128 key
    Aes128([u8; 16]),
    /// AES-192 key
    Aes192([u8; 24]),
    /// AES-256 key
    Aes256([u8; 32]),
}

impl Key {
    /// Builds a key of the given width from raw key material.
    ///
    /// # Panics
    ///
    /// Panics if `material` is not exactly `size.bytes()` long.
    pub fn new(size: KeySize, material: &[u8]) -> Self {
        assert_eq!(
            material.len(),
            size.bytes(),
            "key material length does not match the requested key size"
        );
        match size {
            KeySize::Aes128 => {
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(material);
                Key::Aes128(bytes)
            }
            KeySize::Aes192 => {
                let mut bytes = [0u8; 24];
                bytes.copy_from_slice(material);
                Key::Aes192(bytes)
            }
            KeySize::Aes256 => {
                let mut bytes = [0u8; 32];
                bytes.copy_from_slice(material);
                Key::Aes256(bytes)
            }
        }
    }

    /// The width of this key.
    pub fn size(&self) -> KeySize {
        match self {
            Key::Aes128(_) => KeySize::Aes128,
            Key::Aes192(_) => KeySize::Aes192,
            Key::Aes256(_) => KeySize::Aes256,
        }
    }
}

impl From<[u8; 16]> for Key {
    fn from(bytes: [u8; 16]) -> Self {
        Key::Aes128(bytes)
    }
}

impl From<[u8; 24]> for Key {
    fn from(bytes: [u8; 24]) -> Self {
        Key::Aes192(bytes)
    }
}

impl From<[u8; 32]> for Key {
    fn from(bytes: [u8; 32]) -> Self {
        Key::Aes256(bytes)
    }
}

/// An IV (initial counter block) for AES-CTR encryption.
///
/// This wraps a 128-bit block and provides safe byte array conversions.
/// The bytes are automatically zeroed when dropped.
///
/// # Examples
///
/// ```rust
/// use crypto_cipher::{Iv, IV_SIZE};
///
/// let iv_bytes = [1u8; IV_SIZE];
/// let iv = Iv::from(iv_bytes);
/// assert_eq!(iv.as_bytes(), &iv_bytes);
/// ```
#[derive(ZeroizeOnDrop)]
pub struct Iv([u8; IV_SIZE]);

impl From<[u8; IV_SIZE]> for Iv {
    fn from(bytes: [u8; IV_SIZE]) -> Self {
        Self(bytes)
    }
}

impl Iv {
    /// Get the raw bytes of the IV
    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.0
    }
}

/// Encrypts data in-place using AES-CTR.
///
/// CTR mode encrypts data by XORing it with a keystream generated from the
/// key and the incrementing counter block. This function modifies the buffer
/// in-place; the output length always equals the input length.
///
/// # Arguments
///
/// * `key` - The AES key, at any supported width
/// * `iv` - The initial counter block. Must be unique for each encryption
///   with the same key
/// * `buffer` - The data to encrypt (modified in-place)
///
/// # Security Note
///
/// Never reuse an IV with the same key. Counter reuse in CTR mode completely
/// breaks the security of the encryption.
pub fn encrypt(key: &Key, iv: &Iv, buffer: &mut [u8]) {
    apply_keystream(key, iv, buffer);
}

/// Decrypts data in-place using AES-CTR.
///
/// Due to the symmetric nature of XOR in CTR mode, decryption is identical
/// to encryption. This function is provided for API clarity and modifies
/// the buffer in-place.
///
/// # Arguments
///
/// * `key` - The AES key (must match the encryption key)
/// * `iv` - The initial counter block (must match the encryption IV)
/// * `buffer` - The data to decrypt (modified in-place)
pub fn decrypt(key: &Key, iv: &Iv, buffer: &mut [u8]) {
    // In CTR mode, encryption and decryption are the same operation
    apply_keystream(key, iv, buffer);
}

fn apply_keystream(key: &Key, iv: &Iv, buffer: &mut [u8]) {
    match key {
        Key::Aes128(k) => {
            let mut cipher = Aes128Ctr::new(k.into(), iv.as_bytes().into());
            cipher.apply_keystream(buffer);
        }
        Key::Aes192(k) => {
            let mut cipher = Aes192Ctr::new(k.into(), iv.as_bytes().into());
            cipher.apply_keystream(buffer);
        }
        Key::Aes256(k) => {
            let mut cipher = Aes256Ctr::new(k.into(), iv.as_bytes().into());
            cipher.apply_keystream(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SIZES: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    fn key_of(size: KeySize, fill: u8) -> Key {
        Key::new(size, &vec![fill; size.bytes()])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip_all_key_sizes() {
        for size in ALL_SIZES {
            let key = key_of(size, 42);
            let iv = Iv::from([1u8; IV_SIZE]);
            let original = b"Hello, world! This is a test message.";
            let mut buffer = original.to_vec();

            encrypt(&key, &iv, &mut buffer);
            assert_ne!(buffer.as_slice(), original);

            decrypt(&key, &iv, &mut buffer);
            assert_eq!(buffer.as_slice(), original);
        }
    }

    #[test]
    fn test_key_sizes_produce_different_ciphertexts() {
        let iv = Iv::from([0u8; IV_SIZE]);
        let plaintext = b"Test message";

        let mut outputs = Vec::new();
        for size in ALL_SIZES {
            let key = key_of(size, 1);
            let mut buffer = plaintext.to_vec();
            encrypt(&key, &iv, &mut buffer);
            outputs.push(buffer);
        }

        assert_ne!(outputs[0], outputs[1]);
        assert_ne!(outputs[1], outputs[2]);
        assert_ne!(outputs[0], outputs[2]);
    }

    #[test]
    fn test_different_keys_produce_different_ciphertexts() {
        let key1 = key_of(KeySize::Aes256, 1);
        let key2 = key_of(KeySize::Aes256, 2);
        let iv = Iv::from([0u8; IV_SIZE]);
        let plaintext = b"Test message";

        let mut ciphertext1 = plaintext.to_vec();
        let mut ciphertext2 = plaintext.to_vec();

        encrypt(&key1, &iv, &mut ciphertext1);
        encrypt(&key2, &iv, &mut ciphertext2);

        assert_ne!(ciphertext1, ciphertext2);
    }

    #[test]
    fn test_different_ivs_produce_different_ciphertexts() {
        let key = key_of(KeySize::Aes256, 0);
        let iv1 = Iv::from([1u8; IV_SIZE]);
        let iv2 = Iv::from([2u8; IV_SIZE]);
        let plaintext = b"Test message";

        let mut ciphertext1 = plaintext.to_vec();
        let mut ciphertext2 = plaintext.to_vec();

        encrypt(&key, &iv1, &mut ciphertext1);
        encrypt(&key, &iv2, &mut ciphertext2);

        assert_ne!(ciphertext1, ciphertext2);
    }

    #[test]
    fn test_length_preservation() {
        for len in [0usize, 1, 15, 16, 17, 70_000] {
            let key = key_of(KeySize::Aes128, 9);
            let iv = Iv::from([3u8; IV_SIZE]);
            let mut buffer = vec![0xA5u8; len];

            encrypt(&key, &iv, &mut buffer);
            assert_eq!(buffer.len(), len);

            decrypt(&key, &iv, &mut buffer);
            assert_eq!(buffer, vec![0xA5u8; len]);
        }
    }

    #[test]
    fn test_counter_increments_big_endian() {
        let key = key_of(KeySize::Aes256, 7);

        // Two blocks from a counter starting at N...
        let mut start = [0u8; IV_SIZE];
        start[15] = 5;
        let mut two_blocks = vec![0u8; 2 * BLOCK_SIZE];
        encrypt(&key, &Iv::from(start), &mut two_blocks);

        // ...must continue with the single block at N + 1
        let mut next = [0u8; IV_SIZE];
        next[15] = 6;
        let mut one_block = vec![0u8; BLOCK_SIZE];
        encrypt(&key, &Iv::from(next), &mut one_block);

        assert_eq!(&two_blocks[BLOCK_SIZE..], &one_block[..]);
    }

    #[test]
    fn test_deterministic_encryption() {
        let key = key_of(KeySize::Aes192, 99);
        let iv = Iv::from([88u8; IV_SIZE]);
        let plaintext = b"Deterministic test";

        let mut ciphertext1 = plaintext.to_vec();
        let mut ciphertext2 = plaintext.to_vec();

        encrypt(&key, &iv, &mut ciphertext1);
        encrypt(&key, &iv, &mut ciphertext2);

        // Same key, IV, and plaintext should produce identical ciphertext
        assert_eq!(ciphertext1, ciphertext2);
    }

    #[test]
    fn test_encrypt_decrypt_same_operation() {
        let key = key_of(KeySize::Aes128, 7);
        let iv = Iv::from([3u8; IV_SIZE]);
        let plaintext = b"Test symmetry";

        let mut buffer1 = plaintext.to_vec();
        let mut buffer2 = plaintext.to_vec();

        // Encrypt with encrypt function
        encrypt(&key, &iv, &mut buffer1);

        // "Encrypt" with decrypt function (should be same in CTR mode)
        decrypt(&key, &iv, &mut buffer2);

        // Should produce identical results
        assert_eq!(buffer1, buffer2);
    }

    #[test]
    fn test_key_from_arrays() {
        assert_eq!(Key::from([0u8; 16]).size(), KeySize::Aes128);
        assert_eq!(Key::from([0u8; 24]).size(), KeySize::Aes192);
        assert_eq!(Key::from([0u8; 32]).size(), KeySize::Aes256);
    }

    #[test]
    #[should_panic(expected = "key material length")]
    fn test_key_new_rejects_wrong_length() {
        let _ = Key::new(KeySize::Aes256, &[0u8; 16]);
    }

    #[test]
    fn test_key_size_from_bits() {
        assert_eq!(KeySize::from_bits(128), Some(KeySize::Aes128));
        assert_eq!(KeySize::from_bits(192), Some(KeySize::Aes192));
        assert_eq!(KeySize::from_bits(256), Some(KeySize::Aes256));
        assert_eq!(KeySize::from_bits(0), None);
        assert_eq!(KeySize::from_bits(64), None);
        assert_eq!(KeySize::from_bits(512), None);
    }
}
