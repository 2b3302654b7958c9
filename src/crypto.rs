//! Passphrase-based sealing for the on-disk vault.
//!
//! Sealed layout: `MAGIC (7) || salt (16) || nonce (12) || ciphertext`.
//! The magic header validates the file format; a wrong passphrase is
//! detected by the AES-GCM authentication tag failing to verify.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

const MAGIC: &[u8] = b"AROGYA\x01";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

// Argon2id parameters: 19 MiB, 2 passes, 1 lane (OWASP baseline).
const KDF_MEMORY_KIB: u32 = 19456;
const KDF_ITERATIONS: u32 = 2;
const KDF_LANES: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("sealing failed")]
    Seal,
    #[error("unsealing failed — wrong passphrase or corrupted vault")]
    Open,
    #[error("not a vault file")]
    Format,
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_ITERATIONS, KDF_LANES, Some(KEY_LEN))
        .map_err(|_| CryptoError::KeyDerivation)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut *key)
        .map_err(|_| CryptoError::KeyDerivation)?;
    Ok(key)
}

/// Encrypt `plaintext` under a key derived from `passphrase` with a
/// fresh random salt and nonce.
pub fn seal(passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&*key).map_err(|_| CryptoError::Seal)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| CryptoError::Seal)?;

    let mut sealed = Vec::with_capacity(MAGIC.len() + SALT_LEN + NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(MAGIC);
    sealed.extend_from_slice(&salt);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypt output of [`seal`]. Fails with [`CryptoError::Format`] when
/// the header is missing and [`CryptoError::Open`] when the passphrase
/// is wrong or the ciphertext was tampered with.
pub fn open(passphrase: &str, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < MAGIC.len() + SALT_LEN + NONCE_LEN || &sealed[..MAGIC.len()] != MAGIC {
        return Err(CryptoError::Format);
    }

    let salt_start = MAGIC.len();
    let nonce_start = salt_start + SALT_LEN;
    let body_start = nonce_start + NONCE_LEN;

    let key = derive_key(passphrase, &sealed[salt_start..nonce_start])?;
    let cipher = Aes256Gcm::new_from_slice(&*key).map_err(|_| CryptoError::Open)?;

    cipher
        .decrypt(
            Nonce::from_slice(&sealed[nonce_start..body_start]),
            &sealed[body_start..],
        )
        .map_err(|_| CryptoError::Open)
}
