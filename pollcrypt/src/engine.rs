//! Hybrid vote encryption on Curve25519, and Ed25519 signing with the main key.
//!
//! A vote ciphertext is laid out as:
//!
//! ```text
//! [ephemeral X25519 public key: 32][AES-GCM nonce: 12][sealed payload + 16 byte tag]
//! ```
//!
//! The symmetric key is HKDF-SHA256 over the raw X25519 shared secret, with no
//! salt and an empty info string. AES-256-GCM is used without associated data.
//!
//! X25519 is used because its public keys have a fixed 32 byte encoding. The
//! ciphertext carries the ephemeral key at a fixed offset with no length prefix,
//! so a curve with variable-length keys would make the format ambiguous.

use crate::*;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use hkdf::Hkdf;
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use std::fmt;
use x25519_dalek::StaticSecret;
use zeroize::Zeroizing;

pub use x25519_dalek::PublicKey as PollPublicKey;

pub const SEED_LENGTH: usize = 32;
pub const POLL_KEY_LENGTH: usize = 32;
pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 12;
pub const TAG_LENGTH: usize = 16;
pub const MIN_CIPHERTEXT_LENGTH: usize = PUBLIC_KEY_LENGTH + NONCE_LENGTH + TAG_LENGTH;

type AesKey = Zeroizing<[u8; 32]>;

/// The long-lived organizational signing key.
///
/// The private half has no accessor and is zeroized on drop.
pub struct MainKey(SigningKey);

impl MainKey {
    /// Derive the main key from a 32 byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, Error> {
        let seed: &[u8; SEED_LENGTH] = seed
            .try_into()
            .map_err(|_| Error::InvalidSeedLength(seed.len()))?;
        Ok(MainKey(SigningKey::from_bytes(seed)))
    }

    pub fn public(&self) -> VerifyingKey {
        self.0.verifying_key()
    }

    fn sign(&self, data: &[u8]) -> Signature {
        self.0.sign(data)
    }
}

impl fmt::Debug for MainKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("MainKey")
            .field(&hex::encode(self.public().as_bytes()))
            .finish()
    }
}

/// Stateless cryptographic operations bound to one main key.
#[derive(Debug)]
pub struct CryptoEngine {
    main_key: MainKey,
}

impl CryptoEngine {
    pub fn new(main_key: MainKey) -> Self {
        CryptoEngine { main_key }
    }

    pub fn from_seed(seed: &[u8]) -> Result<Self, Error> {
        Ok(CryptoEngine::new(MainKey::from_seed(seed)?))
    }

    /// The public half of the main key.
    pub fn public_main_key(&self) -> VerifyingKey {
        self.main_key.public()
    }

    /// Read a fresh poll private key from the random source.
    pub fn generate_poll_key<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<PollSecret, Error> {
        let mut secret = PollSecret::from([0u8; POLL_KEY_LENGTH]);
        rng.try_fill_bytes(secret.as_mut_bytes())
            .map_err(Error::RandomSourceExhausted)?;
        Ok(secret)
    }

    /// Compute the public key of a poll secret and sign it with the main key.
    pub fn sign_poll_key(&self, secret: &PollSecret) -> (PollPublicKey, Signature) {
        let public = PollPublicKey::from(&secret.to_static_secret());
        let signature = self.main_key.sign(public.as_bytes());
        (public, signature)
    }

    /// Compute the public poll key for `private_key` and sign it with the main key.
    pub fn derive_poll_public_key(
        &self,
        private_key: &[u8],
    ) -> Result<(PollPublicKey, Signature), Error> {
        let secret = PollSecret::from_bytes(private_key)?;
        Ok(self.sign_poll_key(&secret))
    }

    /// Open a single vote ciphertext with the poll private key.
    pub fn decrypt(&self, private_key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        if ciphertext.len() < MIN_CIPHERTEXT_LENGTH {
            return Err(Error::CiphertextTooShort(ciphertext.len()));
        }

        let (ephemeral_pk, rest) = ciphertext.split_at(PUBLIC_KEY_LENGTH);
        let (nonce, sealed) = rest.split_at(NONCE_LENGTH);
        let ephemeral_pk = public_key(ephemeral_pk).ok_or(Error::MalformedPeerKey)?;

        let secret = PollSecret::from_bytes(private_key)?.to_static_secret();
        let aes_key = decapsulate(&secret, &ephemeral_pk)?;

        aes_decrypt(&aes_key, nonce, sealed)
    }

    /// Sign arbitrary bytes with the main key.
    pub fn sign(&self, data: &[u8]) -> Signature {
        self.main_key.sign(data)
    }
}

/// Encrypt a vote for the holder of `poll_public_key`.
///
/// The decrypt service never calls this; it exists for clients, tooling and tests.
pub fn encrypt<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    poll_public_key: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, Error> {
    let receiver = public_key(poll_public_key).ok_or(Error::MalformedPeerKey)?;

    let mut ephemeral = PollSecret::from([0u8; POLL_KEY_LENGTH]);
    rng.try_fill_bytes(ephemeral.as_mut_bytes())
        .map_err(Error::RandomSourceExhausted)?;
    let ephemeral_sk = ephemeral.to_static_secret();
    let ephemeral_pk = PollPublicKey::from(&ephemeral_sk);

    let mut nonce = [0u8; NONCE_LENGTH];
    rng.try_fill_bytes(&mut nonce)
        .map_err(Error::RandomSourceExhausted)?;

    let aes_key = decapsulate(&ephemeral_sk, &receiver)?;
    let sealed = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&aes_key[..]))
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| Error::EncryptionFailed)?;

    let mut cipher_text = Vec::with_capacity(PUBLIC_KEY_LENGTH + NONCE_LENGTH + sealed.len());
    cipher_text.extend_from_slice(ephemeral_pk.as_bytes());
    cipher_text.extend_from_slice(&nonce);
    cipher_text.extend(sealed);

    Ok(cipher_text)
}

/// Check that `signature` over `message` was made by `public_key`.
///
/// Malformed keys and signatures verify as `false`.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let public_key = match parse_verifying_key(public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = match Signature::from_slice(signature) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    public_key.verify_strict(message, &signature).is_ok()
}

/// Parse an Ed25519 public key, such as the main public key.
pub fn parse_verifying_key(bytes: &[u8]) -> Result<VerifyingKey, Error> {
    let bytes: &[u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| Error::InvalidPublicKey)?;
    VerifyingKey::from_bytes(bytes).map_err(|_| Error::InvalidPublicKey)
}

// Every 32 byte string is an X25519 u-coordinate; only the length can be wrong.
fn public_key(bytes: &[u8]) -> Option<PollPublicKey> {
    let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().ok()?;
    Some(PollPublicKey::from(bytes))
}

fn decapsulate(secret: &StaticSecret, peer: &PollPublicKey) -> Result<AesKey, Error> {
    let shared = secret.diffie_hellman(peer);
    if !shared.was_contributory() {
        return Err(Error::KeyAgreementFailure);
    }
    hkdf_sha256(shared.as_bytes())
}

fn hkdf_sha256(master: &[u8]) -> Result<AesKey, Error> {
    let h = Hkdf::<Sha256>::new(None, master);
    let mut out = Zeroizing::new([0u8; 32]);
    h.expand(&[], &mut out[..])
        .map_err(|_| Error::KeyDerivationFailure)?;
    Ok(out)
}

fn aes_decrypt(key: &AesKey, nonce: &[u8], sealed: &[u8]) -> Result<Vec<u8>, Error> {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]))
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| Error::AuthenticationFailed)
}
