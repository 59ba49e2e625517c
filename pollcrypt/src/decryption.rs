use crate::*;
use ed25519_dalek::VerifyingKey;
use log::{debug, info, warn};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use std::sync::{Mutex, PoisonError};
use std::thread;

/// How `stop` spreads decryption over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecryptOptions {
    /// Worker threads per `stop`. Zero means the available parallelism.
    pub workers: usize,

    /// Batches with fewer ciphertexts than this are decrypted on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for DecryptOptions {
    fn default() -> Self {
        DecryptOptions {
            workers: 0,
            parallel_threshold: 64,
        }
    }
}

impl DecryptOptions {
    fn worker_count(&self, batch: usize) -> usize {
        if batch < self.parallel_threshold.max(2) {
            return 1;
        }
        let workers = match self.workers {
            0 => thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        };
        workers.min(batch)
    }
}

/// Runs the Start / Stop / Clear lifecycle of poll keys.
///
/// A poll is active from a successful `start` until it is stopped or cleared.
/// Stopping consumes the poll key whether or not every vote decrypts, and the
/// identifier may be started again straight away.
pub struct DecryptionService<R = OsRng> {
    engine: CryptoEngine,
    polls: PollKeyStore,
    rng: Mutex<R>,
    options: DecryptOptions,
}

impl DecryptionService<OsRng> {
    /// Create a service drawing poll keys from the operating system.
    pub fn new(engine: CryptoEngine) -> Self {
        DecryptionService::with_rng(engine, OsRng)
    }
}

impl<R: RngCore + CryptoRng> DecryptionService<R> {
    pub fn with_rng(engine: CryptoEngine, rng: R) -> Self {
        DecryptionService {
            engine,
            polls: PollKeyStore::new(),
            rng: Mutex::new(rng),
            options: DecryptOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecryptOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine(&self) -> &CryptoEngine {
        &self.engine
    }

    pub fn public_main_key(&self) -> VerifyingKey {
        self.engine.public_main_key()
    }

    pub fn is_active(&self, poll_id: &str) -> bool {
        self.polls.contains(poll_id)
    }

    /// Mint a key for a new poll and return its signed public key.
    pub fn start(&self, poll_id: &str) -> Result<SignedArtifact, Error> {
        let secret = self.polls.create(poll_id, || {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.engine.generate_poll_key(&mut *rng)
        })?;

        let (public, signature) = self.engine.sign_poll_key(&secret);

        info!("poll {} started", poll_id);
        Ok(SignedArtifact {
            payload: public.as_bytes().to_vec(),
            signature,
        })
    }

    /// Decrypt every vote of a poll and sign the framed result.
    ///
    /// If any ciphertext fails, no plaintext is returned and the error names the
    /// first failing index. The poll key is consumed in both cases.
    pub fn stop<C>(&self, poll_id: &str, ciphertexts: &[C]) -> Result<SignedArtifact, Error>
    where
        C: AsRef<[u8]> + Sync,
    {
        let secret = self.polls.take(poll_id)?;

        let plaintexts = match self.decrypt_all(&secret, ciphertexts) {
            Ok(plaintexts) => plaintexts,
            Err(e) => {
                warn!("poll {} stopped with undecryptable votes: {}", poll_id, e);
                if let Error::VoteDecryptionFailed { source, .. } = &e {
                    debug!("poll {} decryption failure cause: {}", poll_id, source);
                }
                return Err(e);
            }
        };
        drop(secret);

        let framed = encode_frame(&plaintexts)?;
        info!("poll {} stopped with {} votes", poll_id, plaintexts.len());

        Ok(SignedArtifact::sign(&self.engine, framed))
    }

    /// Forget a poll and its key. Succeeds whether or not the poll exists.
    pub fn clear(&self, poll_id: &str) {
        if self.polls.remove(poll_id) {
            info!("poll {} cleared", poll_id);
        }
    }

    fn decrypt_all<C>(&self, secret: &PollSecret, ciphertexts: &[C]) -> Result<Vec<Vec<u8>>, Error>
    where
        C: AsRef<[u8]> + Sync,
    {
        let workers = self.options.worker_count(ciphertexts.len());
        if workers <= 1 {
            return decrypt_chunk(&self.engine, secret, ciphertexts, 0);
        }

        let chunk_size = (ciphertexts.len() + workers - 1) / workers;
        let engine = &self.engine;

        // Chunks are joined in order, so output order matches input order and
        // the first error found is the lowest failing index.
        let chunks: Vec<Result<Vec<Vec<u8>>, Error>> = thread::scope(|s| {
            let handles: Vec<_> = ciphertexts
                .chunks(chunk_size)
                .enumerate()
                .map(move |(n, chunk)| {
                    s.spawn(move || decrypt_chunk(engine, secret, chunk, n * chunk_size))
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        let mut plaintexts = Vec::with_capacity(ciphertexts.len());
        for chunk in chunks {
            plaintexts.extend(chunk?);
        }
        Ok(plaintexts)
    }
}

fn decrypt_chunk<C: AsRef<[u8]>>(
    engine: &CryptoEngine,
    secret: &PollSecret,
    ciphertexts: &[C],
    offset: usize,
) -> Result<Vec<Vec<u8>>, Error> {
    ciphertexts
        .iter()
        .enumerate()
        .map(|(i, ciphertext)| {
            engine
                .decrypt(secret.as_bytes(), ciphertext.as_ref())
                .map_err(|e| Error::VoteDecryptionFailed {
                    index: offset + i,
                    source: Box::new(e),
                })
        })
        .collect()
}
