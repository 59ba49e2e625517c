use crate::*;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory registry of active poll keys.
///
/// One mutex guards the map. It is held only while the map is read or mutated,
/// never during key generation or decryption, so polls do not wait on each other.
///
/// Keys are boxed so the secret bytes stay in one heap slot while the map grows,
/// and are zeroized when the box is dropped.
#[derive(Default)]
pub struct PollKeyStore {
    inner: Mutex<HashMap<String, Box<PollSecret>>>,
}

impl PollKeyStore {
    pub fn new() -> Self {
        PollKeyStore::default()
    }

    /// Register a new key for `poll_id`, produced by `generate`.
    ///
    /// Returns a copy of the private key so the caller can derive the public key.
    /// If two callers race on the same id, exactly one succeeds.
    pub fn create<F>(&self, poll_id: &str, generate: F) -> Result<PollSecret, Error>
    where
        F: FnOnce() -> Result<PollSecret, Error>,
    {
        if self.lock().contains_key(poll_id) {
            return Err(Error::PollAlreadyActive(poll_id.to_owned()));
        }

        let secret = Box::new(generate()?);
        let copy = PollSecret::clone(&secret);

        let mut polls = self.lock();
        if polls.contains_key(poll_id) {
            return Err(Error::PollAlreadyActive(poll_id.to_owned()));
        }
        polls.insert(poll_id.to_owned(), secret);

        Ok(copy)
    }

    /// Remove the key for `poll_id` and hand it to the caller.
    ///
    /// The entry is gone once this returns, so a second `take` for the same poll
    /// fails with `PollNotFound`.
    pub fn take(&self, poll_id: &str) -> Result<PollSecret, Error> {
        let secret = self
            .lock()
            .remove(poll_id)
            .ok_or_else(|| Error::PollNotFound(poll_id.to_owned()))?;
        Ok(PollSecret::clone(&secret))
    }

    /// Drop the key for `poll_id`, if any. Returns whether a key was removed.
    pub fn remove(&self, poll_id: &str) -> bool {
        let removed = self.lock().remove(poll_id);
        removed.is_some()
    }

    pub fn contains(&self, poll_id: &str) -> bool {
        self.lock().contains_key(poll_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated:
    // every critical section is a single map call.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Box<PollSecret>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
