use crate::*;
use std::fmt;
use x25519_dalek::StaticSecret;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The private X25519 scalar of a poll key.
///
/// Zeroized on drop. `Debug` never prints the key bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PollSecret([u8; POLL_KEY_LENGTH]);

impl PollSecret {
    /// Construct a `PollSecret` from a slice of bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; POLL_KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| Error::MalformedPrivateKey(bytes.len()))?;
        Ok(PollSecret(*bytes))
    }

    /// View this secret as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; POLL_KEY_LENGTH] {
        &self.0
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; POLL_KEY_LENGTH] {
        &mut self.0
    }

    /// The X25519 scalar, for key agreement.
    pub fn to_static_secret(&self) -> StaticSecret {
        StaticSecret::from(self.0)
    }
}

impl From<[u8; POLL_KEY_LENGTH]> for PollSecret {
    fn from(bytes: [u8; POLL_KEY_LENGTH]) -> Self {
        PollSecret(bytes)
    }
}

impl fmt::Debug for PollSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PollSecret(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            PollSecret::from_bytes(&[7u8; 31]),
            Err(Error::MalformedPrivateKey(31))
        ));
        assert!(PollSecret::from_bytes(&[7u8; 32]).is_ok());
    }

    #[test]
    fn static_secret_matches_bytes() {
        let secret = PollSecret::from([9u8; POLL_KEY_LENGTH]);
        assert_eq!(secret.to_static_secret().to_bytes(), [9u8; POLL_KEY_LENGTH]);
    }

    #[test]
    fn debug_is_redacted() {
        let secret = PollSecret::from([0xAB; POLL_KEY_LENGTH]);
        let printed = format!("{:?}", secret);
        assert_eq!(printed, "PollSecret(..)");
        assert!(!printed.to_lowercase().contains("ab"));
    }
}
