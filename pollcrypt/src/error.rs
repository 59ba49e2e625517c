use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("pollcrypt: main key seed must be 32 bytes, got {0}")]
    InvalidSeedLength(usize),

    #[error("pollcrypt: main key seed is not valid hexidecimal: {0}")]
    InvalidSeedHex(#[from] hex::FromHexError),

    #[error("pollcrypt: invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("pollcrypt: random source exhausted: {0}")]
    RandomSourceExhausted(#[source] rand_core::Error),

    #[error("pollcrypt: poll private key must be 32 bytes, got {0}")]
    MalformedPrivateKey(usize),

    #[error("pollcrypt: ciphertext too short: need at least 60 bytes, got {0}")]
    CiphertextTooShort(usize),

    #[error("pollcrypt: invalid public key in ciphertext")]
    MalformedPeerKey,

    #[error("pollcrypt: key agreement produced a non-contributory shared secret")]
    KeyAgreementFailure,

    #[error("pollcrypt: symmetric key derivation failed")]
    KeyDerivationFailure,

    #[error("pollcrypt: ciphertext failed authentication")]
    AuthenticationFailed,

    #[error("pollcrypt: failed to encrypt vote")]
    EncryptionFailed,

    #[error("pollcrypt: poll {0} is already active")]
    PollAlreadyActive(String),

    #[error("pollcrypt: poll {0} not found")]
    PollNotFound(String),

    /// The precise cause is kept in `source` for diagnostics only.
    #[error("pollcrypt: vote {index} could not be decrypted")]
    VoteDecryptionFailed {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("pollcrypt: plaintext {0} is too large to frame")]
    PlaintextTooLarge(usize),

    #[error("pollcrypt: malformed result frame")]
    MalformedFrame,

    #[error("pollcrypt: invalid public key")]
    InvalidPublicKey,

    #[error("pollcrypt: invalid signature encoding")]
    InvalidSignature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_failure_hides_cause_in_message() {
        let err = Error::VoteDecryptionFailed {
            index: 3,
            source: Box::new(Error::AuthenticationFailed),
        };
        assert_eq!(err.to_string(), "pollcrypt: vote 3 could not be decrypted");

        let cause = std::error::Error::source(&err).unwrap();
        assert_eq!(
            cause.to_string(),
            "pollcrypt: ciphertext failed authentication"
        );
    }
}
