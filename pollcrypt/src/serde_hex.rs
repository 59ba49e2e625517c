use ed25519_dalek::{Signature, SignatureError};
use std::borrow::Cow;

pub use hex_buffer_serde::{Hex, HexForm};

// a single-purpose type for use in `#[serde(with)]`
pub enum EdSignatureHex {}

impl Hex<Signature> for EdSignatureHex {
    type Error = SignatureError;

    fn create_bytes(sig: &Signature) -> Cow<[u8]> {
        Cow::from(sig.to_bytes().to_vec())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Signature, Self::Error> {
        Signature::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_hex_rejects_wrong_length() {
        assert!(EdSignatureHex::from_bytes(&[0u8; 63]).is_err());
        assert!(EdSignatureHex::from_bytes(&[0u8; 64]).is_ok());
    }
}
