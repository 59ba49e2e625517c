use crate::*;
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

/// A payload together with the main key's signature over it.
///
/// `start` returns the poll public key as payload, `stop` the framed plaintexts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignedArtifact {
    #[serde(with = "HexForm::<Vec<u8>>")]
    pub payload: Vec<u8>,

    #[serde(with = "EdSignatureHex")]
    pub signature: Signature,
}

impl SignedArtifact {
    /// Sign `payload` with the engine's main key
    pub fn sign(engine: &CryptoEngine, payload: Vec<u8>) -> Self {
        let signature = engine.sign(&payload);
        SignedArtifact { payload, signature }
    }

    /// Verify the signature against a main public key
    pub fn verify(&self, main_public_key: &VerifyingKey) -> bool {
        main_public_key
            .verify_strict(&self.payload, &self.signature)
            .is_ok()
    }

    /// Decode a `stop` payload into the individual plaintexts
    pub fn plaintexts(&self) -> Result<Vec<Vec<u8>>, Error> {
        decode_frame(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let engine = CryptoEngine::from_seed(&[1u8; 32]).unwrap();
        let other = CryptoEngine::from_seed(&[2u8; 32]).unwrap();

        let artifact = SignedArtifact::sign(&engine, b"payload".to_vec());
        assert!(artifact.verify(&engine.public_main_key()));
        assert!(!artifact.verify(&other.public_main_key()));

        let mut tampered = artifact.clone();
        tampered.payload.push(0);
        assert!(!tampered.verify(&engine.public_main_key()));
    }

    #[test]
    fn test_json_hex() {
        let engine = CryptoEngine::from_seed(&[1u8; 32]).unwrap();
        let artifact = SignedArtifact::sign(&engine, vec![0xde, 0xad]);

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["payload"], "dead");
        assert_eq!(
            json["signature"],
            hex::encode(artifact.signature.to_bytes())
        );

        let back: SignedArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back, artifact);
    }

    #[test]
    fn test_json_rejects_bad_signature() {
        let json = serde_json::json!({ "payload": "dead", "signature": "beef" });
        assert!(serde_json::from_value::<SignedArtifact>(json).is_err());

        let json = serde_json::json!({ "payload": "not hex", "signature": "00".repeat(64) });
        assert!(serde_json::from_value::<SignedArtifact>(json).is_err());
    }
}
