//! The decryption core of an e-voting backend.
//!
//! A [`CryptoEngine`] holds the organizational main key. A [`DecryptionService`]
//! issues short-lived X25519 poll keys signed by that main key, and at the end of
//! a poll decrypts the whole batch of votes and signs the framed result.

mod artifact;
mod config;
mod decryption;
mod engine;
mod error;
mod frame;
mod keys;
mod serde_hex;
mod store;
mod util;

pub use artifact::*;
pub use config::*;
pub use decryption::*;
pub use engine::*;
pub use error::*;
pub use frame::*;
pub use keys::*;
pub use serde_hex::*;
pub use store::*;
pub use util::*;
