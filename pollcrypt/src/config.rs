use crate::*;
use std::env::var;
use zeroize::Zeroizing;

pub const MAIN_KEY_VAR: &str = "POLLCRYPT_MAIN_KEY";
pub const DECRYPT_WORKERS_VAR: &str = "POLLCRYPT_DECRYPT_WORKERS";
pub const PARALLEL_THRESHOLD_VAR: &str = "POLLCRYPT_PARALLEL_THRESHOLD";

/// Process configuration, read from the environment.
pub struct Config {
    pub main_key_seed: Zeroizing<Vec<u8>>,
    pub decrypt: DecryptOptions,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let main_key = var(MAIN_KEY_VAR)
            .map(Zeroizing::new)
            .map_err(|_| Error::InvalidConfig(format!("{} must be set", MAIN_KEY_VAR)))?;

        Config::from_vars(
            &main_key,
            var(DECRYPT_WORKERS_VAR).ok().as_deref(),
            var(PARALLEL_THRESHOLD_VAR).ok().as_deref(),
        )
    }

    /// Build a config from raw variable values. Unset optional values take their defaults.
    pub fn from_vars(
        main_key_hex: &str,
        decrypt_workers: Option<&str>,
        parallel_threshold: Option<&str>,
    ) -> Result<Self, Error> {
        let main_key_seed = Zeroizing::new(hex::decode(main_key_hex.trim())?);
        if main_key_seed.len() != SEED_LENGTH {
            return Err(Error::InvalidSeedLength(main_key_seed.len()));
        }

        let mut decrypt = DecryptOptions::default();
        if let Some(workers) = decrypt_workers {
            decrypt.workers = parse_count(DECRYPT_WORKERS_VAR, workers)?;
        }
        if let Some(threshold) = parallel_threshold {
            decrypt.parallel_threshold = parse_count(PARALLEL_THRESHOLD_VAR, threshold)?;
        }

        Ok(Config {
            main_key_seed,
            decrypt,
        })
    }

    pub fn engine(&self) -> Result<CryptoEngine, Error> {
        CryptoEngine::from_seed(&self.main_key_seed)
    }

    pub fn build_service(&self) -> Result<DecryptionService, Error> {
        Ok(DecryptionService::new(self.engine()?).with_options(self.decrypt))
    }
}

fn parse_count(name: &str, value: &str) -> Result<usize, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{} must be a number, got {:?}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(ZERO_SEED, None, None).unwrap();
        assert_eq!(config.main_key_seed.as_slice(), &[0u8; 32]);
        assert_eq!(config.decrypt, DecryptOptions::default());

        let service = config.build_service().unwrap();
        assert_eq!(
            service.public_main_key(),
            CryptoEngine::from_seed(&[0u8; 32]).unwrap().public_main_key()
        );
    }

    #[test]
    fn test_decrypt_options() {
        let config = Config::from_vars(ZERO_SEED, Some("3"), Some(" 16 ")).unwrap();
        assert_eq!(
            config.decrypt,
            DecryptOptions {
                workers: 3,
                parallel_threshold: 16
            }
        );

        assert!(matches!(
            Config::from_vars(ZERO_SEED, Some("many"), None),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_seed() {
        assert!(matches!(
            Config::from_vars("zz", None, None),
            Err(Error::InvalidSeedHex(_))
        ));
        assert!(matches!(
            Config::from_vars("00ff", None, None),
            Err(Error::InvalidSeedLength(2))
        ));
    }
}
