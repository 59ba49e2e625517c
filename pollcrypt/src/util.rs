use crate::*;
use rand_core::RngCore;
use zeroize::Zeroizing;

/// Generate a fresh main key seed from the operating system's random source.
pub fn generate_main_seed() -> Result<Zeroizing<[u8; SEED_LENGTH]>, Error> {
    let mut csprng = rand::rngs::OsRng {};
    let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
    csprng
        .try_fill_bytes(&mut seed[..])
        .map_err(Error::RandomSourceExhausted)?;
    Ok(seed)
}
