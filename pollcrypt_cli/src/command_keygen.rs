use log::info;

pub fn command_keygen(_matches: &clap::ArgMatches) {
    let seed = pollcrypt::generate_main_seed().unwrap_or_else(|e| crate::fail("keygen", e));
    let engine = pollcrypt::CryptoEngine::from_seed(&seed[..])
        .unwrap_or_else(|e| crate::fail("keygen", e));

    println!("main-key-seed: {}", hex::encode(&seed[..]));
    println!("public-key: {}", hex::encode(engine.public_main_key().as_bytes()));
}

pub fn command_pubkey(_matches: &clap::ArgMatches) {
    let config = crate::load_config("pubkey");
    let engine = config.engine().unwrap_or_else(|e| crate::fail("pubkey", e));
    info!("loaded main key from {}", pollcrypt::MAIN_KEY_VAR);

    println!("{}", hex::encode(engine.public_main_key().as_bytes()));
}
