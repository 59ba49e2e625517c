use log::{info, warn};
use pollcrypt::*;
use std::str;

pub fn command_e2e(matches: &clap::ArgMatches) {
    let poll_id = matches.value_of("POLL-ID").unwrap_or_default();
    let votes: Vec<&str> = matches
        .values_of("VOTE")
        .map(|values| values.collect())
        .unwrap_or_default();

    // Use the configured main key if there is one, otherwise a throwaway key
    let service = match std::env::var(MAIN_KEY_VAR) {
        Ok(_) => crate::load_config("e2e")
            .build_service()
            .unwrap_or_else(|e| crate::fail("e2e", e)),
        Err(_) => {
            warn!("{} not set, using a throwaway main key", MAIN_KEY_VAR);
            let seed = generate_main_seed().unwrap_or_else(|e| crate::fail("e2e", e));
            let engine = CryptoEngine::from_seed(&seed[..]).unwrap_or_else(|e| crate::fail("e2e", e));
            DecryptionService::new(engine)
        }
    };
    let main_public = service.public_main_key();

    let poll_key = service
        .start(poll_id)
        .unwrap_or_else(|e| crate::fail("e2e", e));
    if !poll_key.verify(&main_public) {
        crate::fail("e2e", "poll key signature did not verify");
    }
    println!("> Poll {} started", poll_id);
    println!("  main-public-key: {}", hex::encode(main_public.as_bytes()));
    println!("  poll-public-key: {}", hex::encode(&poll_key.payload));

    let mut rng = rand::rngs::OsRng;
    let ciphertexts: Vec<Vec<u8>> = votes
        .iter()
        .map(|vote| {
            encrypt(&mut rng, &poll_key.payload, vote.as_bytes())
                .unwrap_or_else(|e| crate::fail("e2e", e))
        })
        .collect();
    info!("encrypted {} votes", ciphertexts.len());

    let result = service
        .stop(poll_id, &ciphertexts)
        .unwrap_or_else(|e| crate::fail("e2e", e));
    if !result.verify(&main_public) {
        crate::fail("e2e", "result signature did not verify");
    }
    println!("> Poll {} stopped, result verified OK", poll_id);

    println!("Votes:");
    let plaintexts = result.plaintexts().unwrap_or_else(|e| crate::fail("e2e", e));
    for vote in plaintexts {
        match str::from_utf8(&vote) {
            Ok(vote) => println!("  {}", vote),
            Err(_) => println!("  0x{}", hex::encode(&vote)),
        }
    }

    let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| crate::fail("e2e", e));
    println!("Signed result:");
    println!("{}", json);
}
