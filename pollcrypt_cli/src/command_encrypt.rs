pub fn command_encrypt(matches: &clap::ArgMatches) {
    let poll_public_key = crate::hex_arg("encrypt", matches, "POLL-PUBLIC-KEY");
    let plaintext = matches.value_of("PLAINTEXT").unwrap_or_default();

    let mut rng = rand::rngs::OsRng;
    let ciphertext = pollcrypt::encrypt(&mut rng, &poll_public_key, plaintext.as_bytes())
        .unwrap_or_else(|e| crate::fail("encrypt", e));

    println!("{}", hex::encode(ciphertext));
}
