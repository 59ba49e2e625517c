pub fn command_verify(matches: &clap::ArgMatches) {
    let public_key = crate::hex_arg("verify", matches, "PUBLIC-KEY");
    let message = crate::hex_arg("verify", matches, "MESSAGE");
    let signature = crate::hex_arg("verify", matches, "SIGNATURE");

    if pollcrypt::verify(&public_key, &message, &signature) {
        println!("> Signature verified OK");
    } else {
        crate::fail("verify", "signature verification failed");
    }
}
