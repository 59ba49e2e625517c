use clap::{App, AppSettings, Arg, SubCommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use num_enum::TryFromPrimitive;

mod command_e2e;
mod command_encrypt;
mod command_keygen;
mod command_verify;

use command_e2e::command_e2e;
use command_encrypt::command_encrypt;
use command_keygen::{command_keygen, command_pubkey};
use command_verify::command_verify;

#[derive(TryFromPrimitive, PartialEq, Copy, Clone, Debug)]
#[repr(u8)]
enum Verbosity {
    Warn = 0,
    Info = 1,
    Debug = 2,
}

impl Verbosity {
    fn from_occurrences(count: u64) -> Self {
        Verbosity::try_from_primitive(count.min(2) as u8).unwrap_or(Verbosity::Debug)
    }

    fn level(self) -> LevelFilter {
        match self {
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
        }
    }
}

fn main() {
    let matches = App::new("pollcrypt")
        .version("0.1")
        .about("Inspects and exercises the pollcrypt vote decryption core")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("keygen")
                .about("Generate a new main key seed and print it with its public key"),
        )
        .subcommand(
            SubCommand::with_name("pubkey")
                .about("Print the main public key for POLLCRYPT_MAIN_KEY"),
        )
        .subcommand(
            SubCommand::with_name("encrypt")
                .about("Encrypt a vote against a poll public key")
                .arg(
                    Arg::with_name("POLL-PUBLIC-KEY")
                        .index(1)
                        .required(true)
                        .help("Poll public key in hex"),
                )
                .arg(
                    Arg::with_name("PLAINTEXT")
                        .index(2)
                        .required(true)
                        .help("The vote to encrypt"),
                ),
        )
        .subcommand(
            SubCommand::with_name("verify")
                .about("Verify an Ed25519 signature")
                .arg(
                    Arg::with_name("PUBLIC-KEY")
                        .index(1)
                        .required(true)
                        .help("Signer public key in hex"),
                )
                .arg(
                    Arg::with_name("MESSAGE")
                        .index(2)
                        .required(true)
                        .help("Signed message in hex"),
                )
                .arg(
                    Arg::with_name("SIGNATURE")
                        .index(3)
                        .required(true)
                        .help("Signature in hex"),
                ),
        )
        .subcommand(
            SubCommand::with_name("e2e")
                .about("Run a poll in-process: start, encrypt votes, stop and verify")
                .arg(
                    Arg::with_name("POLL-ID")
                        .index(1)
                        .required(true)
                        .help("Poll identifier"),
                )
                .arg(
                    Arg::with_name("VOTE")
                        .index(2)
                        .multiple(true)
                        .help("Votes to cast"),
                ),
        )
        .get_matches();

    let verbosity = Verbosity::from_occurrences(matches.occurrences_of("v"));
    if let Err(e) = init_logging(verbosity.level()) {
        eprintln!("pollcrypt: unable to initialise logging: {}", e);
        std::process::exit(1);
    }

    match matches.subcommand() {
        ("keygen", Some(matches)) => command_keygen(matches),
        ("pubkey", Some(matches)) => command_pubkey(matches),
        ("encrypt", Some(matches)) => command_encrypt(matches),
        ("verify", Some(matches)) => command_verify(matches),
        ("e2e", Some(matches)) => command_e2e(matches),
        _ => {
            eprintln!("{}", matches.usage());
            std::process::exit(1);
        }
    }
}

fn init_logging(level: LevelFilter) -> Result<(), String> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
        .build();

    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| e.to_string())?;

    log4rs::init_config(config).map_err(|e| e.to_string())?;
    Ok(())
}

/// Print an error and exit
pub fn fail(command: &str, message: impl std::fmt::Display) -> ! {
    eprintln!("pollcrypt {}: {}", command, message);
    std::process::exit(1);
}

/// Decode a hex argument, exiting with an error if it is not valid hex
pub fn hex_arg(command: &str, matches: &clap::ArgMatches, name: &str) -> Vec<u8> {
    let value = matches.value_of(name).unwrap_or_default();
    hex::decode(value.trim())
        .unwrap_or_else(|e| fail(command, format!("invalid hex for {}: {}", name, e)))
}

/// Load the main key seed from the environment
pub fn load_config(command: &str) -> pollcrypt::Config {
    pollcrypt::Config::from_env().unwrap_or_else(|e| fail(command, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(Verbosity::from_occurrences(0).level(), LevelFilter::Warn);
        assert_eq!(Verbosity::from_occurrences(1).level(), LevelFilter::Info);
        assert_eq!(Verbosity::from_occurrences(2).level(), LevelFilter::Debug);
        assert_eq!(Verbosity::from_occurrences(9).level(), LevelFilter::Debug);
    }
}
