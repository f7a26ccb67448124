//! Command-line surface for the `hibp-server` binary: a single `clap`
//! derive struct, short/long flags, `default_value`s doing the real
//! documentation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hibp_verifier::engine::EngineConfig;

#[derive(Parser, Debug)]
#[command(name = "hibp-server")]
#[command(about = "Serves a local Pwned Passwords corpus over the public lookup API shape")]
pub struct Args {
    /// Path to the database file. `updated-pwned-passwords.bin` and
    /// `pwned-passwords.lock` are derived as siblings in the same directory.
    #[arg(short, long, default_value = "pwned-passwords.bin")]
    pub database: PathBuf,

    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Seconds between checks for an updated database file.
    #[arg(long, default_value_t = 3600)]
    pub reload_interval: u64,

    /// Raise the log level; repeatable (`-v` = info, `-vv` = debug, `-vvv` = trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new(&self.database);
        config.reload_interval = Duration::from_secs(self.reload_interval);
        config
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "hibp_server=warn,hibp_verifier=warn",
            1 => "hibp_server=info,hibp_verifier=info",
            2 => "hibp_server=debug,hibp_verifier=debug",
            _ => "trace",
        }
    }
}
