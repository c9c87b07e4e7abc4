pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modp")]
#[command(about = "Finite-field Diffie-Hellman key agreement and SP 800-56A key derivation")]
pub struct Args {
    /// Path to the config file (defaults to ~/.modp/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace), overrides the config file
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
