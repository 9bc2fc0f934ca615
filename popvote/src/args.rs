use std::path::PathBuf;

use clap::Parser;

/// Popvote backend
#[derive(Debug, Parser)]
#[command(name = "popvote", about = "Image voting and AI content backend")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "popvote.toml", env = "POPVOTE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "POPVOTE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
