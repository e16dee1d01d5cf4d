//! `emvtap`: reads the label, PAN and expiry date of contactless EMV cards

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use emvtap_transport_pcsc::PcscDeviceManager;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod config;

use commands::*;

#[derive(Parser)]
#[command(version, about = "Read contactless EMV cards through a PC/SC reader")]
struct Cli {
    /// Configuration file (defaults to ./emvtap.toml when present)
    #[arg(short, long, env = "EMVTAP_CONFIG")]
    config: Option<PathBuf>,

    /// Only use readers whose name contains this string
    #[arg(short, long)]
    reader: Option<String>,

    /// Debug level output; set RUST_LOG=trace to see raw APDUs
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    Readers,

    /// Wait for one card, read it and exit
    Read {
        /// Print the card as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Read every card presented until interrupted
    Listen {
        /// Print one JSON object per card
        #[arg(long)]
        json: bool,
    },
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(reader) = cli.reader {
        config.pcsc.reader = Some(reader);
    }
    debug!(?config, "Loaded configuration");

    let manager = PcscDeviceManager::with_config(config.pcsc.clone())?;

    match cli.command {
        Commands::Readers => list_readers(&manager),
        Commands::Read { json } => read_command(&manager, &config, json),
        Commands::Listen { json } => listen_command(&manager, &config, json),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
