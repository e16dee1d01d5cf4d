//! Subcommand implementations

use emvtap::Card;
use emvtap_transport_pcsc::PcscDeviceManager;
use eyre::Context;
use tracing::info;

use crate::config::Config;

/// List readers and whether a card is present
pub(crate) fn list_readers(manager: &PcscDeviceManager) -> eyre::Result<()> {
    let readers = manager.list_readers()?;

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        let status = if reader.has_card() {
            "card present"
        } else {
            "no card"
        };
        println!("{}. {} ({})", i + 1, reader.name(), status);
    }

    Ok(())
}

/// Wait for one card and read it
pub(crate) fn read_command(
    manager: &PcscDeviceManager,
    config: &Config,
    json: bool,
) -> eyre::Result<()> {
    let mut listener = emvtap::Listener::new(manager.discovery(), config.terminal.clone())
        .with_retry_policy(config.retry.clone());
    info!("Waiting for a card");

    let card = listener.next_card().wrap_err("no card read")?;
    print_card(&card, json)
}

/// Print every card tapped until the listener gives up
pub(crate) fn listen_command(
    manager: &PcscDeviceManager,
    config: &Config,
    json: bool,
) -> eyre::Result<()> {
    let listener = emvtap::Listener::new(manager.discovery(), config.terminal.clone())
        .with_retry_policy(config.retry.clone());
    let (cards, handle) = listener.spawn();
    info!("Listening for cards");

    for card in cards.iter() {
        print_card(&card, json)?;
    }

    handle
        .join()
        .map_err(|_| eyre::eyre!("listener thread panicked"))?
        .wrap_err("listener stopped")
}

fn print_card(card: &Card, json: bool) -> eyre::Result<()> {
    if json {
        println!("{}", serde_json::to_string(card)?);
    } else {
        println!("{card}");
    }
    Ok(())
}
