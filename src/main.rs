//! CLI for inspecting a PopSub store
//!
//! Subcommands:
//! - `stats`: entry counts of every collection
//! - `retained`: retained messages matching a topic filter
//! - `subscriptions`: persistent subscriptions, optionally of one client
//! - `pending`: offline queue of a client
//! - `inflight`: unacknowledged messages of a client

use clap::Parser;
use popsub_store::broker::TopicFilter;
use popsub_store::config::load_config_from;
use popsub_store::storage::{StorageService, Store};
use popsub_store::utils::logging;
use serde_json::json;
use tracing::error;

#[derive(Parser)]
#[command(name = "popsub-store", about = "Inspect the persistent state of a PopSub broker")]
struct Cli {
    /// Configuration file, without extension
    #[arg(long, default_value = "config/default")]
    config: String,

    /// Database directory, overrides the configuration
    #[arg(long)]
    path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show how many entries each collection holds
    Stats,
    /// List retained messages whose topic matches FILTER
    Retained {
        #[arg(default_value = "#")]
        filter: String,
    },
    /// List persistent subscriptions
    Subscriptions {
        #[arg(long)]
        client: Option<String>,
    },
    /// Show the offline queue of CLIENT
    Pending { client: String },
    /// Show unacknowledged QoS 1/2 messages of CLIENT
    Inflight { client: String },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        logging::init("info");
        error!("popsub-store failed: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_from(&cli.config)?;
    logging::init(&config.logging.level);
    if let Some(path) = cli.path {
        config.storage.path = path;
    }

    let store = Store::open(&config.storage)?;

    let output = match cli.command {
        Command::Stats => serde_json::to_value(store.stats())?,
        Command::Retained { filter } => {
            let filter = TopicFilter::new(&filter)?;
            let entries: Vec<_> = store
                .retained()
                .matching_entries(&filter)?
                .into_iter()
                .map(|(topic, msg)| {
                    json!({
                        "topic": topic,
                        "qos": msg.qos,
                        "payload": String::from_utf8_lossy(&msg.payload),
                        "timestamp": msg.timestamp,
                    })
                })
                .collect();
            json!(entries)
        }
        Command::Subscriptions { client: Some(client) } => {
            serde_json::to_value(store.retrieve_subscriptions(&client)?)?
        }
        Command::Subscriptions { client: None } => {
            serde_json::to_value(store.retrieve_all_subscriptions()?)?
        }
        Command::Pending { client } => {
            serde_json::to_value(store.retrieve_persisted_publishes(&client)?)?
        }
        Command::Inflight { client } => {
            let records: Vec<_> = store
                .in_flight()
                .records_for_client(&client)?
                .into_iter()
                .map(|(key, evt)| json!({ "key": key, "message": evt }))
                .collect();
            json!(records)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
