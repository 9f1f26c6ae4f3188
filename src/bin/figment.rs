//! figment CLI
//!
//! Stores figments of knowledge: topics with timestamped text entries.

use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use figmentdb::{Config, Store};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// A simple CLI for storing figments of knowledge
#[derive(Parser, Debug)]
#[command(name = "figment")]
#[command(about = "A simple CLI for storing figments of knowledge")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "db.json")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new figment
    #[command(alias = "a")]
    Add {
        /// Topic to file the entry under
        topic: String,

        /// Entry text
        text: String,
    },

    /// Get a figment
    #[command(alias = "g")]
    Get {
        /// The topic to show
        topic: String,
    },

    /// List all figments
    #[command(alias = "l")]
    List,

    /// Remove a figment
    #[command(alias = "r")]
    Remove {
        /// The topic to remove
        topic: String,
    },

    /// Rewrite the database file without deleted or superseded records
    Compact,
}

/// All entries filed under one topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Collection {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    text: String,

    /// Unix millis
    ts: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,figmentdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(message) = run(args) {
        tracing::error!("{}", message);
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = Config::builder().path(&args.db).build();
    let db: Store<Collection> =
        Store::open(config).map_err(|e| format!("Failed to open {}: {}", args.db, e))?;

    match args.command {
        Commands::Add { topic, text } => {
            if topic.trim().is_empty() {
                return Err("Topic is required".to_string());
            }
            let mut collection = db.get(&topic).unwrap_or_default();
            collection.entries.push(Entry {
                text,
                ts: now_millis(),
            });
            db.set(topic, collection).map_err(|e| e.to_string())?;
        }
        Commands::Get { topic } => {
            let collection = db
                .get(&topic)
                .ok_or_else(|| "Topic not found".to_string())?;
            for (i, entry) in collection.entries.iter().enumerate() {
                println!("{}: {}", i + 1, entry.text);
            }
        }
        Commands::List => {
            // Deleted topics only disappear from the file after compaction
            for topic in db.list() {
                if db.contains_key(&topic) {
                    println!("{}", topic);
                }
            }
        }
        Commands::Remove { topic } => {
            if !db.contains_key(&topic) {
                return Err("Topic not found".to_string());
            }
            db.delete(topic).map_err(|e| e.to_string())?;
        }
        Commands::Compact => {
            let stats = db.compact().map_err(|e| e.to_string())?;
            println!(
                "{} records -> {} records ({} bytes -> {} bytes)",
                stats.records_before, stats.records_written, stats.bytes_before, stats.bytes_after
            );
        }
    }

    db.close().map_err(|e| e.to_string())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
