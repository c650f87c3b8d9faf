//! hide-chat - chat box visibility plugin
//!
//! The plugin logic runs against a simulated host client; the binary
//! replays a scripted session through it or validates a config file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hide_chat::config::ConfigStore;
use hide_chat::sim;

#[derive(Parser)]
#[command(name = "hide-chat")]
#[command(about = "Chat box visibility plugin demo harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted session against a simulated client
    Demo,
    /// Validate configuration
    ValidateConfig {
        /// Config file to validate (default: the standard location)
        #[arg(value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Use RUST_LOG to control the level, e.g. RUST_LOG=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::ValidateConfig { config }) => validate_config(config),
        Some(Commands::Demo) | None => sim::run().await,
    }
}

fn validate_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => ConfigStore::default_path()?,
    };
    println!("Validating config file: {:?}", path);
    if !path.exists() {
        println!("⚠ Warning: file does not exist, defaults will be used");
    }

    let store = ConfigStore::load(Some(path))?;
    let config = store.get();

    println!("✓ Config loaded successfully");
    println!("  hide_chat_box: {}", config.hide_chat_box);
    match config.toggle_hotkey.as_deref() {
        Some(hotkey) => println!("  toggle_hotkey: {}", hotkey),
        None => println!("⚠ Warning: no toggle hotkey bound"),
    }
    println!("  hide_in_pvm: {}", config.hide_in_pvm);
    println!("  hide_in_pvp: {}", config.hide_in_pvp);
    println!(
        "  combat_timeout_seconds: {}",
        config.combat_timeout_seconds
    );
    if !config.hide_in_combat() {
        println!("  (combat hiding disabled: both hide_in_pvm and hide_in_pvp are off)");
    }

    Ok(())
}
