//! codrone - CoDrone EDU capture replay
//!
//! Feeds a captured byte stream through the link receiver and prints every
//! decoded frame.

use clap::Parser;
use codrone_link::config::parse_start_bytes;
use codrone_link::{
    AckTracker, Config, Dispatcher, ErrorKind, HandlerError, Received, Receiver, ReceiverStats,
};
use codrone_protocol::Registry;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codrone")]
#[command(about = "Replay a CoDrone EDU capture and print decoded telemetry")]
#[command(version)]
struct Cli {
    /// Capture file (stdin if omitted)
    input: Option<PathBuf>,

    /// Input is hex text; whitespace, commas and 0x prefixes are ignored
    #[arg(long)]
    hex: bool,

    /// Print one JSON object per decoded frame
    #[arg(long)]
    json: bool,

    /// Start bytes, e.g. "0x0A,0x55" (overrides configuration)
    #[arg(long)]
    start_bytes: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration (from file if CODRONE_CONFIG is set, then env overrides)
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            if std::env::var("CODRONE_CONFIG").is_ok() {
                tracing::error!("Failed to load config: {}", e);
                return Err(e.into());
            }
            tracing::info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(ref value) = cli.start_bytes {
        match parse_start_bytes(value) {
            Some(bytes) => config.receiver.start_bytes = bytes,
            None => {
                eprintln!("{}: invalid start bytes '{}'", "Error".red(), value);
                std::process::exit(2);
            }
        }
    }
    config.validate()?;

    tracing::debug!(
        "start bytes {:#04x} {:#04x}, max payload {}, frame timeout {:?}",
        config.receiver.start_bytes[0],
        config.receiver.start_bytes[1],
        config.receiver.max_payload_size,
        config.receiver.frame_timeout()
    );

    let json = cli.json;
    let dispatcher = Dispatcher::new().on_any(move |received| print_frame(received, json));
    let mut receiver = Receiver::new(
        config.receiver.clone(),
        Arc::new(Registry::standard()),
        dispatcher,
        Arc::new(AckTracker::new()),
    );

    if cli.hex {
        let text = match &cli.input {
            Some(path) => tokio::fs::read_to_string(path).await?,
            None => {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                text
            }
        };
        for byte in parse_hex(&text)? {
            receiver.feed_byte(byte);
        }
    } else {
        match &cli.input {
            Some(path) => receiver.run(tokio::fs::File::open(path).await?).await?,
            None => receiver.run(tokio::io::stdin()).await?,
        }
    }

    print_summary(receiver.stats());
    Ok(())
}

fn print_frame(received: &Received, json: bool) -> Result<(), HandlerError> {
    if json {
        let line =
            serde_json::to_string(received).map_err(|e| HandlerError::Failed(e.to_string()))?;
        println!("{}", line);
    } else {
        let header = &received.header;
        println!(
            "{:?} -> {:?} {} {:?}",
            header.from,
            header.to,
            received.message.shape_name().cyan(),
            received.message
        );
    }
    Ok(())
}

fn print_summary(stats: &ReceiverStats) {
    eprintln!(
        "{} {} bytes, {} frames decoded, {} acks, {} ignored",
        "Summary:".bold(),
        stats.bytes,
        stats.frames_dispatched.to_string().green(),
        stats.acks,
        stats.frames_ignored
    );

    let dropped = stats.total_dropped();
    if dropped > 0 {
        let detail: Vec<String> = ErrorKind::ALL
            .iter()
            .map(|kind| format!("{} {}", stats.dropped(*kind), kind))
            .collect();
        eprintln!(
            "{} {} ({})",
            "Dropped:".bold(),
            dropped.to_string().yellow(),
            detail.join(", ")
        );
    }

    if stats.handler_failures > 0 {
        eprintln!(
            "{} {}",
            "Handler failures:".bold(),
            stats.handler_failures.to_string().red()
        );
    }
}

/// Decodes hex text such as `0A 55 40 08` or `0x0a,0x55`.
fn parse_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits: String = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .collect();
    hex::decode(digits)
}
