//! Distributed Cache - interactive shell
//!
//! Reads commands from stdin and runs them against one in-process cache.
//!
//! ```text
//! set <key> <value> [ttl_ms]
//! get <key>
//! del <key>
//! len
//! stats
//! quit
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use distributed_cache::{spawn_cleanup_task, Cache, Config};

/// One parsed shell line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Set {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
    Get(String),
    Del(String),
    Len,
    Stats,
    Quit,
}

impl Command {
    fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let command = match parts.as_slice() {
            [] => return Ok(None),
            ["set", key, value] => Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                ttl: None,
            },
            ["set", key, value, ttl] => Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                ttl: Some(Duration::from_millis(
                    ttl.parse().with_context(|| format!("invalid ttl_ms: {ttl}"))?,
                )),
            },
            ["get", key] => Command::Get(key.to_string()),
            ["del", key] => Command::Del(key.to_string()),
            ["len"] => Command::Len,
            ["stats"] => Command::Stats,
            ["quit"] | ["exit"] => Command::Quit,
            _ => bail!("unrecognized command: {line}"),
        };
        Ok(Some(command))
    }
}

/// Main entry point for the cache shell.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache with configured parameters
/// 4. Start background TTL cleanup task
/// 5. Serve stdin commands until EOF, `quit` or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distributed_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: capacity={}, policy={}, default_ttl={:?}, cleanup_interval={:?}",
        config.capacity, config.policy, config.default_ttl, config.cleanup_interval
    );

    let cache: Arc<Cache<String, String>> = Arc::new(Cache::from_config(&config)?);
    let cleanup_handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);

    tokio::select! {
        result = run_shell(&cache, config.default_ttl) => result?,
        _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down..."),
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
    Ok(())
}

async fn run_shell(cache: &Cache<String, String>, default_ttl: Duration) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let reply = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(cache, command, default_ttl)?,
            Err(err) => format!("ERR {err}"),
        };
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}

fn execute(
    cache: &Cache<String, String>,
    command: Command,
    default_ttl: Duration,
) -> anyhow::Result<String> {
    let reply = match command {
        Command::Set { key, value, ttl } => {
            cache.set(key, value, ttl.unwrap_or(default_ttl));
            "OK".to_string()
        }
        Command::Get(key) => cache.get(&key).unwrap_or_else(|| "(nil)".to_string()),
        Command::Del(key) => u8::from(cache.delete(&key)).to_string(),
        Command::Len => cache.len().to_string(),
        Command::Stats => serde_json::to_string(&cache.stats())?,
        Command::Quit => String::new(),
    };
    Ok(reply)
}
