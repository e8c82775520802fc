//! tapkey entry point.
//!
//! Wires the mapping store, key injector, console prompt and tag reader
//! together, then runs the dispatch loop until the reader closes or the
//! operator presses Ctrl+C.
//!
//! # Startup
//!
//! ```text
//! main()
//!  └─ Cli::parse()              -- flags, each with a TAPKEY_* env fallback
//!  └─ load_config_from()        -- TOML file, defaults for anything missing
//!  └─ tracing_subscriber init   -- RUST_LOG wins over the configured level
//!  └─ TomlMappingStore::open()  -- degrades to in-memory on a broken file
//!  └─ TagReader::start()        -- FIFO or TCP feed
//!  └─ event_loop::run()         -- one event at a time
//! ```
//!
//! # Shutdown
//!
//! Ctrl+C closes the prompt first (so a pending question resolves as
//! "skipped" instead of blocking), then stops the loop.  The process exits 0.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tapkey_core::{ActionRegistry, Platform};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tapkey::application::assign_action::ActionPrompt;
use tapkey::application::dispatch_tag::DispatchEngine;
use tapkey::event_loop;
use tapkey::infrastructure::{
    key_injection,
    prompt::ConsolePrompt,
    reader::{self, ReaderSource, TagReader},
    storage::{
        config::{config_file_path, load_config_from, AppConfig},
        TomlMappingStore,
    },
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Turns NFC tag taps into keypresses.
///
/// Every flag overrides the matching setting in the config file.
#[derive(Debug, Parser)]
#[command(
    name = "tapkey",
    about = "Map NFC tags to keyboard keys and press them on tap",
    version
)]
struct Cli {
    /// Config file.  Defaults to `config.toml` in the platform config directory.
    #[arg(long, env = "TAPKEY_CONFIG")]
    config: Option<PathBuf>,

    /// Mapping file (overrides `[storage] mappings_path`).
    #[arg(long, env = "TAPKEY_MAPPINGS")]
    mappings: Option<PathBuf>,

    /// Tag feed: `fifo:<path>` or `tcp:<host:port>` (overrides `[reader] source`).
    #[arg(long, env = "TAPKEY_READER")]
    reader: Option<String>,

    /// Key-injection backend: auto, macos, windows or linux.
    #[arg(long, env = "TAPKEY_PLATFORM")]
    platform: Option<String>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, env = "TAPKEY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config file and applies the flag overrides.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let path = match self.config {
            Some(path) => path,
            None => config_file_path().context("cannot locate the config directory")?,
        };
        let mut config = load_config_from(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;

        if let Some(mappings) = self.mappings {
            config.storage.mappings_path = Some(mappings);
        }
        if let Some(reader) = self.reader {
            config.reader.source = reader;
        }
        if let Some(platform) = self.platform {
            config.injection.platform = platform;
        }
        if let Some(level) = self.log_level {
            config.general.log_level = level;
        }
        Ok(config)
    }
}

/// Operator-facing summary printed once the store is loaded.
fn startup_banner(
    platform: Platform,
    store: &TomlMappingStore,
    source: &ReaderSource,
    registry: &ActionRegistry,
) -> String {
    let durability = if store.is_durable() {
        ""
    } else {
        " [in-memory only: fix or remove the file to save new mappings]"
    };
    format!(
        "tapkey {}\n  platform : {platform} (via {})\n  mappings : {} ({} loaded){durability}\n  \
         reader   : {source}\n  actions  : {}\n",
        env!("CARGO_PKG_VERSION"),
        key_injection::helper_program(platform),
        store.path().display(),
        store.len(),
        registry.known_action_names().join(", "),
    )
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start the tokio runtime")?;
    let result = runtime.block_on(run(Cli::parse()));
    // The stdin reader sits in a blocking read that never returns on its own.
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_app_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    // Logs go to stderr so they do not interleave with the prompt on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Platform, registry and store ──────────────────────────────────────────
    let platform = config.platform()?;
    let registry = ActionRegistry::new(platform);
    let store = TomlMappingStore::open(config.mappings_path()?);
    store.warn_unknown_actions(&registry);

    let source = config.reader_source()?;
    println!("{}", startup_banner(platform, &store, &source, &registry));

    // ── Reader feed ───────────────────────────────────────────────────────────
    let events = reader::for_source(&source)
        .start()
        .await
        .with_context(|| format!("cannot start tag reader {source}"))?;

    // ── Engine ────────────────────────────────────────────────────────────────
    let prompt = Arc::new(ConsolePrompt::stdio());
    let mut engine = DispatchEngine::new(
        store,
        registry,
        Arc::clone(&prompt) as Arc<dyn ActionPrompt>,
        key_injection::for_platform(platform),
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                prompt.close();
                let _ = stop_tx.send(true);
            }
            Err(e) => {
                error!("failed to listen for Ctrl+C: {e}");
                // Dropping stop_tx would stop the loop; keep it alive.
                std::future::pending::<()>().await;
            }
        }
    });

    info!("ready; tap a tag");
    let (reason, stats) = event_loop::run(&mut engine, events, stop_rx).await;

    info!(
        ?reason,
        dispatched = stats.dispatched,
        skipped = stats.skipped,
        failed = stats.failed,
        mappings = engine.store().len(),
        "tapkey stopped"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
