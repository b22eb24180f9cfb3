use clap::Parser;
use miette::{IntoDiagnostic, Result};
use splitpay::application::engine::PaymentRequestEngine;
use splitpay::config::{DEFAULT_MAX_CONFLICT_RETRIES, EngineConfig};
use splitpay::domain::ports::PaymentRequestStoreBox;
use splitpay::domain::split::DEFAULT_ROUND_TO;
use splitpay::infrastructure::event_bus::EventBus;
use splitpay::infrastructure::in_memory::InMemoryPaymentRequestStore;
use splitpay::interfaces::csv::request_writer::RequestWriter;
use splitpay::interfaces::jsonl::command_reader::CommandReader;
use splitpay::interfaces::script::ScriptRunner;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input script of payment request commands, one JSON object per line
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "SPLITPAY_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Rounding step for even splits
    #[arg(long, env = "SPLITPAY_ROUND_TO", default_value_t = DEFAULT_ROUND_TO)]
    round_to: u64,

    /// Retries after losing a concurrent update race
    #[arg(long, env = "SPLITPAY_MAX_CONFLICT_RETRIES", default_value_t = DEFAULT_MAX_CONFLICT_RETRIES)]
    max_conflict_retries: u32,

    /// Report one row per participant instead of one per request
    #[arg(long)]
    participants: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn open_store(db_path: Option<PathBuf>) -> Result<PaymentRequestStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = splitpay::infrastructure::rocksdb::RocksDBStore::open(path)
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryPaymentRequestStore::new()))
        }
        None => Ok(Box::new(InMemoryPaymentRequestStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = EngineConfig {
        round_to: cli.round_to,
        max_conflict_retries: cli.max_conflict_retries,
    };
    let store = open_store(cli.db_path)?;
    let bus = EventBus::new();
    let logger = bus.spawn_logger();
    let engine = PaymentRequestEngine::new(store, Box::new(bus.clone()), config);

    // Process commands
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    {
        let mut runner = ScriptRunner::new(&engine);
        for command in reader.commands() {
            match command {
                Ok(command) => {
                    if let Err(e) = runner.run(command).await {
                        error!(kind = ?e.kind(), "Error processing command: {}", e);
                    }
                }
                Err(e) => {
                    error!("Error reading command: {}", e);
                }
            }
        }
    }

    // Collect final state from engine
    let requests = engine.into_results().await.into_diagnostic()?;
    drop(bus);
    logger.await.into_diagnostic()?;

    // Output final state
    let stdout = io::stdout();
    let mut writer = RequestWriter::new(stdout.lock());
    if cli.participants {
        writer.write_participants(&requests).into_diagnostic()?;
    } else {
        writer.write_requests(&requests).into_diagnostic()?;
    }

    Ok(())
}
