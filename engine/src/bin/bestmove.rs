//! Command-line probe for the engine channel: feed a position, print the
//! best move the worker reports.

use std::path::PathBuf;

use clap::Parser;
use engine::{uci, EngineCommand, EngineEvent, EngineWorker, WorkerConfig};

#[derive(Parser)]
#[command(about = "Query a UCI engine for the best move in a position")]
struct Args {
    /// Position to search, as a FEN string.
    #[arg(long)]
    fen: String,

    /// Fixed search depth.
    #[arg(long, default_value_t = 18)]
    depth: u8,

    /// Path to the engine binary (default: probe common install locations).
    #[arg(long)]
    engine: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut worker = EngineWorker::spawn(WorkerConfig {
        path: args.engine,
        ..Default::default()
    })
    .await?;

    worker
        .send_command(EngineCommand::SetPosition { fen: args.fen })
        .await?;
    worker
        .send_command(EngineCommand::Go { depth: args.depth })
        .await?;

    loop {
        match worker.recv_event().await {
            Some(EngineEvent::BestMove(mv)) => {
                println!("{}", uci::format_uci_move(&mv));
                break;
            }
            Some(EngineEvent::Ready) => {}
            Some(EngineEvent::Closed) | None => {
                anyhow::bail!("engine closed before reporting a move");
            }
        }
    }

    worker.shutdown().await;
    Ok(())
}
