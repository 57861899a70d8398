//! Channel to an external UCI search process.
//!
//! The worker is opaque: it is fed `position fen ...` / `go depth ...` lines
//! and the only output acted upon is `bestmove`. Everything else the process
//! prints is ignored.

pub mod uci;
pub mod worker;

pub use uci::{UciError, UciMessage};
pub use worker::{EngineWorker, WorkerConfig};

use cozy_chess::Move;

/// Commands accepted by the worker's command processor.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// `position fen <FEN>`; no response expected.
    SetPosition { fen: String },
    /// `go depth <n>`; answered asynchronously with a `BestMove` event.
    Go { depth: u8 },
    Stop,
    Quit,
}

/// Events surfaced from the worker's stdout.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// `uciok` or `readyok`.
    Ready,
    BestMove(Move),
    /// The worker closed its stdout.
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine binary not found")]
    BinaryNotFound,
    #[error("failed to spawn engine process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("engine closed during startup")]
    ClosedOnStartup,
    #[error("timed out waiting for engine handshake")]
    HandshakeTimeout,
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine command channel closed")]
    ChannelClosed,
}
