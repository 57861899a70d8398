use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;

use crate::uci::{parse_uci_message, UciMessage};
use crate::{EngineCommand, EngineError, EngineEvent};

/// Configuration for the worker process.
#[derive(Debug, Clone, Default)]
pub struct WorkerConfig {
    /// Explicit path to the engine binary. When unset, conventional install
    /// locations are probed.
    pub path: Option<PathBuf>,
    pub threads: Option<u32>,
    pub hash_mb: Option<u32>,
}

/// A spawned search process plus the channels to talk to it.
///
/// Three tasks run against the process: a stdout reader (lines → events), a
/// stdin writer, and a command processor rendering [`EngineCommand`]s to wire
/// lines. There is no search timeout: if the process never answers a `go`,
/// the consumer waits until it cancels on its own terms.
pub struct EngineWorker {
    process: Child,
    command_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

impl EngineWorker {
    /// Spawn the worker and complete the `uci`/`uciok` handshake.
    #[tracing::instrument(level = "info")]
    pub async fn spawn(config: WorkerConfig) -> Result<Self, EngineError> {
        let path = match config.path {
            Some(ref p) => p.clone(),
            None => probe_engine_path().ok_or(EngineError::BinaryNotFound)?,
        };
        tracing::info!("Spawning engine worker: {:?}", path);

        let mut process = tokio::process::Command::new(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(EngineError::Spawn)?;

        let mut stdin = process.stdin.take().ok_or(EngineError::ClosedOnStartup)?;
        let stdout = process.stdout.take().ok_or(EngineError::ClosedOnStartup)?;

        stdin.write_all(b"uci\n").await?;
        stdin.flush().await?;

        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>(32);

        // Stdout reader task.
        let reader_event_tx = event_tx.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        tracing::warn!("Engine stdout EOF");
                        let _ = reader_event_tx.send(EngineEvent::Closed).await;
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        tracing::trace!("UCI << {}", trimmed);

                        let event = match parse_uci_message(trimmed) {
                            Ok(UciMessage::UciOk) | Ok(UciMessage::ReadyOk) => EngineEvent::Ready,
                            Ok(UciMessage::BestMove(mv)) => {
                                tracing::debug!("Received bestmove: {:?}", mv);
                                EngineEvent::BestMove(mv)
                            }
                            Err(_) => continue,
                        };

                        if reader_event_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Error reading engine stdout: {}", e);
                        let _ = reader_event_tx.send(EngineEvent::Closed).await;
                        break;
                    }
                }
            }
        });

        // Wait for uciok before accepting commands.
        let mut event_rx = event_rx;
        let handshake = tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
            while let Some(event) = event_rx.recv().await {
                match event {
                    EngineEvent::Ready => return Ok(()),
                    EngineEvent::Closed => return Err(EngineError::ClosedOnStartup),
                    _ => {}
                }
            }
            Err(EngineError::ClosedOnStartup)
        })
        .await;

        match handshake {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(EngineError::HandshakeTimeout),
        }

        if let Some(threads) = config.threads {
            let threads = threads.clamp(1, 16);
            stdin
                .write_all(format!("setoption name Threads value {}\n", threads).as_bytes())
                .await?;
        }
        if let Some(hash_mb) = config.hash_mb {
            let hash_mb = hash_mb.clamp(1, 2048);
            stdin
                .write_all(format!("setoption name Hash value {}\n", hash_mb).as_bytes())
                .await?;
        }
        stdin.write_all(b"isready\n").await?;
        stdin.flush().await?;

        // Stdin writer task.
        let (stdin_tx, mut stdin_rx) = mpsc::channel::<String>(32);
        tokio::spawn(async move {
            while let Some(cmd) = stdin_rx.recv().await {
                tracing::trace!("UCI >> {}", cmd.trim());
                if let Err(e) = stdin.write_all(cmd.as_bytes()).await {
                    tracing::error!("Failed to write to engine stdin: {}", e);
                    break;
                }
                if let Err(e) = stdin.flush().await {
                    tracing::error!("Failed to flush engine stdin: {}", e);
                    break;
                }
            }
        });

        // Command processor task.
        let (command_tx, mut command_rx) = mpsc::channel::<EngineCommand>(32);
        let writer_tx = stdin_tx.clone();
        tokio::spawn(async move {
            while let Some(cmd) = command_rx.recv().await {
                let line = match cmd {
                    EngineCommand::SetPosition { ref fen } => {
                        tracing::debug!("Setting position: {}", fen);
                        format!("position fen {}\n", fen)
                    }
                    EngineCommand::Go { depth } => {
                        tracing::debug!("Starting search to depth {}", depth);
                        format!("go depth {}\n", depth)
                    }
                    EngineCommand::Stop => "stop\n".to_string(),
                    EngineCommand::Quit => {
                        let _ = writer_tx.send("quit\n".to_string()).await;
                        break;
                    }
                };
                if writer_tx.send(line).await.is_err() {
                    break;
                }
            }
        });

        tracing::info!("Engine worker ready");
        Ok(Self {
            process,
            command_tx,
            event_rx,
        })
    }

    /// Queue a command for the worker.
    pub async fn send_command(&self, cmd: EngineCommand) -> Result<(), EngineError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Receive the next event from the worker.
    pub async fn recv_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    /// Quit the worker, waiting briefly before killing the process.
    pub async fn shutdown(mut self) {
        let _ = self.send_command(EngineCommand::Quit).await;
        let _ = tokio::time::timeout(Duration::from_secs(1), self.process.wait()).await;
        let _ = self.process.kill().await;
    }
}

/// Probe conventional install locations for a UCI engine binary.
fn probe_engine_path() -> Option<PathBuf> {
    let candidates = [
        "/usr/local/bin/stockfish",
        "/usr/bin/stockfish",
        "/opt/homebrew/bin/stockfish",
        "/usr/games/stockfish",
        "stockfish", // in PATH
    ];

    for path_str in candidates {
        let path = Path::new(path_str);
        if path.exists() || path_str == "stockfish" {
            if std::process::Command::new(path_str)
                .arg("--help")
                .output()
                .is_ok()
            {
                return Some(PathBuf::from(path_str));
            }
        }
    }

    None
}
