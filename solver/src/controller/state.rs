use std::sync::Arc;

use cozy_chess::Move;
use engine::uci::{format_piece, format_square};
use engine::{EngineCommand, EngineError, EngineEvent, EngineWorker};
use tokio::sync::mpsc;

use super::commands::SolverStatus;
use crate::board::{BoardAdapter, HostMove, START_FEN};
use crate::config::SolverConfig;
use crate::status::{classify_mode, parse_rush_score, PuzzleMode, PuzzleStatusAdapter};

/// Watermark sentinel: no rush score has been observed yet, so no comparison
/// against it may ever read as "puzzle solved".
const SCORE_UNKNOWN: u32 = u32::MAX;

/// Internal mutable state, owned entirely by the controller actor. No locks.
pub(crate) struct SolverState {
    pub board: Arc<dyn BoardAdapter>,
    pub status: Arc<dyn PuzzleStatusAdapter>,
    pub config: SolverConfig,
    pub engine: Option<EngineWorker>,
    /// Engine bring-up happened; guards against doing it twice.
    pub initialized: bool,
    /// A single-shot solve is outstanding.
    pub solve_once: bool,
    /// Continuous solving is engaged.
    pub autoplay: bool,
    /// Mode of the active puzzle session; cleared when the session ends.
    pub mode: Option<PuzzleMode>,
    pub last_known_score: u32,
    // Keeps the observed-move tap open even if the embedder drops the
    // Interceptor without installing a proxy.
    _tap_keepalive: mpsc::UnboundedSender<HostMove>,
}

impl SolverState {
    pub fn new(
        board: Arc<dyn BoardAdapter>,
        status: Arc<dyn PuzzleStatusAdapter>,
        config: SolverConfig,
        tap_keepalive: mpsc::UnboundedSender<HostMove>,
    ) -> Self {
        Self {
            board,
            status,
            config,
            engine: None,
            initialized: false,
            solve_once: false,
            autoplay: false,
            mode: None,
            last_known_score: SCORE_UNKNOWN,
            _tap_keepalive: tap_keepalive,
        }
    }

    pub fn status_snapshot(&self) -> SolverStatus {
        SolverStatus {
            solve_once: self.solve_once,
            autoplay: self.autoplay,
            initialized: self.initialized,
            mode: self.mode,
            puzzle_present: self.puzzle_present(),
            last_known_score: self.last_known_score,
        }
    }

    /// A search result is wanted iff some intent is still live. Stale
    /// `bestmove` notifications arriving after cancellation fail this check
    /// and get dropped.
    pub fn wants_engine_reply(&self) -> bool {
        self.solve_once || self.autoplay
    }

    /// The puzzle marker alone does not guarantee an active, non-reset
    /// puzzle: the board must also have left the starting position.
    pub fn puzzle_present(&self) -> bool {
        self.status.puzzle_marker_present() && self.board.position() != START_FEN
    }

    pub fn player_turn(&self) -> bool {
        self.board.side_to_move() == self.board.playing_as()
    }

    /// Mode of the active session, classified on first use.
    pub fn session_mode(&mut self) -> PuzzleMode {
        if let Some(mode) = self.mode {
            return mode;
        }
        let mode = classify_mode(self.status.as_ref());
        self.mode = Some(mode);
        mode
    }

    /// The active puzzle completed (or was abandoned); the next one will be
    /// classified afresh.
    pub fn end_session(&mut self) {
        self.mode = None;
    }

    /// Completion check for the session's mode.
    ///
    /// In rush mode this compares the displayed counter against the
    /// watermark and bumps it when the counter moved up, so a solved reading
    /// is returned exactly once per increment.
    pub fn puzzle_solved(&mut self) -> bool {
        match self.session_mode() {
            PuzzleMode::Rush => {
                let Some(text) = self.status.rush_score() else {
                    return false;
                };
                match parse_rush_score(&text) {
                    Some(score) if score > self.last_known_score => {
                        self.last_known_score = score;
                        true
                    }
                    Some(_) => false,
                    None => {
                        tracing::warn!(text = %text, "Unreadable rush counter");
                        false
                    }
                }
            }
            PuzzleMode::Daily => self.status.daily_solved_banner(),
            PuzzleMode::Normal => self.status.next_puzzle_control().is_enabled(),
        }
    }

    /// Re-read the rush counter so completion is judged against the score as
    /// it stood when the search began.
    fn refresh_watermark(&mut self) {
        if let Some(text) = self.status.rush_score() {
            match parse_rush_score(&text) {
                Some(score) => self.last_known_score = score,
                None => tracing::warn!(text = %text, "Unreadable rush counter"),
            }
        }
    }

    /// Bring up the engine worker on first use.
    pub async fn ensure_initialized(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Ok(());
        }
        let worker = EngineWorker::spawn(self.config.worker_config()).await?;
        self.engine = Some(worker);
        self.initialized = true;
        Ok(())
    }

    /// Feed the current position to the worker and start a fixed-depth
    /// search. The reply arrives later as an engine event.
    pub async fn start_search(&mut self) -> Result<(), EngineError> {
        self.ensure_initialized().await?;
        self.refresh_watermark();

        let fen = self.board.position();
        let engine = self.engine.as_ref().ok_or(EngineError::ChannelClosed)?;
        engine.send_command(EngineCommand::SetPosition { fen }).await?;
        engine
            .send_command(EngineCommand::Go {
                depth: self.config.search_depth,
            })
            .await?;
        Ok(())
    }

    pub async fn next_engine_event(&mut self) -> Option<EngineEvent> {
        match self.engine.as_mut() {
            Some(engine) => engine.recv_event().await,
            None => std::future::pending().await,
        }
    }

    /// Find the host legal move matching an engine move and tag it for
    /// submission. `None` when nothing matches; the caller treats that as a
    /// silent no-op, since it cannot occur for a well-formed engine reply.
    pub fn translate(&self, mv: &Move) -> Option<HostMove> {
        let from = format_square(mv.from);
        let to = format_square(mv.to);
        let promotion = mv.promotion.map(format_piece);

        let mut host_mv = self
            .board
            .legal_moves()
            .into_iter()
            .find(|m| {
                m.from == from
                    && m.to == to
                    && (promotion.is_none() || m.promotion == promotion)
            })?;

        host_mv.user_generated = true;
        host_mv.auto_played = true;
        Some(host_mv)
    }
}
