use cozy_chess::Move;
use engine::uci::format_uci_move;
use engine::EngineEvent;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Duration;
use tracing::Instrument;

use super::commands::SolverCommand;
use super::events::SolverEvent;
use super::state::SolverState;
use crate::board::HostMove;
use crate::status::PuzzleMode;

/// The controller actor loop. Owns all mutable state and processes panel
/// commands, observed host moves, and engine events sequentially.
pub(crate) async fn run_solver_actor(
    id: String,
    state: SolverState,
    cmd_rx: mpsc::Receiver<SolverCommand>,
    observed_rx: mpsc::UnboundedReceiver<HostMove>,
    event_tx: broadcast::Sender<SolverEvent>,
) {
    run_solver_actor_inner(state, cmd_rx, observed_rx, event_tx)
        .instrument(tracing::info_span!("solver", id = %id))
        .await;
}

async fn run_solver_actor_inner(
    mut state: SolverState,
    mut cmd_rx: mpsc::Receiver<SolverCommand>,
    mut observed_rx: mpsc::UnboundedReceiver<HostMove>,
    event_tx: broadcast::Sender<SolverEvent>,
) {
    tracing::info!("Controller actor started");

    loop {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SolverCommand::Shutdown) | None => {
                        tracing::info!("Controller actor shutting down");
                        if let Some(engine) = state.engine.take() {
                            engine.shutdown().await;
                        }
                        break;
                    }
                    Some(cmd) => handle_command(&mut state, cmd, &event_tx).await,
                }
            }

            Some(mv) = observed_rx.recv() => {
                handle_observed_move(&mut state, mv, &event_tx).await;
            }

            Some(event) = state.next_engine_event() => {
                handle_engine_event(&mut state, event, &event_tx).await;
            }
        }
    }

    tracing::info!("Controller actor exited");
}

async fn handle_command(
    state: &mut SolverState,
    cmd: SolverCommand,
    event_tx: &broadcast::Sender<SolverEvent>,
) {
    match cmd {
        SolverCommand::RequestSolve { reply } => {
            request_solve(state, event_tx).await;
            let _ = reply.send(());
        }
        SolverCommand::ToggleAutoplay { reply } => {
            toggle_autoplay(state, event_tx).await;
            let _ = reply.send(());
        }
        SolverCommand::GetStatus { reply } => {
            let _ = reply.send(state.status_snapshot());
        }
        SolverCommand::Shutdown => unreachable!(),
    }
}

async fn request_solve(state: &mut SolverState, event_tx: &broadcast::Sender<SolverEvent>) {
    if state.solve_once {
        // A second request while one is outstanding cancels it; the search
        // result, if it ever arrives, will be discarded.
        tracing::info!("Canceling outstanding solve");
        state.solve_once = false;
        let _ = event_tx.send(SolverEvent::SolvingFinished);
        return;
    }

    if !state.puzzle_present() {
        tracing::debug!("Solve requested but no puzzle is displayed");
        return;
    }
    if state.puzzle_solved() {
        tracing::debug!("Solve requested but the puzzle is already solved");
        return;
    }
    if !state.player_turn() {
        tracing::debug!("Solve requested out of turn");
        return;
    }

    match state.start_search().await {
        Ok(()) => {
            state.solve_once = true;
            let _ = event_tx.send(SolverEvent::SolvingStarted);
        }
        Err(e) => {
            tracing::error!("Failed to start search: {}", e);
            let _ = event_tx.send(SolverEvent::Error(e.to_string()));
        }
    }
}

async fn toggle_autoplay(state: &mut SolverState, event_tx: &broadcast::Sender<SolverEvent>) {
    state.autoplay = !state.autoplay;
    tracing::info!(autoplay = state.autoplay, "Autoplay toggled");
    let _ = event_tx.send(SolverEvent::AutoplayChanged(state.autoplay));

    if !state.autoplay {
        return;
    }
    if !state.puzzle_present() {
        // Nothing displayed yet; the next navigation brings a puzzle and
        // with it an observed move to react to.
        return;
    }
    if state.puzzle_solved() {
        advance_to_next(state, event_tx).await;
        return;
    }
    if state.player_turn() {
        if let Err(e) = state.start_search().await {
            tracing::error!("Failed to start search: {}", e);
            let _ = event_tx.send(SolverEvent::Error(e.to_string()));
        }
    }
}

/// A move went through the host's pipeline without the controller's tag:
/// the host advanced the board on its own and the new position needs a
/// fresh evaluation, if solving is still wanted.
async fn handle_observed_move(
    state: &mut SolverState,
    mv: HostMove,
    event_tx: &broadcast::Sender<SolverEvent>,
) {
    tracing::debug!(from = %mv.from, to = %mv.to, "Host move observed");
    if !state.wants_engine_reply() {
        return;
    }
    if let Err(e) = state.start_search().await {
        tracing::error!("Failed to start search: {}", e);
        let _ = event_tx.send(SolverEvent::Error(e.to_string()));
    }
}

async fn handle_engine_event(
    state: &mut SolverState,
    event: EngineEvent,
    event_tx: &broadcast::Sender<SolverEvent>,
) {
    match event {
        EngineEvent::BestMove(mv) => {
            if !state.wants_engine_reply() {
                tracing::debug!(mv = %format_uci_move(&mv), "Discarding stale best move");
                return;
            }
            apply_best_move(state, mv, event_tx).await;
        }
        EngineEvent::Ready => {}
        EngineEvent::Closed => {
            tracing::warn!("Engine worker closed its output");
            // Drop the dead worker so the event stream stops polling it.
            // No respawn: the next solve attempt reports the error.
            state.engine = None;
            let _ = event_tx.send(SolverEvent::Error("engine worker closed".to_string()));
        }
    }
}

async fn apply_best_move(
    state: &mut SolverState,
    mv: Move,
    event_tx: &broadcast::Sender<SolverEvent>,
) {
    let Some(host_mv) = state.translate(&mv) else {
        // Should not occur for a well-formed engine reply; do not submit.
        tracing::warn!(mv = %format_uci_move(&mv), "No legal host move matches engine move");
        return;
    };

    if let Err(e) = state.board.submit_move(&host_mv) {
        tracing::warn!("Host rejected submitted move: {}", e);
        return;
    }

    // Let host-side UI state (score counter, banners) settle before reading.
    tokio::time::sleep(Duration::from_millis(state.config.settle_delay_ms)).await;

    if state.puzzle_solved() {
        if state.solve_once {
            state.solve_once = false;
            let _ = event_tx.send(SolverEvent::SolvingFinished);
        }
        if state.autoplay {
            advance_to_next(state, event_tx).await;
        }
        state.end_session();
    }
    // Not solved: stay idle. The opponent's reply will come back through
    // the interception tap and trigger the next search.
}

async fn advance_to_next(state: &mut SolverState, event_tx: &broadcast::Sender<SolverEvent>) {
    match state.session_mode() {
        // The host rolls rush puzzles forward on its own.
        PuzzleMode::Rush => {}
        PuzzleMode::Normal => {
            if state.status.next_puzzle_control().is_enabled() {
                tracing::info!("Advancing to next puzzle");
                state.status.advance_puzzle();
            }
        }
        PuzzleMode::Daily => advance_daily(state, event_tx).await,
    }
}

/// Walk forward day by day until an unsolved daily puzzle loads. Runs out of
/// navigable days: autoplay is switched off (terminal for this mode).
async fn advance_daily(state: &mut SolverState, event_tx: &broadcast::Sender<SolverEvent>) {
    while state.status.daily_solved_banner() {
        if !state.status.next_day_control().is_enabled() {
            tracing::info!("No further day to navigate to; disabling autoplay");
            state.autoplay = false;
            let _ = event_tx.send(SolverEvent::AutoplayChanged(false));
            return;
        }

        state.status.advance_day();
        tokio::time::sleep(Duration::from_millis(state.config.daily_nav_delay_ms)).await;

        if !state.status.daily_solved_banner() {
            if let Err(e) = state.start_search().await {
                tracing::error!("Failed to start search: {}", e);
                let _ = event_tx.send(SolverEvent::Error(e.to_string()));
            }
            return;
        }
    }
}
