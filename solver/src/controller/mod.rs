//! The puzzle-solving controller: an actor task owning the intent flags,
//! the rush-score watermark, the lazily spawned engine worker, and the
//! session's puzzle-mode classification.

pub mod actor;
pub mod commands;
pub mod events;
pub mod handle;
pub mod state;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::board::BoardAdapter;
use crate::config::SolverConfig;
use crate::intercept::Interceptor;
use crate::status::PuzzleStatusAdapter;

use actor::run_solver_actor;
pub use commands::{SolverError, SolverStatus};
pub use events::SolverEvent;
pub use handle::SolverHandle;
use state::SolverState;

/// A running controller and its attachment points: the command handle for
/// the control panel, the interceptor for the host's move pipeline, and the
/// event stream the panel reflects into its buttons.
pub struct Solver {
    pub handle: SolverHandle,
    pub interceptor: Interceptor,
    pub events: broadcast::Receiver<SolverEvent>,
}

/// Spawn the controller actor against the injected host adapters. The engine
/// worker is not spawned here: it comes up lazily on the first solve.
pub fn spawn(
    board: Arc<dyn BoardAdapter>,
    status: Arc<dyn PuzzleStatusAdapter>,
    config: SolverConfig,
) -> Solver {
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (observed_tx, observed_rx) = mpsc::unbounded_channel();
    let (event_tx, events) = broadcast::channel(64);

    let state = SolverState::new(board, status, config, observed_tx.clone());
    let id = Uuid::new_v4().to_string();
    tokio::spawn(run_solver_actor(id, state, cmd_rx, observed_rx, event_tx));

    Solver {
        handle: SolverHandle::new(cmd_tx),
        interceptor: Interceptor::new(observed_tx),
        events,
    }
}
