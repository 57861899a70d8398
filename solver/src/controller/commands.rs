use tokio::sync::oneshot;

use crate::status::PuzzleMode;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SolverError {
    #[error("controller task closed")]
    ControllerClosed,
}

/// Commands sent to the controller actor by the control panel. Each embeds
/// a oneshot acknowledged once the command has been acted on.
pub enum SolverCommand {
    /// Solve the currently displayed puzzle once.
    RequestSolve { reply: oneshot::Sender<()> },
    /// Flip continuous solving on or off.
    ToggleAutoplay { reply: oneshot::Sender<()> },
    GetStatus {
        reply: oneshot::Sender<SolverStatus>,
    },
    Shutdown,
}

/// Point-in-time view of the controller, for the panel and for tests.
#[derive(Debug, Clone)]
pub struct SolverStatus {
    pub solve_once: bool,
    pub autoplay: bool,
    /// Engine worker has been brought up.
    pub initialized: bool,
    /// Mode of the active puzzle session, once classified.
    pub mode: Option<PuzzleMode>,
    pub puzzle_present: bool,
    /// Rush solved-counter watermark; `u32::MAX` until first observed.
    pub last_known_score: u32,
}
