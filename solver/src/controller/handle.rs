use tokio::sync::{mpsc, oneshot};

use super::commands::{SolverCommand, SolverError, SolverStatus};

/// Cheap, cloneable handle to the controller actor. This is the boundary the
/// control panel talks to.
#[derive(Clone)]
pub struct SolverHandle {
    cmd_tx: mpsc::Sender<SolverCommand>,
}

impl SolverHandle {
    pub(crate) fn new(cmd_tx: mpsc::Sender<SolverCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Solve the currently displayed puzzle once. A no-op when no puzzle is
    /// present, it is already solved, or it is not the player's turn; a
    /// repeat call while a solve is outstanding cancels it.
    pub async fn request_solve(&self) -> Result<(), SolverError> {
        let (tx, rx) = oneshot::channel();
        self.send(SolverCommand::RequestSolve { reply: tx }).await?;
        rx.await.map_err(|_| SolverError::ControllerClosed)
    }

    /// Flip continuous solving on or off.
    pub async fn toggle_autoplay(&self) -> Result<(), SolverError> {
        let (tx, rx) = oneshot::channel();
        self.send(SolverCommand::ToggleAutoplay { reply: tx })
            .await?;
        rx.await.map_err(|_| SolverError::ControllerClosed)
    }

    pub async fn status(&self) -> Result<SolverStatus, SolverError> {
        let (tx, rx) = oneshot::channel();
        self.send(SolverCommand::GetStatus { reply: tx }).await?;
        rx.await.map_err(|_| SolverError::ControllerClosed)
    }

    /// Stop the actor and quit the engine worker.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(SolverCommand::Shutdown).await;
    }

    async fn send(&self, cmd: SolverCommand) -> Result<(), SolverError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| SolverError::ControllerClosed)
    }
}
