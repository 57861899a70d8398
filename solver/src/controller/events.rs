/// Events broadcast from the controller to the control panel.
#[derive(Debug, Clone)]
pub enum SolverEvent {
    /// A single-shot solve was accepted; a search is underway.
    SolvingStarted,
    /// The outstanding single-shot solve finished or was canceled.
    SolvingFinished,
    /// Autoplay flipped by the user, or by the daily-mode terminal path
    /// when no navigable day remains.
    AutoplayChanged(bool),
    /// Error notification.
    Error(String),
}
