//! Injected view of the host application's board and move pipeline.
//! The host owns the game; the controller only reads it and submits moves
//! back through the host's own (intercepted) move function.

/// The canonical starting position. A board showing this position is never a
/// puzzle, whatever else the host is displaying.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSide {
    White,
    Black,
}

/// A legal move in the host's own representation: square names plus an
/// optional promotion letter, drawn from [`BoardAdapter::legal_moves`].
///
/// The two flags are controller-private annotations added before submission:
/// `user_generated` routes the move through the host's user-input path
/// (sound, animation); `auto_played` marks the move as the controller's own,
/// so the interception proxy does not treat it as a host move needing a fresh
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMove {
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
    pub user_generated: bool,
    pub auto_played: bool,
}

impl HostMove {
    /// An untagged legal move, as the host enumerates them.
    pub fn new(from: impl Into<String>, to: impl Into<String>, promotion: Option<char>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion,
            user_generated: false,
            auto_played: false,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BoardError {
    #[error("move rejected by host: {0}")]
    Rejected(String),
    #[error("host board unavailable")]
    Unavailable,
}

/// Read access to the host's game object plus the move-submission entry
/// point.
///
/// Embedders must route [`submit_move`](BoardAdapter::submit_move) through
/// the installed [`MoveProxy`](crate::intercept::MoveProxy), so that the
/// controller's own submissions pass the same interception point as moves
/// the host makes by itself.
pub trait BoardAdapter: Send + Sync {
    /// Current position as a FEN string. Never cached by the controller.
    fn position(&self) -> String;
    fn side_to_move(&self) -> PlayerSide;
    /// The side the player is assigned in the current puzzle.
    fn playing_as(&self) -> PlayerSide;
    fn legal_moves(&self) -> Vec<HostMove>;
    fn submit_move(&self, mv: &HostMove) -> Result<(), BoardError>;
}
