//! Injected view of the host's puzzle UI: presence markers, completion
//! signals, and the controls used to move on to the next puzzle.

/// State of a host navigation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Absent,
    Disabled,
    Enabled,
}

impl ControlState {
    pub fn is_enabled(self) -> bool {
        self == ControlState::Enabled
    }
}

/// The three puzzle surfaces the host presents, with different completion
/// and advance protocols. Classified once per puzzle session rather than
/// re-derived at every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleMode {
    /// Timed sequence of puzzles with a running solved counter; the host
    /// advances by itself.
    Rush,
    /// One puzzle per calendar day, navigable across days.
    Daily,
    Normal,
}

/// DOM-backed status queries. Absent elements are reported as `None` /
/// `false` / [`ControlState::Absent`], never as errors.
pub trait PuzzleStatusAdapter: Send + Sync {
    /// The puzzle-specific UI marker is present.
    fn puzzle_marker_present(&self) -> bool;
    /// Raw text of the rush solved-counter, when that display exists.
    fn rush_score(&self) -> Option<String>;
    /// The one-puzzle-per-day surface is active.
    fn daily_mode(&self) -> bool;
    /// The "move accepted / solved" banner of the daily surface is shown.
    fn daily_solved_banner(&self) -> bool;
    fn next_puzzle_control(&self) -> ControlState;
    fn next_day_control(&self) -> ControlState;
    /// Activate the "Next Puzzle" control.
    fn advance_puzzle(&self);
    /// Activate the "Next Day" control.
    fn advance_day(&self);
}

/// Classify the host's current puzzle surface.
pub fn classify_mode(status: &dyn PuzzleStatusAdapter) -> PuzzleMode {
    if status.rush_score().is_some() {
        PuzzleMode::Rush
    } else if status.daily_mode() {
        PuzzleMode::Daily
    } else {
        PuzzleMode::Normal
    }
}

/// Parse the rush counter text. The host renders an untouched counter as
/// `"--"`, which reads as zero; anything else non-numeric is a parse failure
/// the caller must treat as "no reading".
pub fn parse_rush_score(text: &str) -> Option<u32> {
    let text = text.trim();
    if text == "--" {
        return Some(0);
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rush_score() {
        assert_eq!(parse_rush_score("7"), Some(7));
        assert_eq!(parse_rush_score(" 42 "), Some(42));
        assert_eq!(parse_rush_score("--"), Some(0));
        assert_eq!(parse_rush_score(""), None);
        assert_eq!(parse_rush_score("n/a"), None);
        assert_eq!(parse_rush_score("-3"), None);
    }
}
