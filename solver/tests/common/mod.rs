//! Scripted host environment for driving the controller end to end: an
//! in-memory board and puzzle surface, a recording move pipeline, and a
//! shell-script engine that answers `go` with a canned move.

use std::collections::VecDeque;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use solver::{
    BoardAdapter, BoardError, ControlState, HostMove, MoveProxy, MoveSink, PlayerSide,
    PuzzleStatusAdapter, SolverEvent,
};
use tokio::sync::broadcast;

pub const PUZZLE_FEN: &str = "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1";

/// In-memory host board. Submissions are routed back through the installed
/// proxy, the way the real host's move function would be.
pub struct ScriptedBoard {
    pub fen: Mutex<String>,
    pub turn: Mutex<PlayerSide>,
    pub playing_as: PlayerSide,
    pub legal: Mutex<Vec<HostMove>>,
    pub proxy: OnceLock<Arc<MoveProxy>>,
}

impl ScriptedBoard {
    pub fn new(fen: &str, legal: Vec<HostMove>) -> Self {
        Self {
            fen: Mutex::new(fen.to_string()),
            turn: Mutex::new(PlayerSide::White),
            playing_as: PlayerSide::White,
            legal: Mutex::new(legal),
            proxy: OnceLock::new(),
        }
    }
}

impl BoardAdapter for ScriptedBoard {
    fn position(&self) -> String {
        self.fen.lock().unwrap().clone()
    }
    fn side_to_move(&self) -> PlayerSide {
        *self.turn.lock().unwrap()
    }
    fn playing_as(&self) -> PlayerSide {
        self.playing_as
    }
    fn legal_moves(&self) -> Vec<HostMove> {
        self.legal.lock().unwrap().clone()
    }
    fn submit_move(&self, mv: &HostMove) -> Result<(), BoardError> {
        self.proxy
            .get()
            .expect("proxy not installed before submission")
            .submit(mv)
    }
}

/// The host-side end of the move pipeline: records what reached the host
/// and runs a test-provided reaction (flip a banner, bump a counter).
pub struct HostPipeline {
    pub submitted: Arc<Mutex<Vec<HostMove>>>,
    pub on_submit: Box<dyn Fn(&HostMove) + Send + Sync>,
}

impl MoveSink for HostPipeline {
    fn submit(&self, mv: &HostMove) -> Result<(), BoardError> {
        self.submitted.lock().unwrap().push(mv.clone());
        (self.on_submit)(mv);
        Ok(())
    }
}

/// In-memory puzzle surface. `day_script` holds the (solved-banner,
/// next-day-control) pairs that each "next day" navigation loads.
#[derive(Default)]
pub struct ScriptedStatus {
    pub marker: Mutex<bool>,
    pub rush_score: Mutex<Option<String>>,
    pub daily: Mutex<bool>,
    pub daily_solved: Mutex<bool>,
    pub next_puzzle: Mutex<Option<ControlState>>,
    pub next_day: Mutex<Option<ControlState>>,
    pub day_script: Mutex<VecDeque<(bool, ControlState)>>,
    pub advanced_puzzles: Mutex<u32>,
    pub advanced_days: Mutex<u32>,
}

impl PuzzleStatusAdapter for ScriptedStatus {
    fn puzzle_marker_present(&self) -> bool {
        *self.marker.lock().unwrap()
    }
    fn rush_score(&self) -> Option<String> {
        self.rush_score.lock().unwrap().clone()
    }
    fn daily_mode(&self) -> bool {
        *self.daily.lock().unwrap()
    }
    fn daily_solved_banner(&self) -> bool {
        *self.daily_solved.lock().unwrap()
    }
    fn next_puzzle_control(&self) -> ControlState {
        self.next_puzzle.lock().unwrap().unwrap_or(ControlState::Absent)
    }
    fn next_day_control(&self) -> ControlState {
        self.next_day.lock().unwrap().unwrap_or(ControlState::Absent)
    }
    fn advance_puzzle(&self) {
        *self.advanced_puzzles.lock().unwrap() += 1;
    }
    fn advance_day(&self) {
        *self.advanced_days.lock().unwrap() += 1;
        if let Some((solved, control)) = self.day_script.lock().unwrap().pop_front() {
            *self.daily_solved.lock().unwrap() = solved;
            *self.next_day.lock().unwrap() = Some(control);
        }
    }
}

/// Write a shell script speaking just enough UCI, logging every line it
/// receives. `go_action` is the shell fragment run for a `go` command, e.g.
/// `echo "bestmove d1d8"`, or empty for an engine that never answers.
pub fn fake_engine(dir: &tempfile::TempDir, go_action: &str) -> (PathBuf, PathBuf) {
    let script = dir.path().join("fake-engine.sh");
    let log = dir.path().join("uci.log");

    let mut f = std::fs::File::create(&script).unwrap();
    write!(
        f,
        "#!/bin/sh\n\
         log=\"{}\"\n\
         while read line; do\n\
           echo \"$line\" >> \"$log\"\n\
           case \"$line\" in\n\
             uci) echo \"uciok\";;\n\
             isready) echo \"readyok\";;\n\
             go*) {};;\n\
             quit) exit 0;;\n\
           esac\n\
         done\n",
        log.display(),
        if go_action.is_empty() { ":" } else { go_action },
    )
    .unwrap();
    drop(f);

    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();

    (script, log)
}

/// Lines the fake engine received starting with the given prefix.
pub fn logged_lines(log: &PathBuf, prefix: &str) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .filter(|l| l.starts_with(prefix))
        .map(|l| l.to_string())
        .collect()
}

pub async fn next_event(rx: &mut broadcast::Receiver<SolverEvent>) -> SolverEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Poll a condition until it holds or the deadline passes.
pub async fn wait_until(deadline: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}
