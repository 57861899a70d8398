//! Automated solving of chess puzzles presented by a host application.
//!
//! The host owns the board, the puzzle logic, and the move pipeline; this
//! crate owns the decisions. A controller actor watches moves flowing
//! through the host's (intercepted) move function, asks an external engine
//! worker for the best reply, and plays that reply back through the host,
//! across the host's three puzzle surfaces (rush, daily, normal), each with
//! its own completion and advance protocol.
//!
//! All host access goes through two injected traits, [`BoardAdapter`] and
//! [`PuzzleStatusAdapter`], so the whole control flow runs against fakes in
//! tests. The interception point is an explicit decorator
//! ([`intercept::MoveProxy`]) around the host's move sink rather than a
//! patched live object.

pub mod board;
pub mod config;
pub mod controller;
pub mod intercept;
pub mod status;

pub use board::{BoardAdapter, BoardError, HostMove, PlayerSide, START_FEN};
pub use config::{ConfigError, SolverConfig};
pub use controller::{spawn, Solver, SolverError, SolverEvent, SolverHandle, SolverStatus};
pub use intercept::{Interceptor, MoveProxy, MoveSink};
pub use status::{ControlState, PuzzleMode, PuzzleStatusAdapter};
