//! Score constants shared by the search and the transposition table.

use crate::board::MAX_PLY;

/// Score of delivering mate at the root. Mate in `n` plies scores
/// `MATE - n`.
pub const MATE: i32 = 32000;

/// Scores at or beyond this magnitude are mate scores.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

/// Larger than any real score; used for the initial window.
pub const INF: i32 = 32500;

/// Static eval placeholder for nodes where none was computed (in check).
pub const EVAL_NONE: i32 = -32600;

pub const DRAW: i32 = 0;

/// Nodes between checks of the stop flag and the hard deadline.
pub const POLL_INTERVAL: u64 = 1024;

/// Upper bound on history table magnitudes.
pub const HISTORY_MAX: i32 = 16384;

/// Default maximum iterative-deepening depth.
pub const DEFAULT_MAX_DEPTH: u32 = 64;
