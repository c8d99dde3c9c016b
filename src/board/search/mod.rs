//! Search module implementing principal variation search with iterative
//! deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - PVS with check extension, TT cutoffs, RFP, NMP, LMP, SEE pruning,
//!   LMR and IIR
//! - Quiescence search with stand-pat and SEE filtering
//! - Staged move ordering (hash move, SEE-split captures, killers,
//!   history and counter-move history)
//! - A shared transposition table

mod constants;
mod heuristics;
mod move_picker;
mod params;
mod pvs;

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tt::TranspositionTable;

use super::{Board, Move};
pub use constants::{DEFAULT_MAX_DEPTH, DRAW, INF, MATE, MATE_BOUND};
pub use heuristics::{CaptureHistory, CounterMoveHistory, Heuristics, HistoryTable, KillerTable};
pub use move_picker::{MovePicker, Stage};
pub use params::SearchParams;
use pvs::{Limits, SearchContext};

/// Default transposition table size in MiB.
pub const DEFAULT_TT_MB: usize = 16;

/// A score as reported to the outside world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Score {
    /// Centipawns from the side to move's point of view.
    Cp(i32),
    /// Mate in this many moves; negative when the side to move is mated.
    Mate(i32),
}

impl Score {
    /// Interpret a raw search score.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        if raw >= MATE_BOUND {
            Score::Mate((MATE - raw + 1) / 2)
        } else if raw <= -MATE_BOUND {
            Score::Mate(-(MATE + raw + 1) / 2)
        } else {
            Score::Cp(raw)
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Cp(cp) => write!(f, "cp {cp}"),
            Score::Mate(n) => write!(f, "mate {n}"),
        }
    }
}

/// Report for one completed iteration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchInfo {
    pub depth: u32,
    /// Deepest ply reached, extensions and quiescence included.
    pub seldepth: u32,
    pub nodes: u64,
    pub score: Score,
    pub elapsed: Duration,
    /// Transposition table use in permille.
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

impl SearchInfo {
    #[must_use]
    pub fn nps(&self) -> u64 {
        let ms = self.elapsed.as_millis() as u64;
        if ms == 0 {
            0
        } else {
            self.nodes * 1000 / ms
        }
    }

    /// Principal variation in coordinate notation, space separated.
    #[must_use]
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Callback for per-iteration reports.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchInfo) + Send + Sync>;

/// Outcome of a search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move.
    pub best_move: Option<Move>,
    /// Expected reply, taken from the principal variation.
    pub ponder_move: Option<Move>,
    /// Raw score from the side to move's point of view.
    pub score: i32,
    /// Deepest completed iteration (0 if none completed).
    pub depth: u32,
    pub seldepth: u32,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

impl SearchResult {
    #[must_use]
    pub fn score(&self) -> Score {
        Score::from_raw(self.score)
    }
}

/// Transposition table, heuristic tables and parameters kept between
/// searches.
pub struct SearchState {
    pub tt: Arc<TranspositionTable>,
    pub heuristics: Box<Heuristics>,
    pub params: SearchParams,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: Arc::new(TranspositionTable::new(tt_mb)),
            heuristics: Box::default(),
            params: SearchParams::default(),
        }
    }

    /// Forget everything learned from previous games.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.heuristics.reset();
    }

    pub fn clear_hash(&mut self) {
        self.new_game();
    }

    /// Replace the transposition table with an empty one of `tt_mb` MiB.
    pub fn resize_hash(&mut self, tt_mb: usize) {
        self.tt = Arc::new(TranspositionTable::new(tt_mb));
        self.heuristics.reset();
    }

    #[must_use]
    pub fn hashfull(&self) -> u32 {
        self.tt.hashfull()
    }
}

/// Limits and reporting for one search.
#[derive(Clone)]
pub struct SearchConfig {
    /// Maximum iterative-deepening depth (`None` = [`DEFAULT_MAX_DEPTH`]).
    pub max_depth: Option<u32>,
    /// No new iteration starts once this much time has passed (0 = none).
    pub soft_time_ms: u64,
    /// The search stops once this much time has passed (0 = none).
    pub hard_time_ms: u64,
    /// Node limit (0 = none).
    pub node_limit: u64,
    pub info_callback: Option<SearchInfoCallback>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: None,
            soft_time_ms: 0,
            hard_time_ms: 0,
            node_limit: 0,
            info_callback: None,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("max_depth", &self.max_depth)
            .field("soft_time_ms", &self.soft_time_ms)
            .field("hard_time_ms", &self.hard_time_ms)
            .field("node_limit", &self.node_limit)
            .field("info_callback", &self.info_callback.is_some())
            .finish()
    }
}

impl SearchConfig {
    /// Depth-limited search.
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Search for a fixed time.
    #[must_use]
    pub fn time(time_ms: u64) -> Self {
        SearchConfig {
            soft_time_ms: time_ms,
            hard_time_ms: time_ms,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Separate soft and hard time limits.
    #[must_use]
    pub fn with_time(mut self, soft_ms: u64, hard_ms: u64) -> Self {
        self.soft_time_ms = soft_ms;
        self.hard_time_ms = hard_ms.max(soft_ms);
        self
    }

    #[must_use]
    pub fn with_nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }

    fn limits(&self, start: Instant) -> Limits {
        let deadline = |ms: u64| (ms > 0).then(|| start + Duration::from_millis(ms));
        Limits {
            start,
            soft_deadline: deadline(self.soft_time_ms),
            hard_deadline: deadline(self.hard_time_ms),
            nodes: self.node_limit,
        }
    }
}

/// Search `board` and return the best move of the deepest completed
/// iteration.
///
/// The board is restored before returning. Setting `stop` abandons the
/// running iteration; its partial result is discarded.
#[allow(clippy::needless_pass_by_value)]
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    config: SearchConfig,
    stop: &AtomicBool,
) -> SearchResult {
    let start = Instant::now();
    let legal = board.legal_moves();
    if legal.is_empty() {
        let score = if board.in_check() { -MATE } else { DRAW };
        return SearchResult {
            best_move: None,
            ponder_move: None,
            score,
            depth: 0,
            seldepth: 0,
            nodes: 0,
            pv: Vec::new(),
        };
    }

    let max_depth = config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
    let tt = Arc::clone(&state.tt);
    let mut ctx = SearchContext::new(
        board,
        &tt,
        &mut state.heuristics,
        &state.params,
        stop,
        config.limits(start),
    );
    let completed = ctx.iterative_deepening(max_depth, config.info_callback.as_ref());
    let nodes = ctx.nodes;
    drop(ctx);

    match completed {
        Some(c) => SearchResult {
            best_move: Some(c.best_move),
            ponder_move: c.pv.get(1).copied(),
            score: c.score,
            depth: c.depth,
            seldepth: c.seldepth,
            nodes,
            pv: c.pv,
        },
        None => {
            // Aborted before depth 1 finished: any legal move beats none.
            let fallback = legal.iter().next().copied();
            SearchResult {
                best_move: fallback,
                ponder_move: None,
                score: board.evaluate(),
                depth: 0,
                seldepth: 0,
                nodes,
                pv: fallback.into_iter().collect(),
            }
        }
    }
}
