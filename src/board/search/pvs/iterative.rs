use std::time::Instant;

use super::super::constants::{INF, MATE, MATE_BOUND};
use super::super::{Score, SearchInfo, SearchInfoCallback};
use super::SearchContext;
use crate::board::{Move, MAX_PLY};

/// Result of the deepest fully searched iteration.
#[derive(Clone, Debug)]
pub(crate) struct Completed {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub seldepth: u32,
    pub pv: Vec<Move>,
}

impl SearchContext<'_> {
    /// Iterative deepening with aspiration windows.
    ///
    /// Returns `None` only if not even depth 1 finished before an abort.
    pub fn iterative_deepening(
        &mut self,
        max_depth: u32,
        callback: Option<&SearchInfoCallback>,
    ) -> Option<Completed> {
        let mut completed: Option<Completed> = None;
        let max_depth = max_depth.clamp(1, MAX_PLY as u32 - 1);

        for depth in 1..=max_depth {
            if depth > 1 && self.limits.soft_deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
            self.seldepth = 0;

            let previous = completed.as_ref().map_or(0, |c| c.score);
            let mut delta = self.params.aspiration_delta;
            let (mut alpha, mut beta) = if depth >= self.params.aspiration_min_depth {
                ((previous - delta).max(-INF), (previous + delta).min(INF))
            } else {
                (-INF, INF)
            };

            let score = loop {
                self.root_best = Move::NULL;
                let score = self.alphabeta(depth as i32, alpha, beta, 0);
                if self.aborted {
                    break None;
                }
                if score <= alpha {
                    log::trace!("depth {depth}: fail low {score} <= {alpha}, re-searching");
                    beta = (alpha + beta) / 2;
                    alpha = (score - delta).max(-INF);
                } else if score >= beta {
                    log::trace!("depth {depth}: fail high {score} >= {beta}, re-searching");
                    beta = (score + delta).min(INF);
                } else {
                    break Some(score);
                }
                delta += delta;
            };
            let Some(score) = score else { break };

            let best_move = if self.root_best.is_null() {
                // Every root move failed low against a full window; keep the
                // previous choice or any legal move.
                completed
                    .as_ref()
                    .map(|c| c.best_move)
                    .or_else(|| self.board.legal_moves().iter().next().copied())
                    .unwrap_or(Move::NULL)
            } else {
                self.root_best
            };

            let mut pv = self.tt.principal_variation(self.board, depth as usize);
            if pv.first() != Some(&best_move) {
                pv = vec![best_move];
            }

            let info = SearchInfo {
                depth,
                seldepth: self.seldepth as u32,
                nodes: self.nodes,
                score: Score::from_raw(score),
                elapsed: self.limits.start.elapsed(),
                hashfull: self.tt.hashfull(),
                pv: pv.clone(),
            };
            log::debug!(
                "depth {} seldepth {} nodes {} score {} pv {}",
                info.depth,
                info.seldepth,
                info.nodes,
                info.score,
                info.pv_string()
            );
            if let Some(cb) = callback {
                cb(&info);
            }

            completed = Some(Completed {
                best_move,
                score,
                depth,
                seldepth: self.seldepth as u32,
                pv,
            });

            // A forced mate found within the horizon cannot get any shorter.
            if score.abs() >= MATE_BOUND && (MATE - score.abs()) < depth as i32 {
                break;
            }
        }
        completed
    }
}
