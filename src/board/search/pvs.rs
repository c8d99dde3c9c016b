//! Principal variation search.
//!
//! This module implements:
//! - Negamax alpha-beta with null-window re-searches (PVS)
//! - Check extension
//! - Transposition table cutoffs
//! - Reverse futility and null-move pruning
//! - Late move pruning and SEE pruning
//! - Late move reductions
//! - Internal iterative reduction
//! - Killer, history, capture-history and counter-move-history updates

mod iterative;
mod pruning;
mod quiescence;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use super::constants::{DRAW, EVAL_NONE, INF, MATE, MATE_BOUND, POLL_INTERVAL};
use super::heuristics::{history_bonus, Heuristics};
use super::move_picker::{captured_piece, moved_piece, MovePicker};
use super::params::SearchParams;
use crate::board::{Board, Move, MoveList, Piece, MAX_PLY};
use crate::tables::Tables;
use crate::tt::{score_from_tt, score_to_tt, Bound, TranspositionTable};

/// Time and node budget for one search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Limits {
    pub start: Instant,
    /// No new iteration starts after this.
    pub soft_deadline: Option<Instant>,
    /// The running iteration is abandoned after this.
    pub hard_deadline: Option<Instant>,
    /// Zero means unlimited.
    pub nodes: u64,
}

/// Everything one search call tree reads and writes.
pub(crate) struct SearchContext<'a> {
    pub board: &'a mut Board,
    pub tt: &'a TranspositionTable,
    pub heuristics: &'a mut Heuristics,
    pub params: &'a SearchParams,
    tables: &'static Tables,
    stop: &'a AtomicBool,
    pub limits: Limits,
    pub nodes: u64,
    pub seldepth: usize,
    pub aborted: bool,
    /// Best root move of the current iteration attempt.
    pub root_best: Move,
    static_evals: [i32; MAX_PLY + 1],
}

#[derive(Clone, Copy)]
struct Cutoff {
    mv: Move,
    piece: Piece,
    victim: Piece,
    quiet: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        board: &'a mut Board,
        tt: &'a TranspositionTable,
        heuristics: &'a mut Heuristics,
        params: &'a SearchParams,
        stop: &'a AtomicBool,
        limits: Limits,
    ) -> Self {
        let tables = board.tables();
        SearchContext {
            board,
            tt,
            heuristics,
            params,
            tables,
            stop,
            limits,
            nodes: 0,
            seldepth: 0,
            aborted: false,
            root_best: Move::NULL,
            static_evals: [EVAL_NONE; MAX_PLY + 1],
        }
    }

    /// Count a node and decide whether the search must unwind.
    ///
    /// The node limit is exact; the stop flag and the hard deadline are
    /// polled every [`POLL_INTERVAL`] nodes.
    #[inline]
    fn visit(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.limits.nodes > 0 && self.nodes >= self.limits.nodes {
            self.aborted = true;
            return true;
        }
        self.nodes += 1;
        if self.nodes % POLL_INTERVAL == 0
            && (self.stop.load(Ordering::Relaxed)
                || self.limits.hard_deadline.is_some_and(|d| Instant::now() >= d))
        {
            self.aborted = true;
        }
        self.aborted
    }

    /// Negamax search of the current position. Returns a score from the
    /// side to move's point of view; meaningless once `aborted` is set.
    pub fn alphabeta(&mut self, mut depth: i32, mut alpha: i32, mut beta: i32, ply: usize) -> i32 {
        let is_pv = beta - alpha > 1;
        let is_root = ply == 0;
        let in_check = self.board.in_check();
        if in_check {
            depth += 1;
        }
        if depth <= 0 {
            return self.quiescence(alpha, beta, ply);
        }
        if self.visit() {
            return 0;
        }
        self.seldepth = self.seldepth.max(ply);

        if !is_root {
            if self.board.is_draw() {
                return DRAW;
            }
            if ply >= MAX_PLY - 1 {
                return if in_check { DRAW } else { self.board.evaluate() };
            }
            // Mate distance pruning.
            alpha = alpha.max(-MATE + ply as i32);
            beta = beta.min(MATE - ply as i32 - 1);
            if alpha >= beta {
                return alpha;
            }
        }

        let hash = self.board.hash();
        let entry = self.tt.probe(hash);
        let tt_hit = entry.matches(hash);
        let tt_move = if tt_hit { entry.best_move } else { Move::NULL };

        if tt_hit && !is_pv && i32::from(entry.depth) >= depth {
            let score = score_from_tt(entry.score, ply);
            let usable = match entry.bound {
                Some(Bound::Exact) => true,
                Some(Bound::Lower) => score >= beta,
                Some(Bound::Upper) => score <= alpha,
                None => false,
            };
            if usable {
                if score >= beta
                    && self.board.is_pseudo_legal(tt_move)
                    && self.board.is_quiet(tt_move)
                {
                    let piece = moved_piece(self.board, tt_move);
                    self.reward(
                        Cutoff {
                            mv: tt_move,
                            piece,
                            victim: Piece::Pawn,
                            quiet: true,
                        },
                        depth,
                        ply,
                        &MoveList::new(),
                        &MoveList::new(),
                    );
                }
                return score;
            }
        }

        let eval = if in_check {
            EVAL_NONE
        } else if tt_hit && entry.eval != EVAL_NONE {
            entry.eval
        } else {
            self.board.evaluate()
        };
        self.static_evals[ply] = eval;
        let improving = !in_check
            && ply >= 2
            && self.static_evals[ply - 2] != EVAL_NONE
            && eval > self.static_evals[ply - 2];

        if !is_pv && !in_check && !is_root {
            if let Some(score) = self.reverse_futility(depth, beta, eval, improving) {
                return score;
            }
            if let Some(score) = self.null_move(depth, beta, eval, ply) {
                return score;
            }
            if self.aborted {
                return 0;
            }
        }

        if depth >= self.params.iir_min_depth && !tt_hit {
            depth -= 1;
        }

        let original_alpha = alpha;
        let side = self.board.side_to_move();
        let prev = self.board.last_move();
        let killers = self.heuristics.killers.get(ply);
        let mut picker = MovePicker::new(tt_move, killers, prev);

        let lmp_limit = (self.params.lmp_base + (depth * depth) as usize) / if improving { 1 } else { 2 };
        let mut best_score = -INF;
        let mut best_move = Move::NULL;
        let mut legal = 0usize;
        let mut quiets_tried = MoveList::new();
        let mut noisy_tried = MoveList::new();

        while let Some(mv) = picker.next(self.board, self.heuristics) {
            let quiet = self.board.is_quiet(mv);
            let piece = moved_piece(self.board, mv);
            let victim = captured_piece(self.board, mv);

            // Only prune once a real score exists, so a node is never
            // mistaken for mate or stalemate.
            if !is_root && best_score > -MATE_BOUND {
                if quiet
                    && !is_pv
                    && !in_check
                    && depth <= self.params.lmp_max_depth
                    && quiets_tried.len() >= lmp_limit
                {
                    picker.skip_quiets();
                    continue;
                }
                if !quiet
                    && depth <= self.params.see_max_depth
                    && !self.board.see_ge(mv, -self.params.see_noisy_margin * depth)
                {
                    continue;
                }
            }

            let history = if quiet {
                self.heuristics.history.score(side, mv)
            } else {
                0
            };

            self.board.make_move(mv);
            if self.board.left_king_in_check() {
                self.board.unmake_move();
                continue;
            }
            legal += 1;

            let new_depth = depth - 1;
            let score = if legal == 1 {
                -self.alphabeta(new_depth, -beta, -alpha, ply + 1)
            } else {
                let mut reduction = 0;
                if depth >= self.params.lmr_min_depth
                    && legal > self.params.lmr_min_moves + usize::from(is_pv)
                    && quiet
                {
                    reduction = self.tables.lmr(depth, legal);
                    if is_pv {
                        reduction -= 1;
                    }
                    if killers.contains(&mv) {
                        reduction -= 1;
                    }
                    if !improving {
                        reduction += 1;
                    }
                    if self.board.in_check() {
                        reduction -= 1;
                    }
                    reduction -= history / self.params.lmr_history_divisor;
                    reduction = reduction.clamp(0, (new_depth - 1).max(0));
                }

                let mut score = -self.alphabeta(new_depth - reduction, -alpha - 1, -alpha, ply + 1);
                if score > alpha && reduction > 0 {
                    score = -self.alphabeta(new_depth, -alpha - 1, -alpha, ply + 1);
                }
                if score > alpha && score < beta {
                    score = -self.alphabeta(new_depth, -beta, -alpha, ply + 1);
                }
                score
            };
            self.board.unmake_move();
            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = mv;
                    if is_root {
                        self.root_best = mv;
                    }
                    alpha = score;
                    if alpha >= beta {
                        let cutoff = Cutoff {
                            mv,
                            piece,
                            victim,
                            quiet,
                        };
                        self.reward(cutoff, depth, ply, &quiets_tried, &noisy_tried);
                        break;
                    }
                }
            }

            if quiet {
                quiets_tried.push(mv);
            } else {
                noisy_tried.push(mv);
            }
        }

        if legal == 0 {
            return if in_check { -MATE + ply as i32 } else { DRAW };
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt.store(
            hash,
            best_move,
            score_to_tt(best_score, ply),
            eval,
            depth.clamp(0, i32::from(u8::MAX)) as u8,
            bound,
        );
        best_score
    }

    /// Reward the move that failed high and penalize the ones tried
    /// before it.
    fn reward(
        &mut self,
        cutoff: Cutoff,
        depth: i32,
        ply: usize,
        quiets_tried: &MoveList,
        noisy_tried: &MoveList,
    ) {
        let bonus = history_bonus(depth);
        let side = self.board.side_to_move();
        let prev = self.board.last_move();
        let h = &mut *self.heuristics;

        if cutoff.quiet {
            h.killers.update(ply, cutoff.mv);
            h.history.update(side, cutoff.mv, bonus);
            h.counter_history.update(prev, cutoff.piece, cutoff.mv, bonus);
            for &mv in quiets_tried.iter() {
                let piece = moved_piece(self.board, mv);
                h.history.update(side, mv, -bonus);
                h.counter_history.update(prev, piece, mv, -bonus);
            }
        } else {
            h.capture_history
                .update(cutoff.piece, cutoff.mv, cutoff.victim, bonus);
        }
        for &mv in noisy_tried.iter() {
            let piece = moved_piece(self.board, mv);
            let victim = captured_piece(self.board, mv);
            h.capture_history.update(piece, mv, victim, -bonus);
        }
    }
}
