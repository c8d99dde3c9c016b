use super::super::constants::{DRAW, EVAL_NONE, INF, MATE};
use super::super::move_picker::MovePicker;
use super::SearchContext;
use crate::board::{Move, MAX_PLY};
use crate::tt::{score_from_tt, Bound};

impl SearchContext<'_> {
    /// Quiescence search: captures and promotions only, with a stand-pat
    /// cutoff. In check every evasion is searched and mate is detected.
    pub(super) fn quiescence(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.visit() {
            return 0;
        }
        self.seldepth = self.seldepth.max(ply);

        if self.board.is_draw() {
            return DRAW;
        }
        let in_check = self.board.in_check();
        if ply >= MAX_PLY - 1 {
            return if in_check { DRAW } else { self.board.evaluate() };
        }

        let hash = self.board.hash();
        let entry = self.tt.probe(hash);
        let tt_hit = entry.matches(hash);
        if tt_hit && beta - alpha == 1 {
            let score = score_from_tt(entry.score, ply);
            let usable = match entry.bound {
                Some(Bound::Exact) => true,
                Some(Bound::Lower) => score >= beta,
                Some(Bound::Upper) => score <= alpha,
                None => false,
            };
            if usable {
                return score;
            }
        }

        let mut best = -INF;
        if !in_check {
            let stand_pat = if tt_hit && entry.eval != EVAL_NONE {
                entry.eval
            } else {
                self.board.evaluate()
            };
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            best = stand_pat;
        }

        let tt_move = if tt_hit { entry.best_move } else { Move::NULL };
        let mut picker = if in_check {
            MovePicker::new(tt_move, [Move::NULL; 2], None)
        } else {
            MovePicker::noisy(tt_move)
        };

        let mut legal = 0usize;
        while let Some(mv) = picker.next(self.board, self.heuristics) {
            if !in_check && !self.board.see_ge(mv, 0) {
                continue;
            }
            self.board.make_move(mv);
            if self.board.left_king_in_check() {
                self.board.unmake_move();
                continue;
            }
            legal += 1;
            let score = -self.quiescence(-beta, -alpha, ply + 1);
            self.board.unmake_move();
            if self.aborted {
                return 0;
            }

            if score > best {
                best = score;
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        break;
                    }
                }
            }
        }

        if in_check && legal == 0 {
            return -MATE + ply as i32;
        }
        best
    }
}
