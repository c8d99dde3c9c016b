use super::super::constants::MATE_BOUND;
use super::SearchContext;

impl SearchContext<'_> {
    /// Reverse futility pruning: at shallow depth, a static eval far above
    /// beta is taken as a fail high.
    pub(super) fn reverse_futility(
        &self,
        depth: i32,
        beta: i32,
        eval: i32,
        improving: bool,
    ) -> Option<i32> {
        if depth > self.params.rfp_max_depth || eval >= MATE_BOUND {
            return None;
        }
        let margin = self.params.rfp_margin * (depth - i32::from(improving));
        (eval - margin >= beta).then_some(eval)
    }

    /// Null-move pruning: give the opponent a free move and search the
    /// result at reduced depth. If we still fail high, so would a real move.
    pub(super) fn null_move(&mut self, depth: i32, beta: i32, eval: i32, ply: usize) -> Option<i32> {
        let side = self.board.side_to_move();
        if depth < self.params.nmp_min_depth
            || eval < beta
            || self.board.last_was_null()
            || !self.board.has_non_pawn_material(side)
        {
            return None;
        }

        let r = self.params.nmp_base_reduction
            + depth / self.params.nmp_depth_divisor
            + ((eval - beta) / self.params.nmp_eval_divisor).min(3);

        self.board.make_null_move();
        let score = -self.alphabeta(depth - r, -beta, -beta + 1, ply + 1);
        self.board.unmake_null_move();

        if self.aborted || score < beta {
            return None;
        }
        // Unproven mates from a null-move search are not trusted.
        Some(if score >= MATE_BOUND { beta } else { score })
    }
}
