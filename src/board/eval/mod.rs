//! Position evaluation.
//!
//! A tapered material and piece-square score is kept incrementally in an
//! [`Accumulator`] stack that moves in lockstep with make/unmake. The final
//! score applies a few global terms on top: a mop-up bonus when one side
//! is down to a bare king, damping of drawish material balances, and
//! fifty-move-rule damping.

mod accumulator;
mod tables;

pub use accumulator::Accumulator;
pub(crate) use accumulator::EvalStack;
pub(crate) use tables::MATERIAL_MG;

use super::state::Board;
use super::types::{Color, Piece, Square};
use tables::MAX_PHASE;

/// Non-pawn material below which an advantage without pawns is drawish.
const DRAWISH_MARGIN: i32 = 400;
const DRAWISH_DIVISOR: i32 = 4;

const MOP_UP_CENTER_WEIGHT: i32 = 10;
const MOP_UP_PROXIMITY_WEIGHT: i32 = 4;

/// Manhattan distance from the nearest of the four center squares.
fn center_distance(sq: Square) -> i32 {
    let file = i32::from(sq.file());
    let rank = i32::from(sq.rank());
    let df = (file - 3).max(4 - file);
    let dr = (rank - 3).max(4 - rank);
    df + dr - 2
}

fn manhattan(a: Square, b: Square) -> i32 {
    (i32::from(a.file()) - i32::from(b.file())).abs()
        + (i32::from(a.rank()) - i32::from(b.rank())).abs()
}

impl Board {
    /// Rebuild the evaluation stack from the current placement, dropping
    /// any incremental history.
    pub fn recompute_eval(&mut self) {
        let base = self.compute_accumulator();
        self.eval.reset(base);
    }

    /// Current incremental evaluation state.
    #[must_use]
    pub fn accumulator(&self) -> Accumulator {
        *self.eval.top()
    }

    /// Score from the side to move's point of view.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        let score = self.evaluate_white();
        match self.side {
            Color::White => score,
            Color::Black => -score,
        }
    }

    /// Score from white's point of view.
    #[must_use]
    pub fn evaluate_white(&self) -> i32 {
        let acc = self.eval.top();
        let phase = acc.phase.clamp(0, MAX_PHASE);
        let mut score = (acc.mg * phase + acc.eg * (MAX_PHASE - phase)) / MAX_PHASE;

        score += self.mop_up(Color::White) - self.mop_up(Color::Black);

        if score != 0 {
            let strong = if score > 0 { Color::White } else { Color::Black };
            if self.is_drawish_for(strong) {
                score /= DRAWISH_DIVISOR;
            }
        }

        let clock = i32::from(self.halfmove.min(100));
        score * (200 - clock) / 200
    }

    fn non_pawn_material(&self, color: Color) -> i32 {
        [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .iter()
            .map(|&p| self.colored(color, p).popcount() as i32 * MATERIAL_MG[p.index()])
            .sum()
    }

    /// `strong` has no pawns and only a small edge in piece material.
    fn is_drawish_for(&self, strong: Color) -> bool {
        self.colored(strong, Piece::Pawn).is_empty()
            && self.non_pawn_material(strong) - self.non_pawn_material(!strong) < DRAWISH_MARGIN
    }

    /// Bonus for `strong` driving a bare enemy king to the edge and
    /// approaching it with its own king.
    fn mop_up(&self, strong: Color) -> i32 {
        let weak = !strong;
        let weak_is_bare = self.color(weak) == self.colored(weak, Piece::King);
        if !weak_is_bare
            || self.non_pawn_material(strong) < MATERIAL_MG[Piece::Rook.index()]
        {
            return 0;
        }
        let weak_king = self.king_square(weak);
        let strong_king = self.king_square(strong);
        MOP_UP_CENTER_WEIGHT * center_distance(weak_king)
            + MOP_UP_PROXIMITY_WEIGHT * (14 - manhattan(weak_king, strong_king))
    }
}
