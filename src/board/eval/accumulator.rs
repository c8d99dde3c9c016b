//! Incrementally maintained evaluation state.
//!
//! One accumulator per position in the make/unmake history. Making a move
//! pushes a copy of the top entry and applies piece add/remove deltas to it;
//! unmaking pops it.

use crate::board::types::{Color, Piece, Square};

use super::tables::{MATERIAL_EG, MATERIAL_MG, PHASE_WEIGHTS, PST_EG, PST_MG};

/// Tapered material + piece-square sums, white minus black.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Accumulator {
    pub mg: i32,
    pub eg: i32,
    pub phase: i32,
}

impl Accumulator {
    #[inline]
    fn terms(color: Color, piece: Piece, sq: Square) -> (i32, i32) {
        let idx = match color {
            Color::White => sq.index(),
            Color::Black => sq.flip().index(),
        };
        let p = piece.index();
        let sign = color.sign();
        (
            sign * (MATERIAL_MG[p] + PST_MG[p][idx]),
            sign * (MATERIAL_EG[p] + PST_EG[p][idx]),
        )
    }

    #[inline]
    pub fn add(&mut self, color: Color, piece: Piece, sq: Square) {
        let (mg, eg) = Self::terms(color, piece, sq);
        self.mg += mg;
        self.eg += eg;
        self.phase += PHASE_WEIGHTS[piece.index()];
    }

    #[inline]
    pub fn remove(&mut self, color: Color, piece: Piece, sq: Square) {
        let (mg, eg) = Self::terms(color, piece, sq);
        self.mg -= mg;
        self.eg -= eg;
        self.phase -= PHASE_WEIGHTS[piece.index()];
    }
}

/// Fixed-capacity stack of accumulators with a length cursor.
#[derive(Clone)]
pub(crate) struct EvalStack {
    entries: Box<[Accumulator]>,
    len: usize,
}

impl EvalStack {
    pub(crate) fn new(capacity: usize) -> Self {
        EvalStack {
            entries: vec![Accumulator::default(); capacity].into_boxed_slice(),
            len: 1,
        }
    }

    /// Drop all history and start over from `base`.
    pub(crate) fn reset(&mut self, base: Accumulator) {
        self.entries[0] = base;
        self.len = 1;
    }

    #[inline]
    pub(crate) fn top(&self) -> &Accumulator {
        &self.entries[self.len - 1]
    }

    #[inline]
    pub(crate) fn top_mut(&mut self) -> &mut Accumulator {
        &mut self.entries[self.len - 1]
    }

    /// Duplicate the top entry. Panics when the stack is full.
    #[inline]
    pub(crate) fn push(&mut self) {
        assert!(self.len < self.entries.len(), "evaluation stack overflow");
        self.entries[self.len] = self.entries[self.len - 1];
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        debug_assert!(self.len > 1);
        self.len -= 1;
    }
}
