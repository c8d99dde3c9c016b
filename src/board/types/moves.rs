//! Move encoding and fixed-capacity move lists.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

/// Upper bound on pseudo-legal moves in any reachable position.
pub const MAX_MOVES: usize = 256;

/// Maximum search ply tracked by per-ply tables.
pub const MAX_PLY: usize = 128;

/// Special-move category carried in the move encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveFlag {
    Normal,
    EnPassant,
    Castle,
    Promotion,
}

const FLAG_SHIFT: u16 = 12;
const PROMO_SHIFT: u16 = 14;

/// Compact 16-bit move.
///
/// Encoding:
/// - bits 0-5:   from square
/// - bits 6-11:  to square
/// - bits 12-13: flag (normal, en passant, castle, promotion)
/// - bits 14-15: promotion piece (knight, bishop, rook, queen)
///
/// Castling is encoded as the king's two-square step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// The empty move. Never legal since from == to.
    pub const NULL: Move = Move(0);

    #[inline]
    #[must_use]
    const fn encode(from: Square, to: Square, flag: u16, promo: u16) -> Self {
        Move(
            from.index() as u16
                | ((to.index() as u16) << 6)
                | (flag << FLAG_SHIFT)
                | (promo << PROMO_SHIFT),
        )
    }

    #[inline]
    #[must_use]
    pub const fn normal(from: Square, to: Square) -> Self {
        Move::encode(from, to, 0, 0)
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::encode(from, to, 1, 0)
    }

    #[inline]
    #[must_use]
    pub const fn castle(king_from: Square, king_to: Square) -> Self {
        Move::encode(king_from, king_to, 2, 0)
    }

    /// Promotion to `piece`; anything other than N/B/R is encoded as a queen.
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        let promo = match piece {
            Piece::Knight => 0,
            Piece::Bishop => 1,
            Piece::Rook => 2,
            _ => 3,
        };
        Move::encode(from, to, 3, promo)
    }

    #[inline]
    #[must_use]
    pub const fn from_u16(raw: u16) -> Self {
        Move(raw)
    }

    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::new((self.0 & 0x3F) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::new(((self.0 >> 6) & 0x3F) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn flag(self) -> MoveFlag {
        match (self.0 >> FLAG_SHIFT) & 0x3 {
            0 => MoveFlag::Normal,
            1 => MoveFlag::EnPassant,
            2 => MoveFlag::Castle,
            _ => MoveFlag::Promotion,
        }
    }

    /// Promoted piece, only for promotion moves.
    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        if !matches!(self.flag(), MoveFlag::Promotion) {
            return None;
        }
        Some(match self.0 >> PROMO_SHIFT {
            0 => Piece::Knight,
            1 => Piece::Bishop,
            2 => Piece::Rook,
            _ => Piece::Queen,
        })
    }

    /// Promotion bits set on a move that is not a promotion. Never
    /// produced by the generator.
    #[inline]
    #[must_use]
    pub const fn is_malformed(self) -> bool {
        !self.is_promotion() && self.0 >> PROMO_SHIFT != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_castle(self) -> bool {
        matches!(self.flag(), MoveFlag::Castle)
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag(), MoveFlag::EnPassant)
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(self.flag(), MoveFlag::Promotion)
    }
}

impl fmt::Display for Move {
    /// Coordinate notation, e.g. `e2e4`, `e7e8q`, `0000` for the null move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

/// Fixed-capacity list of moves with a length cursor.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveList {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Move list carrying a transient ordering score per entry.
///
/// The score is not part of move identity; it only lives while the
/// move sits in this list.
pub struct ScoredMoveList {
    moves: [Move; MAX_MOVES],
    scores: [i32; MAX_MOVES],
    len: usize,
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoredMoveList {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        ScoredMoveList {
            moves: [Move::NULL; MAX_MOVES],
            scores: [0; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.scores[self.len] = score;
        self.len += 1;
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    #[must_use]
    pub fn get(&self, idx: usize) -> (Move, i32) {
        (self.moves[idx], self.scores[idx])
    }

    /// Swap the best-scored entry in `start..len` into `start` and return it.
    ///
    /// Selection rather than a full sort: the caller usually stops early.
    pub fn pick_best(&mut self, start: usize) -> Option<(Move, i32)> {
        if start >= self.len {
            return None;
        }
        let mut best = start;
        for i in start + 1..self.len {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        self.moves.swap(start, best);
        self.scores.swap(start, best);
        Some((self.moves[start], self.scores[start]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_round_trips_fields() {
        let from: Square = "e7".parse().unwrap();
        let to: Square = "d8".parse().unwrap();
        let mv = Move::promotion(from, to, Piece::Knight);
        assert_eq!(mv.from(), from);
        assert_eq!(mv.to(), to);
        assert_eq!(mv.flag(), MoveFlag::Promotion);
        assert_eq!(mv.promotion_piece(), Some(Piece::Knight));
        assert_eq!(mv.to_string(), "e7d8n");

        let castle = Move::castle(Square::E1, Square::G1);
        assert!(castle.is_castle());
        assert_eq!(castle.promotion_piece(), None);
        assert_eq!(castle.to_string(), "e1g1");
    }

    #[test]
    fn pick_best_selects_in_descending_order() {
        let mut list = ScoredMoveList::new();
        list.push(Move::normal(Square::A1, Square::B1), 5);
        list.push(Move::normal(Square::A1, Square::C1), 50);
        list.push(Move::normal(Square::A1, Square::D1), -3);
        let scores: Vec<i32> = (0..3).filter_map(|i| list.pick_best(i)).map(|(_, s)| s).collect();
        assert_eq!(scores, vec![50, 5, -3]);
        assert!(list.pick_best(3).is_none());
    }
}
