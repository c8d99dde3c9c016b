//! Attack tables for move generation.
//!
//! Leaper attacks are fixed 64-entry tables; sliders use magic
//! multiplication into per-square attack tables built once.

mod leapers;
mod magic;

use rand::rngs::StdRng;

use super::types::{Bitboard, Color, Piece, Square};
use magic::{SliderTable, BISHOP_DIRS, ROOK_DIRS};

/// Immutable attack lookup for every piece type.
pub struct AttackTables {
    knight: [u64; 64],
    king: [u64; 64],
    pawn: [[u64; 64]; 2],
    rook: SliderTable,
    bishop: SliderTable,
}

impl AttackTables {
    pub(crate) fn build(rng: &mut StdRng) -> Self {
        AttackTables {
            knight: leapers::knight_table(),
            king: leapers::king_table(),
            pawn: leapers::pawn_table(),
            rook: SliderTable::build(&ROOK_DIRS, rng),
            bishop: SliderTable::build(&BISHOP_DIRS, rng),
        }
    }

    #[inline]
    #[must_use]
    pub fn knight(&self, sq: Square) -> Bitboard {
        Bitboard(self.knight[sq.index()])
    }

    #[inline]
    #[must_use]
    pub fn king(&self, sq: Square) -> Bitboard {
        Bitboard(self.king[sq.index()])
    }

    /// Squares a pawn of `color` on `sq` captures on.
    #[inline]
    #[must_use]
    pub fn pawn(&self, color: Color, sq: Square) -> Bitboard {
        Bitboard(self.pawn[color.index()][sq.index()])
    }

    #[inline]
    #[must_use]
    pub fn rook(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        Bitboard(self.rook.attacks(sq.index(), occupancy.0))
    }

    #[inline]
    #[must_use]
    pub fn bishop(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        Bitboard(self.bishop.attacks(sq.index(), occupancy.0))
    }

    #[inline]
    #[must_use]
    pub fn queen(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        self.rook(sq, occupancy) | self.bishop(sq, occupancy)
    }

    /// Attack set of a non-pawn piece.
    #[inline]
    #[must_use]
    pub fn piece(&self, piece: Piece, sq: Square, occupancy: Bitboard) -> Bitboard {
        match piece {
            Piece::Knight => self.knight(sq),
            Piece::Bishop => self.bishop(sq, occupancy),
            Piece::Rook => self.rook(sq, occupancy),
            Piece::Queen => self.queen(sq, occupancy),
            Piece::King => self.king(sq),
            Piece::Pawn => Bitboard::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::types::{Bitboard, Color, Square};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn leaper_counts() {
        let tables = &crate::init().attacks;
        assert_eq!(tables.knight(sq("a1")).popcount(), 2);
        assert_eq!(tables.knight(sq("d4")).popcount(), 8);
        assert_eq!(tables.king(sq("h8")).popcount(), 3);
        assert_eq!(tables.pawn(Color::White, sq("a2")), Bitboard::from_square(sq("b3")));
        assert_eq!(tables.pawn(Color::Black, sq("e5")).popcount(), 2);
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let tables = &crate::init().attacks;
        let occ = Bitboard::from_square(sq("d6")) | Bitboard::from_square(sq("f4"));
        let rook = tables.rook(sq("d4"), occ);
        assert!(rook.contains(sq("d6")));
        assert!(!rook.contains(sq("d7")));
        assert!(rook.contains(sq("f4")));
        assert!(!rook.contains(sq("g4")));
        assert_eq!(tables.rook(sq("a1"), Bitboard::EMPTY).popcount(), 14);
        assert_eq!(tables.bishop(sq("d4"), Bitboard::EMPTY).popcount(), 13);
        assert_eq!(tables.queen(sq("d4"), Bitboard::EMPTY).popcount(), 27);
    }
}
