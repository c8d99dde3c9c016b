//! Attack queries against the current position.

use super::state::Board;
use super::types::{Bitboard, Color, Piece, Square};

impl Board {
    /// Every piece of either color attacking `sq`, given `occupancy`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let a = &self.tables.attacks;
        let diagonal = self.pieces(Piece::Bishop) | self.pieces(Piece::Queen);
        let straight = self.pieces(Piece::Rook) | self.pieces(Piece::Queen);

        (a.pawn(Color::White, sq) & self.colored(Color::Black, Piece::Pawn))
            | (a.pawn(Color::Black, sq) & self.colored(Color::White, Piece::Pawn))
            | (a.knight(sq) & self.pieces(Piece::Knight))
            | (a.king(sq) & self.pieces(Piece::King))
            | (a.bishop(sq, occupancy) & diagonal)
            | (a.rook(sq, occupancy) & straight)
    }

    /// True if any piece of `by` attacks `sq`.
    #[must_use]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        (self.attackers_to(sq, self.occupied()) & self.color(by)).any()
    }

    /// Enemy pieces giving check to the side to move.
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        let king = self.king_square(self.side);
        self.attackers_to(king, self.occupied()) & self.color(!self.side)
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_attacked(self.king_square(self.side), !self.side)
    }

    /// After a move: whether the side that just moved left its king attacked.
    #[inline]
    #[must_use]
    pub fn left_king_in_check(&self) -> bool {
        self.is_attacked(self.king_square(!self.side), self.side)
    }
}
