use super::super::state::Board;
use super::super::types::{Bitboard, Move, MoveList, Piece};

impl Board {
    /// Knight, bishop, rook, queen and king moves landing in `targets`.
    pub(super) fn generate_piece_moves(&self, targets: Bitboard, list: &mut MoveList) {
        let us = self.side;
        let occupied = self.occupied();
        let a = &self.tables.attacks;
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            for from in self.colored(us, piece) {
                for to in a.piece(piece, from, occupied) & targets {
                    list.push(Move::normal(from, to));
                }
            }
        }
    }
}
