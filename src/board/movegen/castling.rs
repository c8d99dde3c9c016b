use super::super::castling::{CastleGeometry, CASTLES};
use super::super::state::Board;
use super::super::types::{Move, MoveList, Piece, Square};

impl Board {
    /// Castle allowed: right still held, pieces in place, path empty and
    /// no king square attacked.
    fn can_castle(&self, castle: &CastleGeometry) -> bool {
        let us = self.side;
        castle.color == us
            && self.castling.contains(castle.rook_from)
            && self.mailbox[castle.king_from.index()] == Some((us, Piece::King))
            && self.mailbox[castle.rook_from.index()] == Some((us, Piece::Rook))
            && (self.occupied() & castle.empty).is_empty()
            && castle.king_path.iter().all(|sq| !self.is_attacked(sq, !us))
    }

    pub(super) fn generate_castles(&self, list: &mut MoveList) {
        for castle in CASTLES.iter().filter(|c| c.color == self.side) {
            if self.can_castle(castle) {
                list.push(Move::castle(castle.king_from, castle.king_to));
            }
        }
    }

    pub(super) fn castle_available(&self, king_from: Square, king_to: Square) -> bool {
        CASTLES
            .iter()
            .any(|c| c.king_from == king_from && c.king_to == king_to && self.can_castle(c))
    }
}
