//! Pseudo-legal and legal move generation.
//!
//! Generation is split by mode so the move orderer can produce captures
//! and quiet moves in separate stages. Legality is decided by making the
//! move and testing whether the mover's king is attacked.

mod castling;
mod pawns;
mod pieces;

use super::state::Board;
use super::types::{Move, MoveFlag, MoveList, Piece};

/// Which subset of moves to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenMode {
    /// Every pseudo-legal move.
    All,
    /// Captures, promotions and en passant.
    Noisy,
    /// Everything else, castling included.
    Quiet,
}

impl Board {
    /// Append pseudo-legal moves of the given mode to `list`.
    pub fn generate_pseudo(&self, mode: GenMode, list: &mut MoveList) {
        let us = self.side;
        let targets = match mode {
            GenMode::All => !self.color(us),
            GenMode::Noisy => self.color(!us),
            GenMode::Quiet => !self.occupied(),
        };

        self.generate_pawn_moves(mode, list);
        self.generate_piece_moves(targets, list);
        if mode != GenMode::Noisy {
            self.generate_castles(list);
        }
    }

    /// Legal moves of the given mode.
    pub fn generate_legal(&mut self, mode: GenMode) -> MoveList {
        let mut pseudo = MoveList::new();
        self.generate_pseudo(mode, &mut pseudo);
        let mut legal = MoveList::new();
        for &mv in pseudo.iter() {
            if self.is_legal(mv) {
                legal.push(mv);
            }
        }
        legal
    }

    /// All legal moves.
    pub fn legal_moves(&mut self) -> MoveList {
        self.generate_legal(GenMode::All)
    }

    /// Whether a pseudo-legal move keeps the mover's king safe.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        self.make_move(mv);
        let legal = !self.left_king_in_check();
        self.unmake_move();
        legal
    }

    /// Side to move has no legal move.
    pub fn has_no_moves(&mut self) -> bool {
        let mut pseudo = MoveList::new();
        self.generate_pseudo(GenMode::All, &mut pseudo);
        !pseudo.iter().any(|&mv| self.is_legal(mv))
    }

    /// A noisy move captures, promotes, or takes en passant.
    #[inline]
    #[must_use]
    pub fn is_noisy(&self, mv: Move) -> bool {
        match mv.flag() {
            MoveFlag::EnPassant | MoveFlag::Promotion => true,
            MoveFlag::Castle => false,
            MoveFlag::Normal => self.mailbox[mv.to().index()].is_some(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_quiet(&self, mv: Move) -> bool {
        !self.is_noisy(mv)
    }

    /// Check that a move taken from outside the generator (hash or killer
    /// move) could have been generated in this position.
    #[must_use]
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_null() || mv.is_malformed() {
            return false;
        }
        let us = self.side;
        let (from, to) = (mv.from(), mv.to());
        let piece = match self.mailbox[from.index()] {
            Some((color, piece)) if color == us => piece,
            _ => return false,
        };
        if self.color(us).contains(to) {
            return false;
        }

        let a = &self.tables.attacks;
        let last_rank = (!us).back_rank();
        match mv.flag() {
            MoveFlag::Castle => piece == Piece::King && self.castle_available(from, to),
            MoveFlag::EnPassant => {
                piece == Piece::Pawn
                    && self.en_passant == Some(to)
                    && a.pawn(us, from).contains(to)
            }
            MoveFlag::Promotion => {
                piece == Piece::Pawn && to.rank() == last_rank && self.pawn_reaches(from, to)
            }
            MoveFlag::Normal if piece == Piece::Pawn => {
                to.rank() != last_rank && self.pawn_reaches(from, to)
            }
            MoveFlag::Normal => a.piece(piece, from, self.occupied()).contains(to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noisy_and_quiet_partition_all_moves() {
        let mut board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let mut all = MoveList::new();
        let mut noisy = MoveList::new();
        let mut quiet = MoveList::new();
        board.generate_pseudo(GenMode::All, &mut all);
        board.generate_pseudo(GenMode::Noisy, &mut noisy);
        board.generate_pseudo(GenMode::Quiet, &mut quiet);
        assert_eq!(all.len(), noisy.len() + quiet.len());
        for mv in noisy.iter() {
            assert!(board.is_noisy(*mv));
            assert!(!quiet.contains(*mv));
        }
        assert_eq!(board.legal_moves().len(), 48);
    }

    #[test]
    fn pseudo_legal_check_agrees_with_generator() {
        let board =
            Board::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
        let mut all = MoveList::new();
        board.generate_pseudo(GenMode::All, &mut all);
        for mv in all.iter() {
            assert!(board.is_pseudo_legal(*mv), "{mv} should be pseudo-legal");
        }

        let start = Board::startpos();
        let e2: crate::board::Square = "e2".parse().unwrap();
        let e5: crate::board::Square = "e5".parse().unwrap();
        assert!(!start.is_pseudo_legal(Move::normal(e2, e5)));
        assert!(!start.is_pseudo_legal(Move::NULL));
        assert!(!start.is_pseudo_legal(Move::castle(
            crate::board::Square::E1,
            crate::board::Square::G1
        )));
    }
}
