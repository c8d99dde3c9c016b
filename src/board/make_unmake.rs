//! Incremental make/unmake of moves and null moves.

use super::castling::{castle_geometry, update_rights};
use super::state::{Board, Undo};
use super::types::{Color, Move, MoveFlag, Piece, Square};

impl Board {
    #[inline]
    fn add_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.put(color, piece, sq);
        self.hash ^= self.tables.zobrist.piece(color, piece, sq);
        self.eval.top_mut().add(color, piece, sq);
    }

    #[inline]
    fn remove_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.lift(color, piece, sq);
        self.hash ^= self.tables.zobrist.piece(color, piece, sq);
        self.eval.top_mut().remove(color, piece, sq);
    }

    #[inline]
    fn move_piece(&mut self, color: Color, piece: Piece, from: Square, to: Square) {
        self.remove_piece(color, piece, from);
        self.add_piece(color, piece, to);
    }

    /// Square of the pawn taken by an en passant capture.
    #[inline]
    pub(crate) fn en_passant_victim(from: Square, to: Square) -> Square {
        Square::from_coords(from.rank(), to.file())
    }

    /// Apply a pseudo-legal move and push its undo record.
    ///
    /// The move must come from this position's generator (or pass
    /// [`Board::is_pseudo_legal`]); the king may be left in check, which
    /// the caller tests with [`Board::left_king_in_check`].
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side;
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        let moved = match self.mailbox[from.index()] {
            Some((_, piece)) => piece,
            None => panic!("make_move {mv}: no piece on {from}"),
        };
        let captured = if mv.is_en_passant() {
            Some(Piece::Pawn)
        } else {
            self.mailbox[to.index()].map(|(_, piece)| piece)
        };

        self.undo.push(Undo {
            mv,
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove: self.halfmove,
            hash: self.hash,
            null: false,
        });
        self.eval.push();

        let tables = self.tables;
        let z = &tables.zobrist;
        if let Some(ep) = self.en_passant.take() {
            self.hash ^= z.en_passant(ep);
        }

        match mv.flag() {
            MoveFlag::Normal => {
                if let Some(victim) = captured {
                    self.remove_piece(them, victim, to);
                }
                self.move_piece(us, moved, from, to);
                if moved == Piece::Pawn && from.index().abs_diff(to.index()) == 16 {
                    let target = Square::new(((from.index() + to.index()) / 2) as u8);
                    // Only record a target that an enemy pawn could actually take.
                    let takers = tables.attacks.pawn(us, target) & self.colored(them, Piece::Pawn);
                    if takers.any() {
                        self.en_passant = Some(target);
                        self.hash ^= z.en_passant(target);
                    }
                }
            }
            MoveFlag::EnPassant => {
                self.remove_piece(them, Piece::Pawn, Self::en_passant_victim(from, to));
                self.move_piece(us, Piece::Pawn, from, to);
            }
            MoveFlag::Castle => {
                let castle = castle_geometry(to);
                self.move_piece(us, Piece::King, from, to);
                self.move_piece(us, Piece::Rook, castle.rook_from, castle.rook_to);
            }
            MoveFlag::Promotion => {
                if let Some(victim) = captured {
                    self.remove_piece(them, victim, to);
                }
                self.remove_piece(us, Piece::Pawn, from);
                let promoted = mv.promotion_piece().unwrap_or(Piece::Queen);
                self.add_piece(us, promoted, to);
            }
        }

        let rights = update_rights(self.castling, from, to);
        if rights != self.castling {
            self.hash ^= z.castling(self.castling ^ rights);
            self.castling = rights;
        }

        if moved == Piece::Pawn || captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }
        if us == Color::Black {
            self.fullmove += 1;
        }
        self.side = them;
        self.hash ^= z.side();
    }

    /// Take back the most recent move or null move.
    ///
    /// # Panics
    /// If there is nothing to take back.
    pub fn unmake_move(&mut self) {
        let undo = self.undo.pop();
        self.eval.pop();
        self.side = !self.side;
        if self.side == Color::Black {
            self.fullmove -= 1;
        }
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove = undo.halfmove;
        self.hash = undo.hash;
        if undo.null {
            return;
        }

        let us = self.side;
        let them = !us;
        let mv = undo.mv;
        let (from, to) = (mv.from(), mv.to());

        match mv.flag() {
            MoveFlag::Normal => {
                if let Some((_, piece)) = self.mailbox[to.index()] {
                    self.lift(us, piece, to);
                    self.put(us, piece, from);
                }
                if let Some(victim) = undo.captured {
                    self.put(them, victim, to);
                }
            }
            MoveFlag::EnPassant => {
                self.lift(us, Piece::Pawn, to);
                self.put(us, Piece::Pawn, from);
                self.put(them, Piece::Pawn, Self::en_passant_victim(from, to));
            }
            MoveFlag::Castle => {
                let castle = castle_geometry(to);
                self.lift(us, Piece::Rook, castle.rook_to);
                self.put(us, Piece::Rook, castle.rook_from);
                self.lift(us, Piece::King, to);
                self.put(us, Piece::King, from);
            }
            MoveFlag::Promotion => {
                let promoted = mv.promotion_piece().unwrap_or(Piece::Queen);
                self.lift(us, promoted, to);
                self.put(us, Piece::Pawn, from);
                if let Some(victim) = undo.captured {
                    self.put(them, victim, to);
                }
            }
        }
    }

    /// Pass the turn without moving, for null-move pruning.
    pub fn make_null_move(&mut self) {
        self.undo.push(Undo {
            mv: Move::NULL,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove: self.halfmove,
            hash: self.hash,
            null: true,
        });
        self.eval.push();

        let tables = self.tables;
        let z = &tables.zobrist;
        if let Some(ep) = self.en_passant.take() {
            self.hash ^= z.en_passant(ep);
        }
        self.halfmove += 1;
        if self.side == Color::Black {
            self.fullmove += 1;
        }
        self.side = !self.side;
        self.hash ^= z.side();
    }

    /// Take back a null move.
    pub fn unmake_null_move(&mut self) {
        debug_assert!(self.undo.len() > 0 && self.undo.back(1).null);
        self.unmake_move();
    }
}
