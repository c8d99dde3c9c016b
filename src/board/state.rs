use std::fmt;

use crate::tables::Tables;

use super::eval::{Accumulator, EvalStack};
use super::types::{Bitboard, Color, Move, Piece, Square};

/// Most plies the undo history can hold (game moves plus search depth).
pub const MAX_GAME_PLY: usize = 1024;

/// State needed to reverse one made move (or null move).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Undo {
    pub(crate) mv: Move,
    pub(crate) captured: Option<Piece>,
    pub(crate) castling: Bitboard,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove: u16,
    /// Fingerprint of the position before the move.
    pub(crate) hash: u64,
    pub(crate) null: bool,
}

/// Fixed-capacity undo history with a length cursor.
#[derive(Clone)]
pub(crate) struct UndoStack {
    entries: Box<[Undo]>,
    len: usize,
}

impl UndoStack {
    fn new() -> Self {
        UndoStack {
            entries: vec![Undo::default(); MAX_GAME_PLY].into_boxed_slice(),
            len: 0,
        }
    }

    /// Push a record. Overflow means the caller made more moves than any
    /// game plus search can reach, which is a usage error.
    #[inline]
    pub(crate) fn push(&mut self, undo: Undo) {
        assert!(
            self.len < MAX_GAME_PLY,
            "undo stack overflow: more than {MAX_GAME_PLY} plies made without unmaking"
        );
        self.entries[self.len] = undo;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Undo {
        assert!(self.len > 0, "unmake called with no move to take back");
        self.len -= 1;
        self.entries[self.len]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Record `back` plies ago (1 = most recent).
    #[inline]
    pub(crate) fn back(&self, back: usize) -> &Undo {
        &self.entries[self.len - back]
    }
}

/// A chess position with incremental make/unmake.
///
/// Piece placement is kept three ways (per-type bitboards, per-color
/// bitboards and a square mailbox) and all three always agree. The
/// fingerprint always equals [`Board::compute_hash`].
#[derive(Clone)]
pub struct Board {
    pub(crate) pieces: [Bitboard; 6],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) mailbox: [Option<(Color, Piece)>; 64],
    pub(crate) side: Color,
    /// Rook origin squares that may still castle.
    pub(crate) castling: Bitboard,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove: u16,
    pub(crate) fullmove: u16,
    pub(crate) hash: u64,
    pub(crate) undo: UndoStack,
    pub(crate) eval: EvalStack,
    pub(crate) tables: &'static Tables,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::startpos()
    }

    /// Standard starting position.
    #[must_use]
    pub fn startpos() -> Self {
        Board::from_fen(super::fen::STARTPOS_FEN)
    }

    /// Board with no pieces, white to move, bound to `tables`.
    pub(crate) fn empty(tables: &'static Tables) -> Self {
        Board {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            mailbox: [None; 64],
            side: Color::White,
            castling: Bitboard::EMPTY,
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
            hash: 0,
            undo: UndoStack::new(),
            eval: EvalStack::new(MAX_GAME_PLY + 1),
            tables,
        }
    }

    #[inline]
    #[must_use]
    pub fn tables(&self) -> &'static Tables {
        self.tables
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> Bitboard {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.mailbox[sq.index()]
    }

    /// All pieces of one type, both colors.
    #[inline]
    #[must_use]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn colored(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.colored(color, Piece::King);
        debug_assert!(kings.any(), "no {color:?} king on the board");
        Square::new(kings.0.trailing_zeros() as u8)
    }

    /// Plies made since the position was set up.
    #[inline]
    #[must_use]
    pub fn game_ply(&self) -> usize {
        self.undo.len()
    }

    /// The last move made and the piece now standing on its destination.
    /// `None` after a null move or with no history.
    #[must_use]
    pub fn last_move(&self) -> Option<(Move, Piece)> {
        if self.undo.len() == 0 {
            return None;
        }
        let undo = self.undo.back(1);
        if undo.null {
            return None;
        }
        self.mailbox[undo.mv.to().index()].map(|(_, piece)| (undo.mv, piece))
    }

    /// The most recent ply was a null move.
    #[inline]
    #[must_use]
    pub fn last_was_null(&self) -> bool {
        self.undo.len() > 0 && self.undo.back(1).null
    }

    /// True if `color` has anything besides pawns and king.
    #[must_use]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pawns_and_king = self.pieces(Piece::Pawn) | self.pieces(Piece::King);
        (self.color(color) & !pawns_and_king).any()
    }

    /// Fingerprint computed from scratch.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let z = &self.tables.zobrist;
        let mut hash = 0u64;
        for sq in self.occupied() {
            if let Some((color, piece)) = self.mailbox[sq.index()] {
                hash ^= z.piece(color, piece, sq);
            }
        }
        if self.side == Color::Black {
            hash ^= z.side();
        }
        hash ^= z.castling(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= z.en_passant(ep);
        }
        hash
    }

    /// Evaluation state built from scratch.
    #[must_use]
    pub(crate) fn compute_accumulator(&self) -> Accumulator {
        let mut acc = Accumulator::default();
        for sq in self.occupied() {
            if let Some((color, piece)) = self.mailbox[sq.index()] {
                acc.add(color, piece, sq);
            }
        }
        acc
    }

    /// Place a piece without touching the fingerprint or evaluation.
    #[inline]
    pub(crate) fn put(&mut self, color: Color, piece: Piece, sq: Square) {
        let bb = Bitboard::from_square(sq);
        self.pieces[piece.index()] |= bb;
        self.colors[color.index()] |= bb;
        self.mailbox[sq.index()] = Some((color, piece));
    }

    /// Remove a piece without touching the fingerprint or evaluation.
    #[inline]
    pub(crate) fn lift(&mut self, color: Color, piece: Piece, sq: Square) {
        let bb = !Bitboard::from_square(sq);
        self.pieces[piece.index()] &= bb;
        self.colors[color.index()] &= bb;
        self.mailbox[sq.index()] = None;
    }

    // ---------------------------------------------------------------
    // Draw detection
    // ---------------------------------------------------------------

    /// Draw by repetition, fifty-move rule or insufficient material.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.halfmove >= 100 || self.is_insufficient_material() || self.is_repetition()
    }

    /// The current position occurred before within the reversible-move window.
    ///
    /// The scan stops at a null move: positions on the far side of one were
    /// never really reached by the game.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        let limit = usize::from(self.halfmove).min(self.undo.len());
        for back in 1..=limit {
            let undo = self.undo.back(back);
            if undo.null {
                return false;
            }
            if back % 2 == 0 && undo.hash == self.hash {
                return true;
            }
        }
        false
    }

    /// Neither side can possibly mate.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces(Piece::Pawn) | self.pieces(Piece::Rook) | self.pieces(Piece::Queen);
        if heavy.any() {
            return false;
        }
        let knights = self.pieces(Piece::Knight);
        let bishops = self.pieces(Piece::Bishop);
        let minors = knights | bishops;
        match minors.popcount() {
            0 | 1 => true,
            _ => {
                // Only bishops, all on one square color.
                knights.is_empty()
                    && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                        || (bishops & Bitboard::DARK_SQUARES).is_empty())
            }
        }
    }
}

impl PartialEq for Board {
    /// Positions compare equal when placement, side, rights, en passant
    /// square, clocks and fingerprint all match. History is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.colors == other.colors
            && self.mailbox == other.mailbox
            && self.side == other.side
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove == other.halfmove
            && self.fullmove == other.fullmove
            && self.hash == other.hash
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8usize).rev() {
            for file in 0..8usize {
                let c = match self.mailbox[rank * 8 + file] {
                    Some((Color::White, piece)) => piece.to_char().to_ascii_uppercase(),
                    Some((Color::Black, piece)) => piece.to_char(),
                    None => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "{}", self.to_fen())
    }
}
