//! Castling rights and castle geometry.
//!
//! Rights are kept as the set of rook origin squares whose rook may still
//! castle. Moving a king clears both of its rooks; moving from or capturing
//! on a rook corner clears that corner.

use super::bitboard::Bitboard;
use super::piece::Color;
use super::square::Square;

/// Every corner that can carry a castling right.
pub const ALL_CASTLING: Bitboard = Bitboard(
    (1 << Square::A1.index())
        | (1 << Square::H1.index())
        | (1 << Square::A8.index())
        | (1 << Square::H8.index()),
);

/// Squares and masks describing one castle.
#[derive(Clone, Copy, Debug)]
pub struct CastleGeometry {
    pub color: Color,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty (between king and rook, plus destinations).
    pub empty: Bitboard,
    /// Squares the king stands on or crosses; none may be attacked.
    pub king_path: Bitboard,
}

const fn bb(squares: &[u8]) -> Bitboard {
    let mut bits = 0u64;
    let mut i = 0;
    while i < squares.len() {
        bits |= 1u64 << squares[i];
        i += 1;
    }
    Bitboard(bits)
}

/// White king side, white queen side, black king side, black queen side.
pub const CASTLES: [CastleGeometry; 4] = [
    CastleGeometry {
        color: Color::White,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        empty: bb(&[5, 6]),
        king_path: bb(&[4, 5, 6]),
    },
    CastleGeometry {
        color: Color::White,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        empty: bb(&[1, 2, 3]),
        king_path: bb(&[2, 3, 4]),
    },
    CastleGeometry {
        color: Color::Black,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        empty: bb(&[61, 62]),
        king_path: bb(&[60, 61, 62]),
    },
    CastleGeometry {
        color: Color::Black,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        empty: bb(&[57, 58, 59]),
        king_path: bb(&[58, 59, 60]),
    },
];

/// Geometry of the castle whose king lands on `king_to`.
///
/// Only meaningful for the four castle destinations; anything else maps to
/// black's queen side.
#[inline]
#[must_use]
pub fn castle_geometry(king_to: Square) -> &'static CastleGeometry {
    match king_to {
        Square::G1 => &CASTLES[0],
        Square::C1 => &CASTLES[1],
        Square::G8 => &CASTLES[2],
        _ => &CASTLES[3],
    }
}

/// Rights cleared by a move touching `sq` (as origin or destination).
const fn build_clear_table() -> [u64; 64] {
    let mut table = [0u64; 64];
    table[Square::A1.index()] = 1 << Square::A1.index();
    table[Square::H1.index()] = 1 << Square::H1.index();
    table[Square::E1.index()] = (1 << Square::A1.index()) | (1 << Square::H1.index());
    table[Square::A8.index()] = 1 << Square::A8.index();
    table[Square::H8.index()] = 1 << Square::H8.index();
    table[Square::E8.index()] = (1 << Square::A8.index()) | (1 << Square::H8.index());
    table
}

static CASTLE_CLEAR: [u64; 64] = build_clear_table();

/// Apply the rights update for a move from `from` to `to`.
#[inline]
#[must_use]
pub fn update_rights(rights: Bitboard, from: Square, to: Square) -> Bitboard {
    Bitboard(rights.0 & !(CASTLE_CLEAR[from.index()] | CASTLE_CLEAR[to.index()]))
}

/// FEN castling field for a rights set (`-` when empty).
#[must_use]
pub fn rights_to_fen(rights: Bitboard) -> String {
    let mut out = String::new();
    for (sq, c) in [
        (Square::H1, 'K'),
        (Square::A1, 'Q'),
        (Square::H8, 'k'),
        (Square::A8, 'q'),
    ] {
        if rights.contains(sq) {
            out.push(c);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_move_clears_both_rights() {
        let rights = update_rights(ALL_CASTLING, Square::E1, Square::F1);
        assert_eq!(rights_to_fen(rights), "kq");
    }

    #[test]
    fn rook_capture_clears_corner() {
        let h8 = Square::H8;
        let rights = update_rights(ALL_CASTLING, Square::B1, h8);
        assert_eq!(rights_to_fen(rights), "KQq");
    }
}
