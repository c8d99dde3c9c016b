//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position fingerprints for the
//! transposition table and repetition detection.

use rand::rngs::StdRng;
use rand::Rng;

use crate::board::castling::ALL_CASTLING;
use crate::board::{Bitboard, Color, Piece, Square};

pub struct ZobristKeys {
    // piece_keys[piece][color][square]
    piece_keys: [[[u64; 64]; 2]; 6],
    side_key: u64,
    // Non-zero only on the four rook corners.
    castling_keys: [u64; 64],
    // Only the file of the en passant target matters.
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    pub(crate) fn generate(rng: &mut StdRng) -> Self {
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let side_key = rng.gen();

        let mut castling_keys = [0u64; 64];
        for sq in ALL_CASTLING {
            castling_keys[sq.index()] = rng.gen();
        }

        let mut en_passant_keys = [0u64; 8];
        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            side_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    #[must_use]
    pub fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn side(&self) -> u64 {
        self.side_key
    }

    /// Combined key for a set of castling-right corners.
    #[inline]
    #[must_use]
    pub fn castling(&self, rights: Bitboard) -> u64 {
        rights
            .iter()
            .fold(0, |acc, sq| acc ^ self.castling_keys[sq.index()])
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_keys[sq.file() as usize]
    }
}
