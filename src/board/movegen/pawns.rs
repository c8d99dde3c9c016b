//! Pawn pushes, captures, promotions and en passant.

use super::super::state::Board;
use super::super::types::{Bitboard, Color, Move, MoveList, Piece, Square};
use super::GenMode;

#[inline]
fn push_promotions(list: &mut MoveList, from: Square, to: Square) {
    for piece in [Piece::Queen, Piece::Knight, Piece::Rook, Piece::Bishop] {
        list.push(Move::promotion(from, to, piece));
    }
}

/// Emit one move per target, promoting on the last rank.
#[inline]
fn push_targets(list: &mut MoveList, targets: Bitboard, delta: i8, last_rank: Bitboard) {
    for to in targets & !last_rank {
        list.push(Move::normal(to.offset(-delta), to));
    }
    for to in targets & last_rank {
        push_promotions(list, to.offset(-delta), to);
    }
}

impl Board {
    pub(super) fn generate_pawn_moves(&self, mode: GenMode, list: &mut MoveList) {
        let us = self.side;
        let pawns = self.colored(us, Piece::Pawn);
        let empty = !self.occupied();
        let enemies = self.color(!us);

        // `up` is the board-index step of one forward push.
        let (up, third_rank, last_rank) = match us {
            Color::White => (8i8, Bitboard::rank_mask(2), Bitboard::RANK_8),
            Color::Black => (-8i8, Bitboard::rank_mask(5), Bitboard::RANK_1),
        };
        let forward = |bb: Bitboard| match us {
            Color::White => bb.shift_north(),
            Color::Black => bb.shift_south(),
        };

        let single = forward(pawns) & empty;

        if mode != GenMode::Noisy {
            for to in single & !last_rank {
                list.push(Move::normal(to.offset(-up), to));
            }
            let double = forward(single & third_rank) & empty;
            for to in double {
                list.push(Move::normal(to.offset(-2 * up), to));
            }
        }

        if mode == GenMode::Quiet {
            return;
        }

        for to in single & last_rank {
            push_promotions(list, to.offset(-up), to);
        }

        let advanced = forward(pawns);
        // West captures step one file toward a, east captures toward h.
        push_targets(list, advanced.shift_west() & enemies, up - 1, last_rank);
        push_targets(list, advanced.shift_east() & enemies, up + 1, last_rank);

        if let Some(target) = self.en_passant {
            let takers = self.tables.attacks.pawn(!us, target) & pawns;
            for from in takers {
                list.push(Move::en_passant(from, target));
            }
        }
    }

    /// A pawn on `from` can reach `to` by push or capture right now.
    pub(super) fn pawn_reaches(&self, from: Square, to: Square) -> bool {
        let us = self.side;
        if self.tables.attacks.pawn(us, from).contains(to) {
            return self.color(!us).contains(to);
        }
        let occupied = self.occupied();
        let up: i8 = match us {
            Color::White => 8,
            Color::Black => -8,
        };
        let one = from.index() as i8 + up;
        if !(0..64).contains(&one) {
            return false;
        }
        let one = Square::new(one as u8);
        if to == one {
            return !occupied.contains(to);
        }
        let start_rank = match us {
            Color::White => 1,
            Color::Black => 6,
        };
        from.rank() == start_rank
            && to.index() as i8 == one.index() as i8 + up
            && !occupied.contains(one)
            && !occupied.contains(to)
    }
}
