//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on one square, each side always
//! recapturing with its least valuable attacker, and returns the material
//! balance for the side making the first capture.

use super::state::Board;
use super::types::{Bitboard, Color, Move, MoveFlag, Piece};

/// Piece values for exchange evaluation.
pub(crate) const SEE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 20000];

const MAX_EXCHANGES: usize = 32;

impl Board {
    /// Material outcome of `mv` on its destination square, in centipawns,
    /// from the mover's point of view. Castling and quiet moves score 0
    /// unless they hang the moving piece.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        if mv.flag() == MoveFlag::Castle {
            return 0;
        }
        let (from, to) = (mv.from(), mv.to());
        let mut attacker = match self.mailbox[from.index()] {
            Some((_, piece)) => piece,
            None => return 0,
        };

        let mut occupancy = self.occupied();
        let mut gain = [0i32; MAX_EXCHANGES];

        gain[0] = match mv.flag() {
            MoveFlag::EnPassant => {
                occupancy ^= Bitboard::from_square(Self::en_passant_victim(from, to));
                SEE_VALUES[Piece::Pawn.index()]
            }
            _ => self.mailbox[to.index()].map_or(0, |(_, p)| SEE_VALUES[p.index()]),
        };
        if let Some(promoted) = mv.promotion_piece() {
            gain[0] += SEE_VALUES[promoted.index()] - SEE_VALUES[Piece::Pawn.index()];
            attacker = promoted;
        }

        occupancy ^= Bitboard::from_square(from);
        let diagonal = self.pieces(Piece::Bishop) | self.pieces(Piece::Queen);
        let straight = self.pieces(Piece::Rook) | self.pieces(Piece::Queen);
        let a = &self.tables.attacks;

        let mut attackers = self.attackers_to(to, occupancy) & occupancy;
        let mut side: Color = !self.side;
        let mut depth = 0;

        loop {
            let ours = attackers & self.color(side);
            let Some((piece, sq)) = self.least_valuable(ours) else {
                break;
            };
            if depth + 1 >= MAX_EXCHANGES {
                break;
            }
            depth += 1;
            // Gain for this side if it captures the piece now on `to`.
            gain[depth] = SEE_VALUES[attacker.index()] - gain[depth - 1];
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            occupancy ^= Bitboard::from_square(sq);
            if matches!(piece, Piece::Pawn | Piece::Bishop | Piece::Queen) {
                attackers |= a.bishop(to, occupancy) & diagonal;
            }
            if matches!(piece, Piece::Rook | Piece::Queen) {
                attackers |= a.rook(to, occupancy) & straight;
            }
            attackers &= occupancy;
            attacker = piece;
            side = !side;
        }

        while depth > 0 {
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
            depth -= 1;
        }
        gain[0]
    }

    /// SEE is at least `threshold`.
    #[inline]
    #[must_use]
    pub fn see_ge(&self, mv: Move, threshold: i32) -> bool {
        self.see(mv) >= threshold
    }

    fn least_valuable(&self, attackers: Bitboard) -> Option<(Piece, super::types::Square)> {
        if attackers.is_empty() {
            return None;
        }
        Piece::ALL
            .iter()
            .find_map(|&p| (attackers & self.pieces(p)).lsb().map(|sq| (p, sq)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn see_of(fen: &str, from: &str, to: &str) -> i32 {
        let board = Board::from_fen(fen);
        let from: Square = from.parse().unwrap();
        let to: Square = to.parse().unwrap();
        board.see(Move::normal(from, to))
    }

    #[test]
    fn undefended_pawn_wins_a_pawn() {
        assert_eq!(see_of("7k/8/8/3p4/4P3/8/8/K7 w - - 0 1", "e4", "d5"), 100);
    }

    #[test]
    fn pawn_trade_is_even() {
        assert_eq!(see_of("7k/8/2p5/3p4/4P3/8/8/K7 w - - 0 1", "e4", "d5"), 0);
    }

    #[test]
    fn knight_for_pawn_loses() {
        assert_eq!(see_of("7k/8/2p5/3p4/8/4N3/8/K7 w - - 0 1", "e3", "d5"), 100 - 320);
    }

    #[test]
    fn queen_takes_defended_pawn() {
        assert_eq!(see_of("7k/8/2p5/3p4/4Q3/8/8/K7 w - - 0 1", "e4", "d5"), 100 - 900);
    }

    #[test]
    fn lone_rook_into_defended_pawn_loses_the_exchange() {
        // Rxd5 Rxd5 and white has nothing left to recapture with.
        assert_eq!(
            see_of("3r3k/8/8/3p4/8/8/8/K2R4 w - - 0 1", "d1", "d5"),
            100 - 500
        );
    }

    #[test]
    fn xray_rook_backs_up_capture() {
        // Rxd5 Rxd5 Rxd5: the rook behind recaptures through the first.
        assert_eq!(
            see_of("3r3k/8/8/3p4/8/8/3R4/K2R4 w - - 0 1", "d2", "d5"),
            100
        );
    }

    #[test]
    fn en_passant_counts_the_pawn() {
        let board = Board::from_fen("7k/8/8/3pP3/8/8/8/K7 w - d6 0 1");
        let mv = Move::en_passant("e5".parse().unwrap(), "d6".parse().unwrap());
        assert_eq!(board.see(mv), 100);
        assert!(board.see_ge(mv, 0));
    }
}
