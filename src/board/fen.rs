use std::str::FromStr;

use crate::tables;

use super::castling::rights_to_fen;
use super::error::{FenError, MoveParseError, PositionError};
use super::state::Board;
use super::types::{Bitboard, Color, Move, Piece, Square};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn parse_counter(text: Option<&str>, default: u16) -> Result<u16, FenError> {
    match text {
        None => Ok(default),
        Some(t) => t.parse().map_err(|_| FenError::InvalidCounter {
            found: t.to_string(),
        }),
    }
}

impl Board {
    /// Parse a position from FEN.
    ///
    /// The half-move and full-move counters are optional. Castling rights
    /// whose king or rook is not on its home square are dropped, and an en
    /// passant square no pawn can capture on is cleared.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyParts { found: parts.len() });
        }

        let mut board = Board::empty(tables::init());

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::BadRankLength {
                        rank: rank + 1,
                        files: file + 1,
                    });
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                board.put(color, piece, Square::from_coords(rank as u8, file as u8));
                file += 1;
            }
            if file != 8 {
                return Err(FenError::BadRankLength {
                    rank: rank + 1,
                    files: file,
                });
            }
        }

        let white_kings = board.colored(Color::White, Piece::King).popcount();
        let black_kings = board.colored(Color::Black, Piece::King).popcount();
        if white_kings != 1 || black_kings != 1 {
            return Err(FenError::KingCount {
                white: white_kings,
                black: black_kings,
            });
        }
        if (board.pieces(Piece::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).any() {
            return Err(FenError::PawnOnBackRank);
        }

        board.side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                let (color, rook, king) = match c {
                    'K' => (Color::White, Square::H1, Square::E1),
                    'Q' => (Color::White, Square::A1, Square::E1),
                    'k' => (Color::Black, Square::H8, Square::E8),
                    'q' => (Color::Black, Square::A8, Square::E8),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                };
                if board.mailbox[rook.index()] == Some((color, Piece::Rook))
                    && board.mailbox[king.index()] == Some((color, Piece::King))
                {
                    board.castling |= Bitboard::from_square(rook);
                }
            }
        }

        if parts[3] != "-" {
            let target: Square = parts[3].parse().map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            let expected_rank = match board.side {
                Color::White => 5,
                Color::Black => 2,
            };
            if target.rank() != expected_rank {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            let takers = board.tables.attacks.pawn(!board.side, target)
                & board.colored(board.side, Piece::Pawn);
            if takers.any() {
                board.en_passant = Some(target);
            }
        }

        board.halfmove = parse_counter(parts.get(4).copied(), 0)?;
        board.fullmove = parse_counter(parts.get(5).copied(), 1)?.max(1);

        if board.is_attacked(board.king_square(!board.side), board.side) {
            return Err(FenError::OpponentInCheck);
        }

        board.hash = board.compute_hash();
        board.recompute_eval();
        Ok(board)
    }

    /// Parse a FEN known to be valid.
    ///
    /// # Panics
    /// On malformed input; use [`Board::try_from_fen`] for untrusted text.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        match Self::try_from_fen(fen) {
            Ok(board) => board,
            Err(e) => panic!("invalid FEN '{fen}': {e}"),
        }
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.mailbox[Square::from_coords(rank, file).index()] {
                    None => empty += 1,
                    Some((color, piece)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        let c = piece.to_char();
                        placement.push(if color == Color::White {
                            c.to_ascii_uppercase()
                        } else {
                            c
                        });
                    }
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{placement} {side} {} {ep} {} {}",
            rights_to_fen(self.castling),
            self.halfmove,
            self.fullmove
        )
    }

    /// Resolve coordinate notation (`e2e4`, `e7e8q`, `e1g1`) to a legal move.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }
        let square = |s: &str| {
            s.parse::<Square>().map_err(|_| MoveParseError::InvalidSquare {
                notation: text.to_string(),
            })
        };
        let from = square(&text[0..2])?;
        let to = square(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Parse and play a coordinate-notation move.
    pub fn make_move_uci(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(text)?;
        self.make_move(mv);
        Ok(mv)
    }

    /// Set up a position from FEN and replay `moves` on it.
    ///
    /// Either the whole setup succeeds or an error is returned; no partially
    /// applied position is ever produced.
    pub fn from_position(fen: &str, moves: &[&str]) -> Result<Self, PositionError> {
        let mut board = Self::try_from_fen(fen)?;
        for (index, text) in moves.iter().enumerate() {
            board
                .make_move_uci(text)
                .map_err(|error| PositionError::Move { index, error })?;
        }
        Ok(board)
    }

    /// Replay moves on this position; on any failure the position is left
    /// exactly as it was.
    pub fn apply_uci_moves(&mut self, moves: &[&str]) -> Result<(), PositionError> {
        let mut scratch = self.clone();
        for (index, text) in moves.iter().enumerate() {
            scratch
                .make_move_uci(text)
                .map_err(|error| PositionError::Move { index, error })?;
        }
        *self = scratch;
        Ok(())
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trips() {
        let board = Board::startpos();
        assert_eq!(board.to_fen(), STARTPOS_FEN);
        assert_eq!(board.hash(), board.compute_hash());
    }

    #[test]
    fn rejects_malformed_setups() {
        assert!(matches!(
            Board::try_from_fen("8/8/8/8 w - -"),
            Err(FenError::WrongRankCount { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::BadRankLength { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::KingCount { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("4k3/8/8/8/8/8/8/4KR2 w X - 0 1"),
            Err(FenError::InvalidCastling { char: 'X' })
        ));
        assert!(matches!(
            Board::try_from_fen("4k3/8/8/8/8/8/8/4K3 w - - zero 1"),
            Err(FenError::InvalidCounter { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::OpponentInCheck)
        ));
    }

    #[test]
    fn uncapturable_en_passant_square_is_dropped() {
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_eq!(board.en_passant(), None);
        let board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        assert_eq!(board.en_passant(), Some("f6".parse().unwrap()));
    }

    #[test]
    fn parse_move_requires_legality() {
        let mut board = Board::startpos();
        assert!(board.parse_move("e2e4").is_ok());
        assert!(matches!(
            board.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            board.parse_move("e2"),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            board.parse_move("z2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            board.parse_move("e2e4x"),
            Err(MoveParseError::InvalidPromotion { char: 'x' })
        ));
    }

    #[test]
    fn failed_replay_leaves_position_unchanged() {
        let mut board = Board::startpos();
        let before = board.clone();
        let err = board.apply_uci_moves(&["e2e4", "e7e5", "e1e3"]).unwrap_err();
        assert!(matches!(err, PositionError::Move { index: 2, .. }));
        assert_eq!(board, before);

        board.apply_uci_moves(&["e2e4", "e7e5", "g1f3"]).unwrap();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }
}
