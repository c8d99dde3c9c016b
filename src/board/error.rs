//! Error types for board setup and move parsing.

use std::fmt;

/// Error type for FEN parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN must carry placement, side, castling and en passant fields.
    TooFewParts { found: usize },
    /// More than six whitespace-separated fields.
    TooManyParts { found: usize },
    /// Invalid piece character in the placement field.
    InvalidPiece { char: char },
    /// Placement does not describe exactly eight ranks.
    WrongRankCount { found: usize },
    /// A rank describes a number of files other than eight.
    BadRankLength { rank: usize, files: usize },
    /// Side to move must be `w` or `b`.
    InvalidSideToMove { found: String },
    /// Castling field character outside `KQkq-`.
    InvalidCastling { char: char },
    /// En passant field is not `-` or a rank-3/rank-6 square.
    InvalidEnPassant { found: String },
    /// Half-move or full-move counter is not a number.
    InvalidCounter { found: String },
    /// Each side needs exactly one king.
    KingCount { white: u32, black: u32 },
    /// A pawn stands on the first or last rank.
    PawnOnBackRank,
    /// The side not to move is in check.
    OpponentInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 fields, found {found}")
            }
            FenError::TooManyParts { found } => {
                write!(f, "FEN must have at most 6 fields, found {found}")
            }
            FenError::InvalidPiece { char } => write!(f, "invalid piece character '{char}'"),
            FenError::WrongRankCount { found } => {
                write!(f, "placement must have 8 ranks, found {found}")
            }
            FenError::BadRankLength { rank, files } => {
                write!(f, "rank {rank} describes {files} files")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastling { char } => write!(f, "invalid castling character '{char}'"),
            FenError::InvalidEnPassant { found } => write!(f, "invalid en passant square '{found}'"),
            FenError::InvalidCounter { found } => write!(f, "invalid move counter '{found}'"),
            FenError::KingCount { white, black } => {
                write!(f, "expected one king per side, found {white} white and {black} black")
            }
            FenError::PawnOnBackRank => write!(f, "pawn on first or last rank"),
            FenError::OpponentInCheck => write!(f, "side not to move is in check"),
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for coordinate-notation move parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move text must be 4 or 5 characters.
    InvalidLength { len: usize },
    /// Origin or destination is not a square.
    InvalidSquare { notation: String },
    /// Promotion suffix is not one of `nbrq`.
    InvalidPromotion { char: char },
    /// Well-formed, but not legal in the current position.
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "move must be 4 or 5 characters, got {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "invalid square in move '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => write!(f, "illegal move '{notation}'"),
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    InvalidLength { len: usize },
    InvalidFile { char: char },
    InvalidRank { char: char },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidLength { len } => {
                write!(f, "square must be 2 characters, got {len}")
            }
            SquareError::InvalidFile { char } => write!(f, "invalid file '{char}'"),
            SquareError::InvalidRank { char } => write!(f, "invalid rank '{char}'"),
        }
    }
}

impl std::error::Error for SquareError {}

/// Error raised when setting up a position from text plus a move list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    Fen(FenError),
    Move { index: usize, error: MoveParseError },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::Fen(e) => write!(f, "bad position: {e}"),
            PositionError::Move { index, error } => write!(f, "bad move #{}: {error}", index + 1),
        }
    }
}

impl std::error::Error for PositionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PositionError::Fen(e) => Some(e),
            PositionError::Move { error, .. } => Some(error),
        }
    }
}

impl From<FenError> for PositionError {
    fn from(e: FenError) -> Self {
        PositionError::Fen(e)
    }
}
