//! Errors used throughout the engine core.
//!
//! `ChessError` is the single error type returned by board loading, move
//! history, search control and protocol parsing. Every variant is
//! recoverable: the operation that produced it leaves state untouched.
//! `CorruptMoveWord` is only produced by `Move::try_decode`; the panicking
//! `Move::decode` treats a corrupt word as a programming error instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Malformed board, side, castling, en-passant or counter field.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// Push of a move that is not in the legal-move view.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("pop from empty move history")]
    EmptyHistory,

    #[error("pop from empty square set")]
    EmptySet,

    /// Perft or search depth that is not strictly positive.
    #[error("invalid depth {0}: depth must be positive")]
    InvalidDepth(i64),

    #[error("a search is already in progress")]
    AlreadySearching,

    /// Protocol argument that is missing or not a number.
    #[error("invalid value for '{0}'")]
    InvalidArgument(String),

    /// Coordinate-notation move that cannot be parsed.
    #[error("invalid UCI move '{0}'")]
    InvalidUciMove(String),

    #[error("corrupt move word {0:#010x}")]
    CorruptMoveWord(u32),
}

pub type ChessResult<T> = Result<T, ChessError>;
