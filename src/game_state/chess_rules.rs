//! Canonical chess-rule constants.
//!
//! The starting arrangement is stored as a full six-field FEN; loaders also
//! accept the four-field form and default the counters to `0 1`.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-move clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Capacity of the past-hash buffer kept for repetition checks.
pub const HASH_HISTORY_CAPACITY: usize = 1024;
