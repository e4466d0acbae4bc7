//! Pawn capture tables and push geometry.
//!
//! `pawn_attacks(color, sq)` is the set of squares a pawn of `color` on `sq`
//! attacks. Reading the table with the opposite colour answers the reverse
//! question: which squares a `color` pawn must stand on to attack `sq`.

use crate::game_state::bitset::BitSet;
use crate::game_state::chess_types::{Color, Square};
use crate::moves::king_moves::leaper_table;

pub const WHITE_PAWN_ATTACKS: [BitSet; 64] = leaper_table(&[(-1, 1), (1, 1)]);
pub const BLACK_PAWN_ATTACKS: [BitSet; 64] = leaper_table(&[(-1, -1), (1, -1)]);

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> BitSet {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

/// Signed square delta of a single push.
#[inline]
pub const fn push_delta(color: Color) -> i8 {
    match color {
        Color::White => 8,
        Color::Black => -8,
    }
}

#[inline]
pub const fn start_rank(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

#[inline]
pub const fn promotion_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}
