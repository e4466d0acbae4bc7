//! Square conversions for coordinate notation.
//!
//! Converts between human-readable coordinates (e.g. `e4`) and square
//! indices and masks. Used by the FEN codec and the protocol move parser.

use crate::game_state::bitset::BitSet;
use crate::game_state::chess_types::Square;

/// Convert a coordinate (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Option<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return None;
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }

    Some((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to a coordinate (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    debug_assert!(square < 64, "square index out of range: {square}");
    let square = square & 63;
    let file_char = char::from(b'a' + square % 8);
    let rank_char = char::from(b'1' + square / 8);
    format!("{file_char}{rank_char}")
}

/// Convert a one-hot mask to a coordinate; `None` unless exactly one bit is set.
#[inline]
pub fn bitset_to_algebraic(set: BitSet) -> Option<String> {
    if set.len() != 1 {
        return None;
    }
    set.lowest().map(square_to_algebraic)
}
