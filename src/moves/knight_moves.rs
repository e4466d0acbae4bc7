use crate::game_state::bitset::BitSet;
use crate::game_state::chess_types::Square;
use crate::moves::king_moves::leaper_table;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KNIGHT_ATTACKS: [BitSet; 64] = leaper_table(&KNIGHT_OFFSETS);

#[inline]
pub const fn knight_attacks(square: Square) -> BitSet {
    KNIGHT_ATTACKS[square as usize]
}
