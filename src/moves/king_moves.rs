//! King attack table, plus the compile-time leaper table builder shared
//! with the knight table.

use crate::game_state::bitset::BitSet;
use crate::game_state::chess_types::Square;

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const KING_ATTACKS: [BitSet; 64] = leaper_table(&KING_OFFSETS);

#[inline]
pub const fn king_attacks(square: Square) -> BitSet {
    KING_ATTACKS[square as usize]
}

/// Builds a 64-entry table of `(file, rank)` jumps, dropping off-board targets.
pub(crate) const fn leaper_table(offsets: &[(i8, i8)]) -> [BitSet; 64] {
    let mut table = [BitSet::EMPTY; 64];
    let mut square = 0usize;

    while square < 64 {
        let file = (square % 8) as i8;
        let rank = (square / 8) as i8;
        let mut mask = 0u64;

        let mut i = 0usize;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            let (f, r) = (file + df, rank + dr);
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                mask |= 1u64 << (r as u32 * 8 + f as u32);
            }
            i += 1;
        }

        table[square] = BitSet::new(mask);
        square += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::king_attacks;

    #[test]
    fn corner_king_sees_three_squares() {
        assert_eq!(king_attacks(0).len(), 3);
        assert_eq!(king_attacks(63).len(), 3);
        assert_eq!(king_attacks(27).len(), 8);
        assert!(king_attacks(0).contains(9));
    }
}
