//! Bishop, rook and queen attacks traced ray by ray against an occupancy
//! mask. The first blocker on each ray is included in the attack set.

use crate::game_state::bitset::BitSet;
use crate::game_state::chess_types::Square;

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

#[inline]
pub fn bishop_attacks(square: Square, occupancy: BitSet) -> BitSet {
    trace_rays(square, occupancy, &DIAGONALS)
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: BitSet) -> BitSet {
    trace_rays(square, occupancy, &ORTHOGONALS)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: BitSet) -> BitSet {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

fn trace_rays(square: Square, occupancy: BitSet, directions: &[(i8, i8)]) -> BitSet {
    let mut attacks = BitSet::EMPTY;

    for &(df, dr) in directions {
        let mut file = (square % 8) as i8 + df;
        let mut rank = (square / 8) as i8 + dr;

        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let target = (rank * 8 + file) as Square;
            attacks.insert(target);
            if occupancy.contains(target) {
                break;
            }
            file += df;
            rank += dr;
        }
    }

    attacks
}
