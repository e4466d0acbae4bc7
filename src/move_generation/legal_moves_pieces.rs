//! Knight and slider moves: every attacked square not held by a friendly piece.

use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::sliding_moves::{bishop_attacks, queen_attacks, rook_attacks};

pub fn generate_piece_moves(board: &BoardState, out: &mut Vec<Move>) {
    let side = board.side_to_move;
    let occupied = board.occupied();
    let not_own = !board.occupancy_of(side);

    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        let piece = Piece::new(kind, side);
        for from in board.pieces[piece.index()] {
            let targets = match kind {
                PieceKind::Knight => knight_attacks(from),
                PieceKind::Bishop => bishop_attacks(from, occupied),
                PieceKind::Rook => rook_attacks(from, occupied),
                _ => queen_attacks(from, occupied),
            };
            push_targets(out, from, targets & not_own, piece);
        }
    }
}

#[inline]
pub(crate) fn push_targets(out: &mut Vec<Move>, from: Square, targets: BitSet, piece: Piece) {
    out.extend(targets.iter().map(|to| Move::quiet(from, to, piece)));
}
