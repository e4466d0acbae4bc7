use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::king_moves::king_attacks;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::sliding_moves::{bishop_attacks, rook_attacks};

/// Every piece of either colour attacking `square`, with `occupancy`
/// standing in for the blockers seen by sliders.
pub fn attacks_to_square(board: &BoardState, square: Square, occupancy: BitSet) -> BitSet {
    let mut attackers = BitSet::EMPTY;

    for color in Color::ALL {
        attackers = attackers
            | (pawn_attacks(color.opposite(), square) & board.pieces_of(PieceKind::Pawn, color));
    }

    let knights = board.pieces_of(PieceKind::Knight, Color::White)
        | board.pieces_of(PieceKind::Knight, Color::Black);
    let kings = board.pieces_of(PieceKind::King, Color::White)
        | board.pieces_of(PieceKind::King, Color::Black);
    let queens = board.pieces_of(PieceKind::Queen, Color::White)
        | board.pieces_of(PieceKind::Queen, Color::Black);
    let diagonal = board.pieces_of(PieceKind::Bishop, Color::White)
        | board.pieces_of(PieceKind::Bishop, Color::Black)
        | queens;
    let straight = board.pieces_of(PieceKind::Rook, Color::White)
        | board.pieces_of(PieceKind::Rook, Color::Black)
        | queens;

    attackers
        | (knight_attacks(square) & knights)
        | (king_attacks(square) & kings)
        | (bishop_attacks(square, occupancy) & diagonal)
        | (rook_attacks(square, occupancy) & straight)
}

#[inline]
pub fn attackers_of(board: &BoardState, color: Color, square: Square) -> BitSet {
    attacks_to_square(board, square, board.occupied()) & board.occupancy_of(color)
}

#[inline]
pub fn is_square_attacked(board: &BoardState, square: Square, by: Color) -> bool {
    !attackers_of(board, by, square).is_empty()
}

/// `false` for a side without a king, which only happens on hand-built boards.
#[inline]
pub fn is_king_in_check(board: &BoardState, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}
