//! Full legal move generation pipeline.
//!
//! Piece-wise pseudo-legal generation, then a make/test/unmake filter that
//! drops moves leaving the mover's own king attacked.

use crate::game_state::board_state::BoardState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::generate_piece_moves;
use crate::moves::chess_move::Move;

pub fn generate_pseudo_legal_moves(board: &BoardState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_pawn_moves(board, &mut moves);
    generate_piece_moves(board, &mut moves);
    generate_king_moves(board, &mut moves);
    moves
}

/// Legal moves, using `board` as scratch space. The board is restored
/// before returning.
pub fn generate_legal_moves_in_place(board: &mut BoardState) -> Vec<Move> {
    let mover = board.side_to_move;
    let mut moves = generate_pseudo_legal_moves(board);
    moves.retain(|&mv| {
        let undo = make_move(board, mv);
        let legal = !is_king_in_check(board, mover);
        unmake_move(board, mv, &undo);
        legal
    });
    moves
}

pub fn generate_legal_moves(board: &BoardState) -> Vec<Move> {
    let mut scratch = board.clone();
    generate_legal_moves_in_place(&mut scratch)
}

#[cfg(test)]
mod tests {
    use super::{generate_legal_moves, generate_pseudo_legal_moves};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn starting_position_has_twenty_moves() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("FEN should parse");
        assert_eq!(generate_pseudo_legal_moves(&board).len(), 20);
        assert_eq!(generate_legal_moves(&board).len(), 20);
    }

    #[test]
    fn pinned_piece_moves_are_filtered() {
        // The e2 knight is pinned by the e8 rook.
        let board = parse_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let pseudo = generate_pseudo_legal_moves(&board);
        let legal = generate_legal_moves(&board);
        assert!(pseudo.iter().any(|m| m.from == 12));
        assert!(legal.iter().all(|m| m.from != 12));
    }
}
