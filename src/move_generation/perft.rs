//! Perft node counting over the native generator.

use crate::game_state::board_state::BoardState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_generator::generate_legal_moves_in_place;
use crate::moves::chess_move::Move;

/// Leaf count `depth` plies deep. The board is restored before returning.
pub fn perft(board: &mut BoardState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves_in_place(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| {
            let undo = make_move(board, mv);
            let nodes = perft(board, depth - 1);
            unmake_move(board, mv, &undo);
            nodes
        })
        .sum()
}

/// Per-root-move leaf counts, for comparing against reference engines.
pub fn perft_divide(board: &mut BoardState, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = generate_legal_moves_in_place(board);
    moves
        .into_iter()
        .map(|mv| {
            let undo = make_move(board, mv);
            let nodes = perft(board, depth - 1);
            unmake_move(board, mv, &undo);
            (mv, nodes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_divide};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    fn counts(fen: &str, max_depth: u32) -> Vec<u64> {
        let mut board = parse_fen(fen).expect("FEN should parse");
        let before = board.clone();
        let result = (1..=max_depth).map(|depth| perft(&mut board, depth)).collect();
        assert_eq!(board, before, "perft must leave the board untouched");
        result
    }

    #[test]
    fn starting_position_reference_counts() {
        assert_eq!(counts(STARTING_POSITION_FEN, 4), vec![20, 400, 8_902, 197_281]);
    }

    #[test]
    fn kiwipete_reference_counts() {
        assert_eq!(counts(KIWIPETE, 3), vec![48, 2_039, 97_862]);
    }

    #[test]
    fn endgame_reference_counts() {
        assert_eq!(counts(ENDGAME, 4), vec![14, 191, 2_812, 43_238]);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = parse_fen(STARTING_POSITION_FEN).expect("FEN should parse");
        let divided = perft_divide(&mut board, 2);
        assert_eq!(divided.len(), 20);
        assert!(divided.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 400);
    }
}
