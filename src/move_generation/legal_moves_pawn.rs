use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, MoveFlag};
use crate::moves::pawn_moves::{pawn_attacks, promotion_rank, push_delta, start_rank};

/// Pushes, double pushes, captures, promotions and en passant for the side to move.
pub fn generate_pawn_moves(board: &BoardState, out: &mut Vec<Move>) {
    let side = board.side_to_move;
    let pawn = Piece::new(PieceKind::Pawn, side);
    let empty = !board.occupied();
    let enemies = board.occupancy_of(side.opposite());
    let delta = push_delta(side);

    for from in board.pieces[pawn.index()] {
        if rank_of(from) == promotion_rank(side) {
            continue;
        }

        let one = (from as i8 + delta) as Square;
        if empty.contains(one) {
            push_with_promotions(out, from, one, pawn);

            let two = (one as i8 + delta) as Square;
            if rank_of(from) == start_rank(side) && empty.contains(two) {
                out.push(Move::quiet(from, two, pawn));
            }
        }

        let targets = pawn_attacks(side, from);
        for to in targets & enemies {
            push_with_promotions(out, from, to, pawn);
        }
        for to in targets & board.en_passant {
            out.push(Move::new(from, to, pawn, MoveFlag::EnPassant));
        }
    }
}

fn push_with_promotions(out: &mut Vec<Move>, from: Square, to: Square, pawn: Piece) {
    if rank_of(to) == promotion_rank(pawn.color) {
        for flag in MoveFlag::PROMOTIONS {
            out.push(Move::new(from, to, pawn, flag));
        }
    } else {
        out.push(Move::quiet(from, to, pawn));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn start_rank_pawn_has_single_and_double_push() {
        let board = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let mut moves = Vec::new();
        generate_pawn_moves(&board, &mut moves);
        let notation: Vec<_> = moves.iter().map(|m| m.to_uci()).collect();
        assert_eq!(notation, vec!["e2e3", "e2e4"]);
    }

    #[test]
    fn capture_promotion_fans_out_into_four_moves() {
        let board = parse_fen("3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut moves = Vec::new();
        generate_pawn_moves(&board, &mut moves);
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.is_promotion() && m.to == 59));
    }

    #[test]
    fn en_passant_target_is_generated() {
        let board = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let mut moves = Vec::new();
        generate_pawn_moves(&board, &mut moves);
        assert!(moves.iter().any(|m| m.is_en_passant() && m.to_uci() == "e5d6"));
    }
}
