use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_moves_pieces::push_targets;
use crate::moves::chess_move::{Move, MoveFlag};
use crate::moves::king_moves::king_attacks;

struct CastlePath {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    must_be_empty: BitSet,
    /// Squares the king stands on or crosses, including its start.
    must_be_safe: [Square; 3],
}

const WHITE_PATHS: [CastlePath; 2] = [
    CastlePath {
        right: CASTLE_WHITE_KINGSIDE,
        king_from: 4,
        king_to: 6,
        must_be_empty: BitSet::new((1 << 5) | (1 << 6)),
        must_be_safe: [4, 5, 6],
    },
    CastlePath {
        right: CASTLE_WHITE_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        must_be_empty: BitSet::new((1 << 1) | (1 << 2) | (1 << 3)),
        must_be_safe: [4, 3, 2],
    },
];

const BLACK_PATHS: [CastlePath; 2] = [
    CastlePath {
        right: CASTLE_BLACK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        must_be_empty: BitSet::new((1 << 61) | (1 << 62)),
        must_be_safe: [60, 61, 62],
    },
    CastlePath {
        right: CASTLE_BLACK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        must_be_empty: BitSet::new((1 << 57) | (1 << 58) | (1 << 59)),
        must_be_safe: [60, 59, 58],
    },
];

pub fn generate_king_moves(board: &BoardState, out: &mut Vec<Move>) {
    let side = board.side_to_move;
    let king = Piece::new(PieceKind::King, side);
    let Some(from) = board.king_square(side) else {
        return;
    };

    push_targets(out, from, king_attacks(from) & !board.occupancy_of(side), king);
    generate_castling_moves(board, out, from, king);
}

fn generate_castling_moves(board: &BoardState, out: &mut Vec<Move>, from: Square, king: Piece) {
    let paths = match king.color {
        Color::White => &WHITE_PATHS,
        Color::Black => &BLACK_PATHS,
    };
    let rook = Piece::new(PieceKind::Rook, king.color);
    let enemy = king.color.opposite();

    for path in paths {
        let rook_home = if path.king_to > path.king_from {
            path.king_from + 3
        } else {
            path.king_from - 4
        };
        let available = board.castling_rights & path.right != 0
            && from == path.king_from
            && board.piece_at(rook_home) == Some(rook)
            && (board.occupied() & path.must_be_empty).is_empty()
            && path
                .must_be_safe
                .iter()
                .all(|&square| !is_square_attacked(board, square, enemy));

        if available {
            out.push(Move::new(from, path.king_to, king, MoveFlag::Castle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::utils::fen_parser::parse_fen;

    fn castles(fen: &str) -> Vec<String> {
        let board = parse_fen(fen).expect("FEN should parse");
        let mut moves = Vec::new();
        generate_king_moves(&board, &mut moves);
        moves
            .iter()
            .filter(|m| m.is_castle())
            .map(|m| m.to_uci())
            .collect()
    }

    #[test]
    fn both_sides_available_on_clear_back_rank() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), vec!["e1g1", "e1c1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), vec!["e8g8", "e8c8"]);
    }

    #[test]
    fn cannot_castle_through_or_out_of_check() {
        // Rook on f8 covers f1.
        assert_eq!(castles("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1"]);
        // Rook on e8 gives check.
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
    }

    #[test]
    fn queenside_b_file_only_needs_to_be_empty() {
        // b1 attacked by the rook on b8 does not stop long castling.
        assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1"), vec!["e1c1"]);
        assert!(castles("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1").is_empty());
    }
}
