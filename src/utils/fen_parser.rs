//! FEN-to-BoardState parser.
//!
//! Accepts the four mandatory fields with optional half-move clock and
//! full-move number (defaulting to 0 and 1). The board is built on a fresh
//! `BoardState`, so a rejected string never leaves partial state behind.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::utils::algebraic::algebraic_to_square;

fn invalid(message: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(message.into())
}

pub fn parse_fen(fen: &str) -> ChessResult<BoardState> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&fields.len()) {
        return Err(invalid(format!(
            "expected 4 to 6 fields, found {}",
            fields.len()
        )));
    }

    let mut board = BoardState::empty();

    parse_board(fields[0], &mut board)?;
    board.side_to_move = parse_side_to_move(fields[1])?;
    board.castling_rights = parse_castling_rights(fields[2])?;
    board.en_passant = parse_en_passant(fields[3], &board)?;
    board.halfmove_clock = match fields.get(4) {
        Some(text) => text
            .parse::<u16>()
            .map_err(|_| invalid(format!("bad half-move clock '{text}'")))?,
        None => 0,
    };
    board.fullmove_number = match fields.get(5) {
        Some(text) => text
            .parse::<u16>()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| invalid(format!("bad full-move number '{text}'")))?,
        None => 1,
    };

    if is_king_in_check(&board, board.side_to_move.opposite()) {
        return Err(invalid(format!(
            "{:?} king is in check with {:?} to move",
            board.side_to_move.opposite(),
            board.side_to_move
        )));
    }

    board.refresh_hashes();
    Ok(board)
}

fn parse_board(layout: &str, board: &mut BoardState) -> ChessResult<()> {
    let ranks: Vec<&str> = layout.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid(format!("board has {} ranks, expected 8", ranks.len())));
    }

    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;

        for ch in text.chars() {
            if let Some(run) = ch.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(invalid(format!("bad empty-square count '{ch}'")));
                }
                file += run as u8;
            } else {
                let piece = Piece::from_fen_char(ch)
                    .ok_or_else(|| invalid(format!("bad piece letter '{ch}'")))?;
                if file >= 8 {
                    return Err(invalid(format!("rank {} overflows", rank + 1)));
                }
                if piece.kind == PieceKind::Pawn && (rank == 0 || rank == 7) {
                    return Err(invalid(format!("pawn on rank {}", rank + 1)));
                }
                board.put_piece(rank * 8 + file, piece);
                file += 1;
            }
            if file > 8 {
                return Err(invalid(format!("rank {} overflows", rank + 1)));
            }
        }

        if file != 8 {
            return Err(invalid(format!("rank {} has {file} files", rank + 1)));
        }
    }

    for color in Color::ALL {
        if board.pieces_of(PieceKind::King, color).len() != 1 {
            return Err(invalid(format!("{color:?} must have exactly one king")));
        }
    }

    Ok(())
}

fn parse_side_to_move(token: &str) -> ChessResult<Color> {
    match token {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(format!("bad side to move '{token}'"))),
    }
}

fn parse_castling_rights(token: &str) -> ChessResult<CastlingRights> {
    if token == "-" {
        return Ok(0);
    }

    token.chars().try_fold(0, |rights, ch| {
        let right = match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(invalid(format!("bad castling letter '{ch}'"))),
        };
        Ok(rights | right)
    })
}

/// The square must sit behind a pawn of the side that just moved, on the
/// rank that side's double push skips over, and must be empty.
fn parse_en_passant(token: &str, board: &BoardState) -> ChessResult<BitSet> {
    if token == "-" {
        return Ok(BitSet::EMPTY);
    }

    let mover = board.side_to_move.opposite();
    let mover_pawn = Some(Piece::new(PieceKind::Pawn, mover));
    let (skipped_rank, pawn_offset): (u8, i8) = match mover {
        Color::White => (2, 8),
        Color::Black => (5, -8),
    };

    match algebraic_to_square(token) {
        Some(square)
            if rank_of(square) == skipped_rank
                && board.piece_at(square).is_none()
                && board.piece_at(square.wrapping_add_signed(pawn_offset)) == mover_pawn =>
        {
            Ok(BitSet::from_square(square))
        }
        _ => Err(invalid(format!("bad en-passant square '{token}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessError;
    use crate::game_state::bitset::BitSet;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, CASTLE_ALL};

    #[test]
    fn starting_position_parses() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(board.side_to_move, Color::White);
        assert_eq!(board.castling_rights, CASTLE_ALL);
        assert_eq!(board.occupied().len(), 32);
        assert_eq!(board.fullmove_number, 1);
        assert!(board.is_consistent());
    }

    #[test]
    fn counters_are_optional() {
        let board = parse_fen("4k3/8/8/8/8/8/8/4K3 b - -").expect("four fields should parse");
        assert_eq!(board.side_to_move, Color::Black);
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.fullmove_number, 1);
    }

    #[test]
    fn en_passant_square_follows_the_side_to_move() {
        let white = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        assert_eq!(white.en_passant, BitSet::from_square(43));

        let black = parse_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").expect("FEN should parse");
        assert_eq!(black.en_passant, BitSet::from_square(19));
    }

    #[test]
    fn malformed_fields_are_rejected() {
        let cases = [
            "4k3/8/8/8/8/8/8/4K3 w",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
            "4k3/8/8/8/8/8/8/4X3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w KZ - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e5 0 1",
            "4k3/8/8/8/8/8/8/4K4 w - - 0 1",
            "8/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - x 1",
            // en-passant square on the mover's own side
            "4k3/8/8/8/8/8/2PP4/4K3 w - d3 0 1",
            // right rank but no pawn behind it
            "4k3/8/8/8/8/8/8/4K3 w - d6 0 1",
            // black to move cannot capture onto rank 6
            "4k3/8/8/3pP3/8/8/8/4K3 b - d6 0 1",
            // the side that just moved left its king in check
            "4k3/8/8/8/8/8/8/4R1K1 w - - 0 1",
        ];
        for fen in cases {
            assert!(
                matches!(parse_fen(fen), Err(ChessError::InvalidFen(_))),
                "accepted {fen}"
            );
        }
    }
}
