//! Coordinate notation (`e2e4`, `e7e8q`) for the text protocol.
//!
//! Parsing reads the moving piece off the board and infers the castle and
//! en-passant flags from geometry, so the result compares equal to the
//! generated move. Legality is left to `Position::push`.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, MoveFlag};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_uci_move(text: &str, board: &BoardState) -> ChessResult<Move> {
    let invalid = || ChessError::InvalidUciMove(text.to_owned());

    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&text[0..2]).ok_or_else(invalid)?;
    let to = algebraic_to_square(&text[2..4]).ok_or_else(invalid)?;
    let promotion = match text.as_bytes().get(4) {
        None => None,
        Some(letter) => Some(promotion_from_char(*letter).ok_or_else(invalid)?),
    };

    let piece = board.piece_at(from);
    let flag = match (promotion, piece.map(|p| p.kind)) {
        (Some(flag), _) => flag,
        (None, Some(PieceKind::King)) if from.abs_diff(to) == 2 => MoveFlag::Castle,
        (None, Some(PieceKind::Pawn))
            if board.en_passant.contains(to) && file_of(from) != file_of(to) =>
        {
            MoveFlag::EnPassant
        }
        _ => MoveFlag::Normal,
    };

    Ok(Move {
        from,
        to,
        piece,
        flag,
    })
}

fn promotion_from_char(letter: u8) -> Option<MoveFlag> {
    match letter.to_ascii_lowercase() {
        b'n' => Some(MoveFlag::PromoteKnight),
        b'b' => Some(MoveFlag::PromoteBishop),
        b'r' => Some(MoveFlag::PromoteRook),
        b'q' => Some(MoveFlag::PromoteQueen),
        _ => None,
    }
}
