//! In-place make/unmake.
//!
//! `make_move` mutates a `BoardState` and hands back the `UndoRecord` that
//! `unmake_move` needs to restore it bit for bit, hashes and hash history
//! included. Both expect a pseudo-legal move for the side to move.

use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::UndoRecord;
use crate::moves::chess_move::Move;
use crate::moves::pawn_moves::push_delta;
use crate::search::zobrist::{castling_key, en_passant_file_key, side_to_move_key};

/// Rights that survive a move touching each square (as source or target).
const CASTLING_MASK: [CastlingRights; 64] = build_castling_mask();

const fn build_castling_mask() -> [CastlingRights; 64] {
    let mut mask = [CASTLE_ALL; 64];
    mask[0] = CASTLE_ALL & !CASTLE_WHITE_QUEENSIDE;
    mask[4] = CASTLE_ALL & !CASTLE_WHITE;
    mask[7] = CASTLE_ALL & !CASTLE_WHITE_KINGSIDE;
    mask[56] = CASTLE_ALL & !CASTLE_BLACK_QUEENSIDE;
    mask[60] = CASTLE_ALL & !CASTLE_BLACK;
    mask[63] = CASTLE_ALL & !CASTLE_BLACK_KINGSIDE;
    mask
}

/// Rook hop for a castling king landing on `king_to`.
#[inline]
pub(crate) const fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
fn en_passant_victim(mover: Color, to: Square) -> Square {
    (to as i8 - push_delta(mover)) as Square
}

pub fn make_move(board: &mut BoardState, mv: Move) -> UndoRecord {
    let mut undo = UndoRecord {
        moved: board.piece_at(mv.from),
        captured: None,
        prev_castling_rights: board.castling_rights,
        prev_en_passant: board.en_passant,
        prev_halfmove_clock: board.halfmove_clock,
        prev_hash: board.hash,
        prev_pawn_hash: board.pawn_hash,
        evicted_hash: None,
    };
    let Some(moving) = undo.moved else {
        return undo;
    };

    undo.evicted_hash = board.remember_hash();

    if let Some(square) = board.en_passant.lowest() {
        board.hash ^= en_passant_file_key(square % 8);
    }
    board.en_passant = BitSet::EMPTY;

    undo.captured = if mv.is_en_passant() {
        board.remove_piece(en_passant_victim(moving.color, mv.to))
    } else {
        board.remove_piece(mv.to)
    };

    board.remove_piece(mv.from);
    let landed = match mv.promotion_piece() {
        Some(kind) => Piece::new(kind, moving.color),
        None => moving,
    };
    board.put_piece(mv.to, landed);

    if mv.is_castle() && moving.kind == PieceKind::King {
        if let Some((rook_from, rook_to)) = castling_rook_squares(mv.to) {
            if let Some(rook) = board.remove_piece(rook_from) {
                board.put_piece(rook_to, rook);
            }
        }
    }

    let rights = board.castling_rights
        & CASTLING_MASK[mv.from as usize]
        & CASTLING_MASK[mv.to as usize];
    if rights != board.castling_rights {
        board.hash ^= castling_key(board.castling_rights) ^ castling_key(rights);
        board.castling_rights = rights;
    }

    if moving.kind == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 16 {
        let target = (mv.from + mv.to) / 2;
        board.en_passant = BitSet::from_square(target);
        board.hash ^= en_passant_file_key(target % 8);
    }

    if moving.kind == PieceKind::Pawn || undo.captured.is_some() {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock = board.halfmove_clock.saturating_add(1);
    }
    if moving.color == Color::Black {
        board.fullmove_number = board.fullmove_number.saturating_add(1);
    }
    board.ply = board.ply.saturating_add(1);

    board.side_to_move = moving.color.opposite();
    board.hash ^= side_to_move_key();

    undo
}

pub fn unmake_move(board: &mut BoardState, mv: Move, undo: &UndoRecord) {
    let Some(moving) = undo.moved else {
        return;
    };

    board.side_to_move = moving.color;

    board.remove_piece(mv.to);
    board.put_piece(mv.from, moving);

    if mv.is_castle() && moving.kind == PieceKind::King {
        if let Some((rook_from, rook_to)) = castling_rook_squares(mv.to) {
            if let Some(rook) = board.remove_piece(rook_to) {
                board.put_piece(rook_from, rook);
            }
        }
    }

    if let Some(captured) = undo.captured {
        let square = if mv.is_en_passant() {
            en_passant_victim(moving.color, mv.to)
        } else {
            mv.to
        };
        board.put_piece(square, captured);
    }

    if moving.color == Color::Black {
        board.fullmove_number = board.fullmove_number.saturating_sub(1);
    }
    board.ply = board.ply.saturating_sub(1);
    board.castling_rights = undo.prev_castling_rights;
    board.en_passant = undo.prev_en_passant;
    board.halfmove_clock = undo.prev_halfmove_clock;
    board.hash = undo.prev_hash;
    board.pawn_hash = undo.prev_pawn_hash;
    board.hash_history.pop_back();
    if let Some(evicted) = undo.evicted_hash {
        board.hash_history.push_front(evicted);
    }
}
