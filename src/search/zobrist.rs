//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! Keys come from a fixed-seed `StdRng`, so hashes are reproducible across
//! runs and machines.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::{CastlingRights, Color, Piece, PieceKind, Square};

const ZOBRIST_SEED: u64 = 0x5EED_C0DE_2B1D_0F0E;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[u64; 64]; 12],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[0u64; 64]; 12];
    for piece in &mut piece_square {
        for key in piece.iter_mut() {
            *key = rng.random();
        }
    }

    let side_to_move = rng.random();

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.random();
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
        en_passant_file,
    }
}

/// Forces key generation so the first search does not pay for it.
pub fn warm_up() {
    let _ = tables();
}

#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.index()][square as usize]
}

#[inline]
pub fn castling_key(rights: CastlingRights) -> u64 {
    tables().castling[(rights & 0x0F) as usize]
}

#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[(file & 7) as usize]
}

/// Toggled in whenever black is to move.
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

#[inline]
pub fn is_pawn_hash_piece(piece: Piece) -> bool {
    matches!(piece.kind, PieceKind::Pawn | PieceKind::King)
}

/// Full position key computed from scratch.
pub fn compute_hash(board: &BoardState) -> u64 {
    let mut key = 0u64;

    for (square, slot) in board.squares.iter().enumerate() {
        if let Some(piece) = slot {
            key ^= piece_square_key(*piece, square as Square);
        }
    }

    if board.side_to_move == Color::Black {
        key ^= side_to_move_key();
    }
    key ^= castling_key(board.castling_rights);
    if let Some(square) = board.en_passant.lowest() {
        key ^= en_passant_file_key(square % 8);
    }

    key
}

/// Pawn-structure key over pawns and kings.
pub fn compute_pawn_hash(board: &BoardState) -> u64 {
    board
        .squares
        .iter()
        .enumerate()
        .filter_map(|(square, slot)| slot.map(|piece| (square, piece)))
        .filter(|(_, piece)| is_pawn_hash_piece(*piece))
        .fold(0u64, |key, (square, piece)| {
            key ^ piece_square_key(piece, square as Square)
        })
}

#[cfg(test)]
mod tests {
    use super::{compute_hash, compute_pawn_hash, piece_square_key};
    use crate::game_state::chess_types::{Color, Piece, PieceKind};
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn keys_are_reproducible_and_distinct() {
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        assert_eq!(piece_square_key(pawn, 12), piece_square_key(pawn, 12));
        assert_ne!(piece_square_key(pawn, 12), piece_square_key(pawn, 13));
    }

    #[test]
    fn side_castling_and_en_passant_change_hash() {
        let hash_of = |fen: &str| compute_hash(&parse_fen(fen).expect("FEN should parse"));

        let base = hash_of("r3k3/8/8/8/4P3/8/8/4K2R w K - 0 1");
        assert_ne!(base, hash_of("r3k3/8/8/8/4P3/8/8/4K2R b K - 0 1"));
        assert_ne!(base, hash_of("r3k3/8/8/8/4P3/8/8/4K2R w - - 0 1"));
        assert_ne!(
            hash_of("r3k3/8/8/8/4P3/8/8/4K2R b K - 0 1"),
            hash_of("r3k3/8/8/8/4P3/8/8/4K2R b K e3 0 1")
        );
    }

    #[test]
    fn pawn_hash_ignores_pieces_other_than_pawns_and_kings() {
        let with_rook = parse_fen("4k3/4p3/8/8/8/8/4P3/R3K3 w - - 0 1").expect("FEN should parse");
        let without_rook = parse_fen("4k3/4p3/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(compute_pawn_hash(&with_rook), compute_pawn_hash(&without_rook));
        assert_ne!(compute_hash(&with_rook), compute_hash(&without_rook));
    }
}
