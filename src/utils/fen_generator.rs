use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::bitset_to_algebraic;

/// Six-field FEN for `board`.
pub fn generate_fen(board: &BoardState) -> String {
    let side = match board.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };
    let en_passant = bitset_to_algebraic(board.en_passant).unwrap_or_else(|| "-".to_owned());

    format!(
        "{} {} {} {} {} {}",
        board_field(board),
        side,
        castling_field(board.castling_rights),
        en_passant,
        board.halfmove_clock,
        board.fullmove_number
    )
}

fn board_field(board: &BoardState) -> String {
    let mut out = String::with_capacity(72);

    for rank in (0..8u8).rev() {
        let mut empty_run = 0u8;
        for file in 0..8u8 {
            match board.piece_at(rank * 8 + file) {
                Some(piece) => {
                    if empty_run > 0 {
                        out.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    out.push(piece.to_fen_char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push(char::from(b'0' + empty_run));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn castling_field(rights: CastlingRights) -> String {
    let out: String = [
        (CASTLE_WHITE_KINGSIDE, 'K'),
        (CASTLE_WHITE_QUEENSIDE, 'Q'),
        (CASTLE_BLACK_KINGSIDE, 'k'),
        (CASTLE_BLACK_QUEENSIDE, 'q'),
    ]
    .into_iter()
    .filter(|(right, _)| rights & right != 0)
    .map(|(_, letter)| letter)
    .collect();

    if out.is_empty() {
        "-".to_owned()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn starting_position_round_trips() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(generate_fen(&board), STARTING_POSITION_FEN);
    }

    #[test]
    fn custom_position_round_trips() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6";
        let board = parse_fen(fen).expect("custom FEN should parse");
        assert_eq!(generate_fen(&board), fen);
    }

    #[test]
    fn short_fen_gains_default_counters() {
        let board = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6").expect("FEN should parse");
        assert_eq!(generate_fen(&board), "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
    }
}
