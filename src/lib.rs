//! Crate root module declarations for the Sisyphus engine core.
//!
//! Board state and move encoding, make/unmake history, move views, the
//! search controller with its native backend, and the UCI front-end.

pub mod chess_errors;

pub mod game_state {
    pub mod bitset;
    pub mod board_state;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod position;
    pub mod undo_state;
}

pub mod moves {
    pub mod chess_move;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod sliding_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod move_history;
    pub mod move_views;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod cancellation;
    pub mod iterative_deepening;
    pub mod searcher;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_backend;
    pub mod native_backend;
    pub mod time_management;
}

pub mod uci {
    pub mod uci_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
}
