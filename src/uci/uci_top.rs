//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, keeps the current position and its move history,
//! routes `go` requests to the searcher and emits protocol output. Stdin
//! is read on its own thread so `stop` reaches a running search promptly
//! and `isready` is answered while the command loop is busy searching.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_backend::{EngineBackend, MAX_SEARCH_DEPTH};
use crate::engines::native_backend::NativeBackend;
use crate::engines::time_management::{resolve_search_limits, GoParams};
use crate::game_state::position::Position;
use crate::search::cancellation::StopHandle;
use crate::search::searcher::{SearchOutcome, Searcher};
use crate::utils::long_algebraic::parse_uci_move;

pub const UCI_ENGINE_NAME: &str = "Sisyphus";
pub const UCI_ENGINE_AUTHOR: &str = "the Sisyphus developers";

pub fn run_stdio_loop() -> io::Result<()> {
    let backend: Arc<dyn EngineBackend> = Arc::new(NativeBackend::new());
    let mut uci = UciState::new(backend).map_err(io::Error::other)?;
    let stop = uci.searcher.stop_handle();

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("uci-stdin".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match screen_input_line(&line, &stop, &mut io::stdout()) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    let mut stdout = io::stdout();
    for line in line_rx {
        let should_quit = uci.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Runs on the stdin thread before a line is queued. Returns `false` when
/// the line was answered here and must not reach the command loop.
fn screen_input_line(line: &str, stop: &StopHandle, out: &mut impl Write) -> io::Result<bool> {
    match line.split_whitespace().next() {
        Some("stop" | "quit") => stop.stop(),
        Some("isready") if stop.is_searching() => {
            writeln!(out, "readyok")?;
            out.flush()?;
            return Ok(false);
        }
        _ => {}
    }
    Ok(true)
}

struct UciState {
    position: Position,
    searcher: Searcher,
    /// `go` requests since the last `ucinewgame`, for the opening time cap.
    moves_played: u32,
    debug_mode: bool,
}

impl UciState {
    fn new(backend: Arc<dyn EngineBackend>) -> ChessResult<Self> {
        Ok(Self {
            position: Position::starting(backend.clone())?,
            searcher: Searcher::new(backend),
            moves_played: 0,
            debug_mode: false,
        })
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "uci" => {
                writeln!(out, "id name {}", UCI_ENGINE_NAME)?;
                writeln!(out, "id author {}", UCI_ENGINE_AUTHOR)?;
                writeln!(
                    out,
                    "option name DefaultDepth type spin default {} min 1 max {}",
                    self.searcher.default_depth(),
                    MAX_SEARCH_DEPTH
                )?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string {}", err)?;
                }
            }
            "ucinewgame" => {
                if let Err(err) = self.position.reset() {
                    writeln!(out, "info string {}", err)?;
                }
                self.searcher.clear();
                self.moves_played = 0;
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string {}", err)?;
                }
            }
            "go" => {
                self.handle_go(trimmed, out)?;
            }
            "stop" => {
                self.searcher.stop();
            }
            "debug" => {
                self.debug_mode = match parts.next() {
                    Some(mode) if mode.eq_ignore_ascii_case("on") => true,
                    Some(mode) if mode.eq_ignore_ascii_case("off") => false,
                    None => !self.debug_mode,
                    Some(other) => {
                        writeln!(out, "info string unknown debug mode '{}'", other)?;
                        return Ok(false);
                    }
                };
                self.searcher.set_debug(self.debug_mode);
            }
            "quit" => {
                return Ok(true);
            }
            other => {
                warn!(command = other, "unknown command");
                writeln!(out, "info string unknown command '{}'", other)?;
            }
        }

        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), String> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        if name.eq_ignore_ascii_case("DefaultDepth") {
            let parsed = value
                .parse::<u32>()
                .map_err(|_| format!("invalid DefaultDepth value '{}'", value))?;
            self.searcher
                .set_default_depth(parsed.min(MAX_SEARCH_DEPTH))
                .map_err(|err| err.to_string())
        } else {
            Err(format!("unknown option '{}'", name))
        }
    }

    /// Loads a new position and replays its moves. Nothing changes unless
    /// the whole command succeeds.
    fn handle_position(&mut self, line: &str) -> ChessResult<()> {
        let mut tokens = line.split_whitespace().skip(1).peekable();
        let mut position = self.position.clone();

        match tokens.next() {
            Some("startpos") => position.reset()?,
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(&next) = tokens.peek() {
                    if next == "moves" {
                        break;
                    }
                    fen_parts.push(next);
                    tokens.next();
                }
                position.set_fen(&fen_parts.join(" "))?;
            }
            Some(other) => {
                return Err(ChessError::InvalidFen(format!(
                    "unsupported position token '{other}'"
                )))
            }
            None => return Err(ChessError::InvalidFen("incomplete position command".to_owned())),
        }

        if tokens.next_if_eq(&"moves").is_some() {
            for text in tokens {
                let mv = parse_uci_move(text, position.board())?;
                position.push(mv)?;
            }
        }

        debug!(fen = %position.to_fen(), moves = position.history().len(), "position set");
        self.position = position;
        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> io::Result<()> {
        match self.run_search(line) {
            Ok(outcome) => {
                for info in &outcome.info {
                    writeln!(out, "{}", info)?;
                }
                let notation = self.position.backend().move_to_notation(outcome.best_move);
                writeln!(out, "bestmove {}", notation)?;
            }
            Err(err) => {
                writeln!(out, "info string {}", err)?;
                writeln!(out, "bestmove 0000")?;
            }
        }
        Ok(())
    }

    fn run_search(&mut self, line: &str) -> ChessResult<SearchOutcome> {
        let params = parse_go_params(line)?;
        self.moves_played += 1;
        let limits =
            resolve_search_limits(&params, self.position.side_to_move(), self.moves_played);
        self.searcher.start(&self.position, limits)
    }
}

/// Reads the `go` arguments. A depth must be a positive integer and
/// every clock field a non-negative number of milliseconds.
fn parse_go_params(line: &str) -> ChessResult<GoParams> {
    let mut params = GoParams::default();
    let mut tokens = line.split_whitespace().skip(1);
    while let Some(token) = tokens.next() {
        match token {
            "depth" => {
                let depth = number::<i64>(token, tokens.next())?;
                params.depth = Some(
                    u32::try_from(depth)
                        .ok()
                        .filter(|&d| d > 0)
                        .ok_or(ChessError::InvalidDepth(depth))?,
                );
            }
            "movetime" => params.movetime_ms = Some(number(token, tokens.next())?),
            "wtime" => params.wtime_ms = Some(number(token, tokens.next())?),
            "btime" => params.btime_ms = Some(number(token, tokens.next())?),
            "winc" => params.winc_ms = Some(number(token, tokens.next())?),
            "binc" => params.binc_ms = Some(number(token, tokens.next())?),
            "infinite" => params.infinite = true,
            _ => {}
        }
    }
    Ok(params)
}

fn number<T: std::str::FromStr>(name: &str, value: Option<&str>) -> ChessResult<T> {
    value
        .and_then(|text| text.parse::<T>().ok())
        .ok_or_else(|| ChessError::InvalidArgument(name.to_owned()))
}
