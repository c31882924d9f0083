// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use chess_logic::coord::Coord;
use chess_logic::rules::ChessRules;
use chess_logic::test_util::replay_chess_log;
use chess_logic::{ChessGame, TurnError, TurnInput, TurnMove};


#[allow(dead_code)]
pub fn chess_classic() -> ChessGame { ChessGame::new(ChessRules::classic()) }

#[allow(dead_code)]
pub fn game_from_fen(fen: &str) -> ChessGame {
    ChessGame::new_from_fen(ChessRules::classic(), fen).unwrap()
}

#[allow(dead_code)]
pub fn replay_log_from_start(log: &str) -> Result<ChessGame, TurnError> {
    let mut game = chess_classic();
    replay_chess_log(&mut game, log)?;
    Ok(game)
}

#[allow(dead_code)]
pub fn alg(notation: &str) -> TurnInput { TurnInput::Algebraic(notation.to_owned()) }

#[allow(dead_code)]
pub fn drag(from: Coord, to: Coord) -> TurnInput {
    TurnInput::DragDrop(TurnMove { from, to, promote_to: None })
}
