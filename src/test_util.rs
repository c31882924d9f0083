// Test utilities shared by unit tests, integration tests and the console replay command.

use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use regex_lite::Regex;

use crate::board::{TurnInput, TurnMove};
use crate::error::TurnError;
use crate::game::ChessGame;


// In theory random tests verify statistical properties that should always hold, but let's fix
// the seed to avoid sporadic failures.
pub fn deterministic_rng() -> StdRng { StdRng::from_seed([0; 32]) }

// Accepts move numbers glued to moves ("1.e4") or standalone ("1.", "1...").
pub fn replay_chess_log(game: &mut ChessGame, log: &str) -> Result<(), TurnError> {
    lazy_static! {
        static ref TURN_NUMBER_RE: Regex = Regex::new(r"^(?:[0-9]+\.+)?(.*)$").unwrap();
    }
    for word in log.split_whitespace() {
        let turn_notation = TURN_NUMBER_RE
            .captures(word)
            .and_then(|cap| cap.get(1))
            .map_or("", |m| m.as_str());
        if turn_notation.is_empty() {
            continue;
        }
        game.try_turn(&TurnInput::Algebraic(turn_notation.to_owned()))?;
    }
    Ok(())
}

// Plays uniformly random legal moves until the game is over or `max_plies` is reached.
// Promotions rely on `PromotionPolicy::DefaultToQueen`. Calls
// `on_turn` with the game state before and after each accepted move.
pub fn random_playout(
    game: &mut ChessGame, rng: &mut impl Rng, max_plies: usize,
    mut on_turn: impl FnMut(&ChessGame, TurnMove, &ChessGame),
) -> usize {
    for ply in 0..max_plies {
        if game.is_over() {
            return ply;
        }
        let moves: Vec<(_, _)> = game.legal_moves().moves().collect();
        let Some(&(from, to)) = moves.choose(rng) else {
            return ply;
        };
        let before = game.clone();
        let mv = TurnMove { from, to, promote_to: None };
        if game.try_move(mv).is_err() {
            panic!("move {mv:?} from the legal map was rejected in {}", before.fen());
        }
        on_turn(&before, mv, game);
    }
    max_plies
}
