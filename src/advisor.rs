// Seam for external move suggestion services (e.g. a UCI engine behind an HTTP API).
//
// Advisors speak FEN in and long algebraic notation out. They never see the game itself: the
// suggestion is applied with `ChessGame::apply_suggestion`, which validates it like any other
// input.

use std::fmt;

use itertools::Itertools;
use lazy_static::lazy_static;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::algebraic::format_long_algebraic;
use crate::board::TurnMove;
use crate::coord::SubjectiveRow;
use crate::game::ChessGame;
use crate::piece::PieceKind;
use crate::rules::ChessRules;


#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdvisorError {
    Unavailable(String),
    InvalidResponse(String),
}

impl fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisorError::Unavailable(reason) => write!(f, "advisor unavailable: {reason}"),
            AdvisorError::InvalidResponse(response) => {
                write!(f, "invalid advisor response: {response}")
            }
        }
    }
}

impl std::error::Error for AdvisorError {}

pub trait MoveAdvisor {
    // Returns a move in long algebraic notation, e.g. "e2e4" or "e7e8q".
    fn suggest(&mut self, fen: &str) -> Result<String, AdvisorError>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, Serialize, Deserialize)]
pub enum AdvisorLevel {
    Beginner,
    Casual,
    Intermediate,
    Advanced,
    Expert,
}

impl AdvisorLevel {
    // Search depth requested from the service.
    pub fn depth(self) -> u8 {
        match self {
            AdvisorLevel::Beginner => 1,
            AdvisorLevel::Casual => 4,
            AdvisorLevel::Intermediate => 7,
            AdvisorLevel::Advanced => 10,
            AdvisorLevel::Expert => 13,
        }
    }

    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(AdvisorLevel::Beginner),
            2 => Some(AdvisorLevel::Casual),
            3 => Some(AdvisorLevel::Intermediate),
            4 => Some(AdvisorLevel::Advanced),
            5 => Some(AdvisorLevel::Expert),
            _ => None,
        }
    }
}

// Extracts the move from a UCI "bestmove" line:
//   > bestmove e2e4 ponder e7e5
// Other tokens before the "bestmove" line (e.g. "info ...") are ignored.
pub fn parse_best_move_response(response: &str) -> Result<String, AdvisorError> {
    lazy_static! {
        static ref BEST_MOVE_RE: Regex =
            Regex::new(r"(?m)^\s*bestmove\s+([a-h][1-8][a-h][1-8][nbrq]?)(?:\s|$)").unwrap();
    }
    BEST_MOVE_RE
        .captures(response)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or_else(|| AdvisorError::InvalidResponse(response.to_owned()))
}

// Plays a uniformly random legal move. Useful as an opponent when no real service is configured,
// and in tests.
pub struct RandomAdvisor {
    rng: StdRng,
}

impl RandomAdvisor {
    pub fn new(seed: u64) -> Self { RandomAdvisor { rng: StdRng::seed_from_u64(seed) } }
}

impl MoveAdvisor for RandomAdvisor {
    fn suggest(&mut self, fen: &str) -> Result<String, AdvisorError> {
        let game = ChessGame::new_from_fen(ChessRules::classic(), fen)
            .map_err(AdvisorError::InvalidResponse)?;
        if game.is_over() {
            return Err(AdvisorError::Unavailable("the game is over".to_owned()));
        }
        let moves = game.legal_moves().moves().collect_vec();
        let &(from, to) = moves
            .choose(&mut self.rng)
            .ok_or_else(|| AdvisorError::Unavailable("no legal moves".to_owned()))?;
        let promoting = game.board().grid()[from].is_some_and(|piece| {
            piece.kind == PieceKind::Pawn && to.row == SubjectiveRow::last().to_row(piece.force)
        });
        let promote_to = promoting.then_some(PieceKind::Queen);
        Ok(format_long_algebraic(TurnMove { from, to, promote_to }))
    }
}
