#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod advisor;
pub mod algebraic;
pub mod board;
pub mod coord;
pub mod error;
pub mod fen;
pub mod force;
pub mod game;
pub mod grid;
pub mod material;
pub mod movegen;
pub mod piece;
pub mod rules;
pub mod starter;
pub mod test_util;
pub mod util;

pub use advisor::{AdvisorError, AdvisorLevel, MoveAdvisor, RandomAdvisor};
pub use board::{
    ChessGameStatus, DrawReason, LastMove, MoveType, TurnFacts, TurnInput, TurnMove,
    VictoryReason,
};
pub use coord::{Col, Coord, Row};
pub use error::TurnError;
pub use force::Force;
pub use game::{ChessGame, HistorySnapshot, MoveListEntry};
pub use movegen::{CheckState, LegalMoves};
pub use piece::{PieceKind, PieceOnBoard};
pub use rules::{ChessRules, PromotionPolicy};
