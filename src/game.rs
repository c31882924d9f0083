use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::{Board, ChessGameStatus, LastMove, TurnFacts, TurnInput, TurnMove};
use crate::coord::Coord;
use crate::error::TurnError;
use crate::fen;
use crate::force::Force;
use crate::grid::BoardView;
use crate::movegen::{CheckState, LegalMoves};
use crate::rules::ChessRules;
use crate::starter::BoardSetup;


// Board state as shown to the user at one point of the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub board_view: BoardView,
    pub last_move: Option<LastMove>,
    pub check_state: CheckState,
    pub fen: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveListEntry {
    pub number: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

// "1. e4 e5 2. Nf3", or "1... e5 2. Nf3" if the game started with Black to move.
pub fn format_move_list(entries: &[MoveListEntry]) -> String {
    entries
        .iter()
        .map(|entry| match (&entry.white, &entry.black) {
            (Some(white), Some(black)) => format!("{}. {white} {black}", entry.number),
            (Some(white), None) => format!("{}. {white}", entry.number),
            (None, Some(black)) => format!("{}... {black}", entry.number),
            (None, None) => format!("{}.", entry.number),
        })
        .join(" ")
}

#[derive(Clone, Debug)]
pub struct ChessGame {
    board: Board,
    history: Vec<HistorySnapshot>,
    move_list: Vec<MoveListEntry>,
}

impl ChessGame {
    pub fn new(rules: ChessRules) -> Self { Self::new_with_setup(rules, BoardSetup::classic()) }

    pub fn new_from_fen(rules: ChessRules, fen: &str) -> Result<Self, String> {
        let setup = fen::fen_to_board_setup(fen)?;
        Ok(Self::new_with_setup(rules, setup))
    }

    pub fn new_with_setup(rules: ChessRules, setup: BoardSetup) -> Self {
        let board = Board::new(rules, setup);
        let mut game = ChessGame {
            board,
            history: Vec::new(),
            move_list: Vec::new(),
        };
        game.push_snapshot();
        game
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn rules(&self) -> &ChessRules { self.board.rules() }
    pub fn board_view(&self) -> BoardView { self.board.grid().to_view() }
    pub fn active_force(&self) -> Force { self.board.active_force() }
    pub fn legal_moves(&self) -> &LegalMoves { self.board.legal_moves() }
    pub fn legal_destinations(&self, from: Coord) -> &[Coord] {
        self.board.legal_moves().destinations(from)
    }
    pub fn check_state(&self) -> CheckState { self.board.check_state() }
    pub fn status(&self) -> ChessGameStatus { self.board.status() }
    pub fn is_over(&self) -> bool { !self.board.status().is_active() }
    pub fn status_message(&self) -> Option<String> { self.board.status().message() }
    pub fn fen(&self) -> &str { self.board.fen() }
    pub fn last_move(&self) -> Option<&LastMove> { self.board.last_move() }
    pub fn half_move_clock(&self) -> u32 { self.board.half_move_clock() }
    pub fn full_move_number(&self) -> u32 { self.board.full_move_number() }
    pub fn history(&self) -> &[HistorySnapshot] { &self.history }
    pub fn move_list(&self) -> &[MoveListEntry] { &self.move_list }
    pub fn move_list_text(&self) -> String { format_move_list(&self.move_list) }

    pub fn export_history(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.history)
    }

    pub fn try_turn(&mut self, turn_input: &TurnInput) -> Result<TurnFacts, TurnError> {
        let mv = self.board.parse_turn_input(turn_input)?;
        self.try_move(mv)
    }

    pub fn try_move(&mut self, mv: TurnMove) -> Result<TurnFacts, TurnError> {
        let number = self.board.full_move_number();
        let force = self.board.active_force();
        let facts = self.board.try_turn(mv)?;
        self.record_notation(number, force, facts.algebraic.clone());
        self.push_snapshot();
        Ok(facts)
    }

    // Applies a move proposed by an external advisor. The suggestion goes through the same
    // validation as user input.
    pub fn apply_suggestion(&mut self, suggestion: &str) -> Result<TurnFacts, TurnError> {
        let input = TurnInput::LongAlgebraic(suggestion.to_owned());
        self.try_turn(&input).inspect_err(|err| {
            warn!("Rejected suggested move {suggestion:?} in {}: {err}", self.board.fen());
        })
    }

    fn record_notation(&mut self, number: u32, force: Force, algebraic: String) {
        match force {
            Force::White => self.move_list.push(MoveListEntry {
                number,
                white: Some(algebraic),
                black: None,
            }),
            Force::Black => match self.move_list.last_mut() {
                Some(entry) if entry.number == number && entry.black.is_none() => {
                    entry.black = Some(algebraic);
                }
                _ => self.move_list.push(MoveListEntry {
                    number,
                    white: None,
                    black: Some(algebraic),
                }),
            },
        }
    }

    fn push_snapshot(&mut self) {
        self.history.push(HistorySnapshot {
            board_view: self.board_view(),
            last_move: self.board.last_move().cloned(),
            check_state: self.board.check_state(),
            fen: self.board.fen().to_owned(),
        });
    }
}
