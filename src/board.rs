use std::collections::HashMap;
use std::fmt;

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::algebraic::{AlgebraicTurn, CheckMark, parse_long_algebraic};
use crate::coord::{Coord, SubjectiveRow};
use crate::error::TurnError;
use crate::fen;
use crate::force::Force;
use crate::grid::Grid;
use crate::internal_error_message;
use crate::material::is_insufficient_material;
use crate::movegen::{
    CastlingRights, CheckState, LegalMoves, castling_rights, check_state, find_king,
    generate_legal_moves,
};
use crate::piece::{CastleDirection, PieceKind, PieceOnBoard};
use crate::rules::{ChessRules, FIFTY_MOVE_RULE_PLIES, PromotionPolicy, REPETITION_DRAW_COUNT};
use crate::starter::BoardSetup;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TurnMove {
    pub from: Coord,
    pub to: Coord,
    pub promote_to: Option<PieceKind>,
}

#[derive(Clone, Debug)]
pub enum TurnInput {
    // Validated coordinates, e.g. from a drag-and-drop UI.
    DragDrop(TurnMove),
    // Raw (row, col) pairs. May be outside the board.
    Indices {
        from: (i8, i8),
        to: (i8, i8),
        promote_to: Option<PieceKind>,
    },
    // Short algebraic notation: "Nf3", "exd5", "O-O", "e8=Q".
    Algebraic(String),
    // Long algebraic notation: "g1f3", "e7e8q".
    LongAlgebraic(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum MoveType {
    Capture,
    Castling,
    EnPassant,
    Promotion,
    Check,
    CheckMate,
    // Set only when nothing else applies.
    BasicMove,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MoveTags {
    types: EnumMap<MoveType, bool>,
}

impl MoveTags {
    pub fn has(&self, move_type: MoveType) -> bool { self.types[move_type] }
    pub fn insert(&mut self, move_type: MoveType) { self.types[move_type] = true; }
    pub fn iter(&self) -> impl Iterator<Item = MoveType> + '_ {
        MoveType::iter().filter(|&t| self.types[t])
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LastMove {
    pub from: Coord,
    pub to: Coord,
    // The piece as it was before the move (a pawn in case of promotion).
    pub piece: PieceOnBoard,
    pub promote_to: Option<PieceKind>,
    pub tags: MoveTags,
}

#[derive(Clone, Debug)]
pub struct TurnFacts {
    pub last_move: LastMove,
    pub algebraic: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum VictoryReason {
    Checkmate,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ChessGameStatus {
    Active,
    Victory(Force, VictoryReason),
    Draw(DrawReason),
}

impl ChessGameStatus {
    pub fn is_active(self) -> bool { self == ChessGameStatus::Active }

    pub fn message(self) -> Option<String> {
        match self {
            ChessGameStatus::Active => None,
            ChessGameStatus::Victory(force, VictoryReason::Checkmate) => {
                Some(format!("{force} won by checkmate"))
            }
            ChessGameStatus::Draw(reason) => Some(match reason {
                DrawReason::Stalemate => "Stalemate".to_owned(),
                DrawReason::InsufficientMaterial => "Draw due to insufficient material".to_owned(),
                DrawReason::ThreefoldRepetition => "Draw due to threefold repetition".to_owned(),
                DrawReason::FiftyMoveRule => "Draw due to fifty-move rule".to_owned(),
            }),
        }
    }
}

impl fmt::Display for ChessGameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{message}"),
            None => write!(f, "Active"),
        }
    }
}

// Everything the executor needs to know about a validated move. Computed without changing the
// board.
#[derive(Clone, Debug)]
struct TurnOutcome {
    piece: PieceOnBoard,
    capture_pos: Option<Coord>,
    castle: Option<CastleDirection>,
    en_passant: bool,
    promote_to: Option<PieceKind>,
    algebraic: AlgebraicTurn,
}

#[derive(Clone, Debug)]
pub struct Board {
    rules: ChessRules,
    grid: Grid,
    active_force: Force,
    en_passant_target: Option<Coord>,
    half_move_clock: u32,
    full_move_number: u32,
    // Derived state, recomputed after every move.
    legal_moves: LegalMoves,
    check_state: CheckState,
    last_move: Option<LastMove>,
    fen: String,
    // Keyed by FEN without move counters. The starting position is not counted.
    position_count: HashMap<String, u8>,
    repetition_reached: bool,
    status: ChessGameStatus,
}

impl Board {
    pub fn new(rules: ChessRules, setup: BoardSetup) -> Board {
        let BoardSetup {
            grid,
            active_force,
            en_passant_target,
            half_move_clock,
            full_move_number,
        } = setup;
        for force in Force::iter() {
            let num_kings = grid
                .pieces_of(force)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            assert_eq!(num_kings, 1, "{}", internal_error_message!("{force} must have one king"));
        }
        let mut board = Board {
            rules,
            grid,
            active_force,
            en_passant_target,
            half_move_clock,
            full_move_number,
            legal_moves: LegalMoves::default(),
            check_state: CheckState::NotInCheck,
            last_move: None,
            fen: String::new(),
            position_count: HashMap::new(),
            repetition_reached: false,
            status: ChessGameStatus::Active,
        };
        board.refresh_derived_state();
        board.fen = fen::board_to_fen(&board);
        board.status = board.evaluate_status();
        board
    }

    pub fn rules(&self) -> &ChessRules { &self.rules }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn active_force(&self) -> Force { self.active_force }
    pub fn en_passant_target(&self) -> Option<Coord> { self.en_passant_target }
    pub fn half_move_clock(&self) -> u32 { self.half_move_clock }
    pub fn full_move_number(&self) -> u32 { self.full_move_number }
    pub fn legal_moves(&self) -> &LegalMoves { &self.legal_moves }
    pub fn check_state(&self) -> CheckState { self.check_state }
    pub fn last_move(&self) -> Option<&LastMove> { self.last_move.as_ref() }
    pub fn fen(&self) -> &str { &self.fen }
    pub fn status(&self) -> ChessGameStatus { self.status }
    pub fn castling_rights(&self) -> CastlingRights { castling_rights(&self.grid) }
    pub fn repetition_reached(&self) -> bool { self.repetition_reached }

    fn ensure_active(&self) -> Result<(), TurnError> {
        if self.status.is_active() { Ok(()) } else { Err(TurnError::GameOver) }
    }

    pub fn parse_turn_input(&self, input: &TurnInput) -> Result<TurnMove, TurnError> {
        self.ensure_active()?;
        match input {
            TurnInput::DragDrop(mv) => Ok(*mv),
            &TurnInput::Indices { from, to, promote_to } => {
                let from = Coord::from_indices(from.0, from.1).ok_or(TurnError::OutOfBounds)?;
                let to = Coord::from_indices(to.0, to.1).ok_or(TurnError::OutOfBounds)?;
                Ok(TurnMove { from, to, promote_to })
            }
            TurnInput::Algebraic(notation) => self.algebraic_to_turn_move(notation),
            TurnInput::LongAlgebraic(notation) => {
                parse_long_algebraic(notation).ok_or(TurnError::InvalidNotation)
            }
        }
    }

    fn algebraic_to_turn_move(&self, notation: &str) -> Result<TurnMove, TurnError> {
        let turn = AlgebraicTurn::parse(notation).ok_or(TurnError::InvalidNotation)?;
        match turn {
            AlgebraicTurn::Castle(dir) => {
                let from = find_king(&self.grid, self.active_force);
                let to = from.offset((0, 2 * dir.king_step())).ok_or(TurnError::IllegalMove)?;
                Ok(TurnMove { from, to, promote_to: None })
            }
            AlgebraicTurn::Move(mv) => {
                let candidates = self
                    .legal_moves
                    .moves()
                    .filter(|&(from, to)| {
                        to == mv.to &&
                            self.grid[from].is_some_and(|p| p.kind == mv.piece_kind) &&
                            mv.from_col.is_none_or(|col| col == from.col) &&
                            mv.from_row.is_none_or(|row| row == from.row) &&
                            (!mv.capturing || self.is_capture(from, to))
                    })
                    .collect_vec();
                match candidates.as_slice() {
                    [] => Err(TurnError::IllegalMove),
                    &[(from, to)] => Ok(TurnMove { from, to, promote_to: mv.promote_to }),
                    _ => Err(TurnError::AmbiguousNotation),
                }
            }
        }
    }

    // Includes en passant: a pawn moving diagonally always captures.
    fn is_capture(&self, from: Coord, to: Coord) -> bool {
        self.grid[to].is_some() ||
            (self.grid[from].is_some_and(|p| p.kind == PieceKind::Pawn) && from.col != to.col)
    }

    pub fn try_turn(&mut self, mv: TurnMove) -> Result<TurnFacts, TurnError> {
        // Turn application is split into two phases:
        //   - First, check turn validity and determine the outcome (does not change
        //     game state, can fail if the turn is invalid).
        //   - Second, apply the outcome (changes game state, cannot fail).
        let outcome = self.turn_outcome(mv)?;
        Ok(self.apply_turn(mv, outcome))
    }

    fn turn_outcome(&self, mv: TurnMove) -> Result<TurnOutcome, TurnError> {
        self.ensure_active()?;
        let piece = self.grid[mv.from].ok_or(TurnError::PieceMissing)?;
        if piece.force != self.active_force {
            return Err(TurnError::WrongTurnOrder);
        }
        if !self.legal_moves.contains(mv.from, mv.to) {
            return Err(TurnError::IllegalMove);
        }
        let promote_to = self.promotion_target(piece, mv)?;
        let en_passant = piece.kind == PieceKind::Pawn &&
            mv.from.col != mv.to.col &&
            self.grid[mv.to].is_none();
        let capture_pos = if self.grid[mv.to].is_some() {
            Some(mv.to)
        } else if en_passant {
            Some(Coord::new(mv.from.row, mv.to.col))
        } else {
            None
        };
        let castle = if piece.kind == PieceKind::King {
            CastleDirection::from_king_step(mv.to.col - mv.from.col)
        } else {
            None
        };
        let algebraic = AlgebraicTurn::from_move(
            &self.grid,
            &self.legal_moves,
            piece,
            TurnMove { promote_to, ..mv },
        );
        Ok(TurnOutcome {
            piece,
            capture_pos,
            castle,
            en_passant,
            promote_to,
            algebraic,
        })
    }

    fn promotion_target(
        &self, piece: PieceOnBoard, mv: TurnMove,
    ) -> Result<Option<PieceKind>, TurnError> {
        let last_row = SubjectiveRow::last().to_row(piece.force);
        let promoting = piece.kind == PieceKind::Pawn && mv.to.row == last_row;
        match (promoting, mv.promote_to) {
            (false, None) => Ok(None),
            (false, Some(_)) => Err(TurnError::BadPromotion),
            (true, Some(kind)) => {
                if kind.can_promote_to() {
                    Ok(Some(kind))
                } else {
                    Err(TurnError::BadPromotion)
                }
            }
            (true, None) => match self.rules.promotion {
                PromotionPolicy::DefaultToQueen => Ok(Some(PieceKind::Queen)),
                PromotionPolicy::RequireExplicit => Err(TurnError::BadPromotion),
            },
        }
    }

    fn apply_turn(&mut self, mv: TurnMove, outcome: TurnOutcome) -> TurnFacts {
        let TurnOutcome {
            piece,
            capture_pos,
            castle,
            en_passant,
            promote_to,
            algebraic,
        } = outcome;
        let force = piece.force;

        let mut moved_piece = piece;
        if moved_piece.tracks_moves() {
            moved_piece.has_moved = true;
        }
        self.grid[mv.from] = None;
        if let Some(pos) = capture_pos {
            self.grid[pos] = None;
        }
        if let Some(dir) = castle {
            let rook_from = Coord::new(mv.from.row, dir.rook_col());
            let rook_to = mv.from.offset((0, dir.king_step())).unwrap_or_else(|| {
                panic!("{}", internal_error_message!("castling from {:?}", mv.from))
            });
            let mut rook = self.grid[rook_from].take().unwrap_or_else(|| {
                panic!("{}", internal_error_message!("castling without a rook on {rook_from:?}"))
            });
            rook.has_moved = true;
            self.grid[rook_to] = Some(rook);
        }
        self.grid[mv.to] = Some(match promote_to {
            Some(kind) => {
                let mut promoted = PieceOnBoard::new(kind, force, false);
                promoted.has_moved = promoted.tracks_moves();
                promoted
            }
            None => moved_piece,
        });

        let is_pawn = piece.kind == PieceKind::Pawn;
        self.half_move_clock =
            if is_pawn || capture_pos.is_some() { 0 } else { self.half_move_clock.saturating_add(1) };
        let (d_row, _) = mv.to - mv.from;
        self.en_passant_target =
            (is_pawn && d_row.abs() == 2).then(|| mv.from.offset((d_row / 2, 0))).flatten();
        self.active_force = force.opponent();
        if force == Force::Black {
            self.full_move_number = self.full_move_number.saturating_add(1);
        }
        self.refresh_derived_state();

        let mut tags = MoveTags::default();
        if capture_pos.is_some() {
            tags.insert(MoveType::Capture);
        }
        if en_passant {
            tags.insert(MoveType::EnPassant);
        }
        if castle.is_some() {
            tags.insert(MoveType::Castling);
        }
        if promote_to.is_some() {
            tags.insert(MoveType::Promotion);
        }
        let mark = match (self.check_state.is_check(), self.legal_moves.is_empty()) {
            (true, true) => {
                tags.insert(MoveType::Check);
                tags.insert(MoveType::CheckMate);
                Some(CheckMark::Mate)
            }
            (true, false) => {
                tags.insert(MoveType::Check);
                Some(CheckMark::Check)
            }
            (false, _) => None,
        };
        if tags.iter().next().is_none() {
            tags.insert(MoveType::BasicMove);
        }
        let last_move = LastMove {
            from: mv.from,
            to: mv.to,
            piece,
            promote_to,
            tags,
        };
        let algebraic = algebraic.format_with_mark(mark);
        debug!("{force} played {algebraic}");
        self.last_move = Some(last_move.clone());

        self.fen = fen::board_to_fen(self);
        self.record_position();
        self.status = self.evaluate_status();
        if let Some(message) = self.status.message() {
            info!("Game over after {algebraic}: {message}");
        }
        TurnFacts { last_move, algebraic }
    }

    fn refresh_derived_state(&mut self) {
        self.check_state = check_state(&self.grid, self.active_force);
        self.legal_moves =
            generate_legal_moves(&mut self.grid, self.active_force, self.en_passant_target);
    }

    fn record_position(&mut self) {
        let key = fen::position_key(&self.fen).to_owned();
        let count = self.position_count.entry(key).or_insert(0);
        *count += 1;
        if *count >= REPETITION_DRAW_COUNT {
            self.repetition_reached = true;
        }
    }

    // Priority: insufficient material, mate, stalemate, repetition, fifty-move rule.
    fn evaluate_status(&self) -> ChessGameStatus {
        if is_insufficient_material(&self.grid) {
            ChessGameStatus::Draw(DrawReason::InsufficientMaterial)
        } else if self.legal_moves.is_empty() {
            if self.check_state.is_check() {
                ChessGameStatus::Victory(self.active_force.opponent(), VictoryReason::Checkmate)
            } else {
                ChessGameStatus::Draw(DrawReason::Stalemate)
            }
        } else if self.rules.threefold_repetition && self.repetition_reached {
            ChessGameStatus::Draw(DrawReason::ThreefoldRepetition)
        } else if self.rules.fifty_move_rule && self.half_move_clock >= FIFTY_MOVE_RULE_PLIES {
            ChessGameStatus::Draw(DrawReason::FiftyMoveRule)
        } else {
            ChessGameStatus::Active
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> Board { Board::new(ChessRules::classic(), BoardSetup::classic()) }

    fn mv(from: Coord, to: Coord) -> TurnMove { TurnMove { from, to, promote_to: None } }

    #[test]
    fn rejected_turn_changes_nothing() {
        let mut board = classic();
        let fen_before = board.fen().to_owned();
        assert_eq!(board.try_turn(mv(Coord::E3, Coord::E4)).unwrap_err(), TurnError::PieceMissing);
        assert_eq!(
            board.try_turn(mv(Coord::E7, Coord::E5)).unwrap_err(),
            TurnError::WrongTurnOrder
        );
        assert_eq!(board.try_turn(mv(Coord::E2, Coord::E5)).unwrap_err(), TurnError::IllegalMove);
        assert_eq!(
            board
                .try_turn(TurnMove { promote_to: Some(PieceKind::Queen), ..mv(Coord::E2, Coord::E4) })
                .unwrap_err(),
            TurnError::BadPromotion
        );
        assert_eq!(board.fen(), fen_before);
        assert_eq!(board.legal_moves().num_moves(), 20);
    }

    #[test]
    fn counters() {
        let mut board = classic();
        board.try_turn(mv(Coord::G1, Coord::F3)).unwrap();
        assert_eq!((board.half_move_clock(), board.full_move_number()), (1, 1));
        board.try_turn(mv(Coord::E7, Coord::E5)).unwrap();
        assert_eq!((board.half_move_clock(), board.full_move_number()), (0, 2));
        assert_eq!(board.en_passant_target(), Some(Coord::E6));
        board.try_turn(mv(Coord::F3, Coord::E5)).unwrap();
        assert_eq!(board.half_move_clock(), 0);
        assert_eq!(board.en_passant_target(), None);
        assert!(board.last_move().unwrap().tags.has(MoveType::Capture));
    }

    #[test]
    fn counters_saturate() {
        let rules = ChessRules { fifty_move_rule: false, ..ChessRules::classic() };
        let setup = crate::fen::fen_to_board_setup(
            "4k3/8/8/8/8/8/4P3/4K3 b - - 4294967295 4294967295",
        )
        .unwrap();
        let mut board = Board::new(rules, setup);
        board.try_turn(mv(Coord::E8, Coord::D8)).unwrap();
        assert_eq!((board.half_move_clock(), board.full_move_number()), (u32::MAX, u32::MAX));
    }

    #[test]
    fn basic_move_tag_is_exclusive() {
        let mut board = classic();
        let facts = board.try_turn(mv(Coord::E2, Coord::E4)).unwrap();
        assert_eq!(facts.last_move.tags.iter().collect_vec(), vec![MoveType::BasicMove]);
        assert_eq!(facts.algebraic, "e4");
    }

    #[test]
    fn indices_out_of_range() {
        let board = classic();
        let input = TurnInput::Indices { from: (1, 4), to: (8, 4), promote_to: None };
        assert_eq!(board.parse_turn_input(&input).unwrap_err(), TurnError::OutOfBounds);
        let input = TurnInput::Indices { from: (1, 4), to: (3, 4), promote_to: None };
        assert_eq!(board.parse_turn_input(&input).unwrap(), mv(Coord::E2, Coord::E4));
    }
}
