use itertools::Itertools;
use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::board::TurnMove;
use crate::coord::{Col, Coord, Row, col_from_capture, row_from_capture};
use crate::grid::Grid;
use crate::movegen::LegalMoves;
use crate::piece::{CastleDirection, PieceKind, PieceOnBoard};


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgebraicMove {
    pub piece_kind: PieceKind,
    pub from_col: Option<Col>,
    pub from_row: Option<Row>,
    pub capturing: bool,
    pub to: Coord,
    pub promote_to: Option<PieceKind>,
}

// Parsed short algebraic notation. Conversion between `AlgebraicTurn` and string can be done
// without a board. Conversion between `AlgebraicTurn` and `TurnMove` requires a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgebraicTurn {
    Move(AlgebraicMove),
    Castle(CastleDirection),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CheckMark {
    Check,
    Mate,
}

lazy_static! {
    static ref MOVE_RE: Regex = Regex::new(
        r"^([NBRQK])?([a-h])?([1-8])?([x:])?([a-h][1-8])(?:=?([NBRQ]))?[+#]?$"
    ).unwrap();
    static ref A_CASTLING_RE: Regex = Regex::new("^(0-0-0|O-O-O)[+#]?$").unwrap();
    static ref H_CASTLING_RE: Regex = Regex::new("^(0-0|O-O)[+#]?$").unwrap();
    static ref LONG_ALGEBRAIC_RE: Regex =
        Regex::new("^([a-h][1-8])([a-h][1-8])([nbrqNBRQ])?$").unwrap();
}

impl AlgebraicTurn {
    // Check and mate marks are accepted and ignored: the board knows better.
    pub fn parse(notation: &str) -> Option<Self> {
        let notation = notation.trim();
        if let Some(cap) = MOVE_RE.captures(notation) {
            let piece_kind = match cap.get(1) {
                None => PieceKind::Pawn,
                Some(m) => PieceKind::from_algebraic(m.as_str())?,
            };
            let from_col = match cap.get(2) {
                None => None,
                Some(m) => Some(col_from_capture(m.as_str())?),
            };
            let from_row = match cap.get(3) {
                None => None,
                Some(m) => Some(row_from_capture(m.as_str())?),
            };
            let capturing = cap.get(4).is_some();
            let to = Coord::from_algebraic(cap.get(5)?.as_str())?;
            let promote_to = match cap.get(6) {
                None => None,
                Some(m) => Some(PieceKind::from_algebraic(m.as_str())?),
            };
            Some(AlgebraicTurn::Move(AlgebraicMove {
                piece_kind,
                from_col,
                from_row,
                capturing,
                to,
                promote_to,
            }))
        } else if A_CASTLING_RE.is_match(notation) {
            Some(AlgebraicTurn::Castle(CastleDirection::ASide))
        } else if H_CASTLING_RE.is_match(notation) {
            Some(AlgebraicTurn::Castle(CastleDirection::HSide))
        } else {
            None
        }
    }

    pub fn format(&self) -> String {
        match self {
            AlgebraicTurn::Move(mv) => {
                let mut from = String::new();
                if let Some(col) = mv.from_col {
                    from.push(col.to_algebraic())
                };
                if let Some(row) = mv.from_row {
                    from.push(row.to_algebraic())
                };
                let promotion = match mv.promote_to {
                    Some(piece_kind) => format!("={}", piece_kind.to_full_algebraic()),
                    None => String::new(),
                };
                format!(
                    "{}{}{}{}{}",
                    mv.piece_kind.to_algebraic_for_move(),
                    from,
                    if mv.capturing { "x" } else { "" },
                    mv.to.to_algebraic(),
                    promotion,
                )
            }
            AlgebraicTurn::Castle(dir) => match dir {
                CastleDirection::ASide => "O-O-O".to_owned(),
                CastleDirection::HSide => "O-O".to_owned(),
            },
        }
    }

    pub fn format_with_mark(&self, mark: Option<CheckMark>) -> String {
        let suffix = match mark {
            None => "",
            Some(CheckMark::Check) => "+",
            Some(CheckMark::Mate) => "#",
        };
        format!("{}{}", self.format(), suffix)
    }

    // Describes a legal move before it is made. `legal_moves` must be the moves available in
    // `grid`: they are used to decide whether the starting square must be spelled out.
    pub fn from_move(grid: &Grid, legal_moves: &LegalMoves, piece: PieceOnBoard, mv: TurnMove) -> Self {
        let TurnMove { from, to, promote_to } = mv;
        if piece.kind == PieceKind::King {
            if let Some(dir) = CastleDirection::from_king_step(to.col - from.col) {
                return AlgebraicTurn::Castle(dir);
            }
        }
        let capturing =
            grid[to].is_some() || (piece.kind == PieceKind::Pawn && from.col != to.col);
        let (from_col, from_row) = match piece.kind {
            PieceKind::Pawn => (capturing.then_some(from.col), None),
            PieceKind::King => (None, None),
            _ => disambiguation(grid, legal_moves, piece, from, to),
        };
        AlgebraicTurn::Move(AlgebraicMove {
            piece_kind: piece.kind,
            from_col,
            from_row,
            capturing,
            to,
            promote_to,
        })
    }
}

// File if it tells the piece apart from its rivals, otherwise rank, otherwise both.
fn disambiguation(
    grid: &Grid, legal_moves: &LegalMoves, piece: PieceOnBoard, from: Coord, to: Coord,
) -> (Option<Col>, Option<Row>) {
    let rivals = legal_moves
        .iter()
        .filter(|&(origin, destinations)| {
            origin != from &&
                destinations.contains(&to) &&
                grid[origin].is_some_and(|p| p.kind == piece.kind && p.force == piece.force)
        })
        .map(|(origin, _)| origin)
        .collect_vec();
    if rivals.is_empty() {
        (None, None)
    } else if rivals.iter().all(|pos| pos.col != from.col) {
        (Some(from.col), None)
    } else if rivals.iter().all(|pos| pos.row != from.row) {
        (None, Some(from.row))
    } else {
        (Some(from.col), Some(from.row))
    }
}

// Long algebraic notation as spoken by UCI engines: "e2e4", "e7e8q".
pub fn parse_long_algebraic(notation: &str) -> Option<TurnMove> {
    let cap = LONG_ALGEBRAIC_RE.captures(notation.trim())?;
    let from = Coord::from_algebraic(cap.get(1)?.as_str())?;
    let to = Coord::from_algebraic(cap.get(2)?.as_str())?;
    let promote_to = match cap.get(3) {
        None => None,
        Some(m) => Some(PieceKind::from_algebraic(&m.as_str().to_ascii_uppercase())?),
    };
    Some(TurnMove { from, to, promote_to })
}

pub fn format_long_algebraic(mv: TurnMove) -> String {
    let promotion = mv
        .promote_to
        .map(|kind| kind.to_full_algebraic().to_ascii_lowercase().to_string())
        .unwrap_or_default();
    format!("{}{}{}", mv.from.to_algebraic(), mv.to.to_algebraic(), promotion)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short() {
        let turn = AlgebraicTurn::parse("Nbxd7+").unwrap();
        assert_eq!(
            turn,
            AlgebraicTurn::Move(AlgebraicMove {
                piece_kind: PieceKind::Knight,
                from_col: Some(Col::B),
                from_row: None,
                capturing: true,
                to: Coord::D7,
                promote_to: None,
            })
        );
        assert_eq!(turn.format(), "Nbxd7");

        let AlgebraicTurn::Move(mv) = AlgebraicTurn::parse("e8=Q#").unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(mv.piece_kind, PieceKind::Pawn);
        assert_eq!(mv.promote_to, Some(PieceKind::Queen));

        assert_eq!(AlgebraicTurn::parse("O-O"), Some(AlgebraicTurn::Castle(CastleDirection::HSide)));
        assert_eq!(
            AlgebraicTurn::parse("0-0-0+"),
            Some(AlgebraicTurn::Castle(CastleDirection::ASide))
        );
        assert_eq!(AlgebraicTurn::parse("Ze4"), None);
        assert_eq!(AlgebraicTurn::parse("e9"), None);
    }

    #[test]
    fn long_algebraic() {
        let mv = parse_long_algebraic("e7e8q").unwrap();
        assert_eq!(mv.from, Coord::E7);
        assert_eq!(mv.to, Coord::E8);
        assert_eq!(mv.promote_to, Some(PieceKind::Queen));
        assert_eq!(format_long_algebraic(mv), "e7e8q");
        assert!(parse_long_algebraic("e2").is_none());
        assert!(parse_long_algebraic("e2e9").is_none());
    }
}
