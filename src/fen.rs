// Classic FEN: six space-separated fields, castling as "KQkq".
//
// Has-moved flags are not part of FEN. When reading, they are reconstructed from what FEN does
// tell: pawns off their start row have moved, kings and rooks without castling rights have
// moved. This is enough to reproduce the legal moves of the position.

use enum_map::enum_map;
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::board::Board;
use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row, SubjectiveRow};
use crate::force::Force;
use crate::grid::Grid;
use crate::movegen::CastlingRights;
use crate::piece::{CastleDirection, PieceKind, PieceOnBoard, piece_from_ascii, piece_to_ascii};
use crate::starter::BoardSetup;
use crate::util::as_single_char;


fn force_to_fen(force: Force) -> char {
    match force {
        Force::White => 'w',
        Force::Black => 'b',
    }
}
fn force_from_fen(s: &str) -> Result<Force, String> {
    let ch = as_single_char(s).ok_or_else(|| format!("invalid active color: {s}"))?;
    match ch {
        'w' => Ok(Force::White),
        'b' => Ok(Force::Black),
        _ => Err(format!("invalid active color: {ch}")),
    }
}

fn castling_to_fen_char(force: Force, dir: CastleDirection) -> char {
    let ch = match dir {
        CastleDirection::HSide => 'K',
        CastleDirection::ASide => 'Q',
    };
    match force {
        Force::White => ch,
        Force::Black => ch.to_ascii_lowercase(),
    }
}
fn castling_from_fen_char(ch: char) -> Result<(Force, CastleDirection), String> {
    let dir = match ch.to_ascii_uppercase() {
        'K' => CastleDirection::HSide,
        'Q' => CastleDirection::ASide,
        _ => return Err(format!("invalid castling right: {ch}")),
    };
    let force = if ch.is_ascii_uppercase() { Force::White } else { Force::Black };
    Ok((force, dir))
}

fn castling_rights_to_fen(castling_rights: &CastlingRights) -> String {
    let mut s = String::new();
    // FEN order is "KQkq": H-side first.
    for force in Force::iter() {
        for dir in [CastleDirection::HSide, CastleDirection::ASide] {
            if castling_rights[force][dir] {
                s.push(castling_to_fen_char(force, dir));
            }
        }
    }
    if s.is_empty() { "-".to_owned() } else { s }
}
fn castling_rights_from_fen(grid: &Grid, s: &str) -> Result<CastlingRights, String> {
    let mut castling_rights = enum_map! { _ => enum_map! { _ => false } };
    if s == "-" {
        return Ok(castling_rights);
    }
    for ch in s.chars() {
        let (force, dir) = castling_from_fen_char(ch)?;
        if castling_rights[force][dir] {
            return Err(format!("duplicate castling right: {ch}"));
        }
        let home_row = SubjectiveRow::first().to_row(force);
        let has = |col: Col, kind: PieceKind| {
            grid[Coord::new(home_row, col)].is_some_and(|p| p.kind == kind && p.force == force)
        };
        if !has(Col::E, PieceKind::King) {
            return Err(format!("castling right {ch} requires the king on its initial square"));
        }
        if !has(dir.rook_col(), PieceKind::Rook) {
            return Err(format!("castling right {ch} requires the rook in the corner"));
        }
        castling_rights[force][dir] = true;
    }
    Ok(castling_rights)
}

fn en_passant_target_to_fen(en_passant_target: Option<Coord>) -> String {
    match en_passant_target {
        None => "-".to_owned(),
        Some(pos) => pos.to_algebraic(),
    }
}
fn en_passant_target_from_fen(s: &str, active_force: Force) -> Result<Option<Coord>, String> {
    if s == "-" {
        return Ok(None);
    }
    let pos = Coord::from_algebraic(s).ok_or_else(|| format!("invalid en passant target: {s}"))?;
    // The skipped square is on the third row of the side that just moved.
    let expected_row = SubjectiveRow::from_one_based(3).to_row(active_force.opponent());
    if pos.row != expected_row {
        return Err(format!("en passant target {s} is on a wrong row"));
    }
    Ok(Some(pos))
}

fn grid_to_fen(grid: &Grid) -> String {
    Row::all()
        .rev()
        .map(|row| {
            let mut row_notation = String::new();
            let mut empty_col_count: u8 = 0;
            for col in Col::all() {
                if let Some(piece) = grid[Coord::new(row, col)] {
                    if empty_col_count > 0 {
                        row_notation.push_str(&empty_col_count.to_string());
                        empty_col_count = 0;
                    }
                    row_notation.push(piece_to_ascii(piece.kind, piece.force));
                } else {
                    empty_col_count += 1;
                }
            }
            if empty_col_count > 0 {
                row_notation.push_str(&empty_col_count.to_string());
            }
            row_notation
        })
        .join("/")
}
fn grid_from_fen(grid_notation: &str) -> Result<Grid, String> {
    let mut grid = Grid::new();
    let rows = grid_notation.split('/').collect_vec();
    if rows.len() != usize::from(NUM_ROWS) {
        return Err(format!("has {} rows, expected {NUM_ROWS}", rows.len()));
    }
    for (row, row_notation) in Row::all().rev().zip(rows) {
        let mut col: u8 = 0;
        for ch in row_notation.chars() {
            if let Some(n) = ch.to_digit(10) {
                if n == 0 {
                    return Err(format!("zero-length gap in row {}", row.to_algebraic()));
                }
                col = col
                    .checked_add(n as u8)
                    .filter(|&c| c <= NUM_COLS)
                    .ok_or_else(|| format!("row {} is too long", row.to_algebraic()))?;
            } else if let Some((kind, force)) = piece_from_ascii(ch) {
                if col >= NUM_COLS {
                    return Err(format!("row {} is too long", row.to_algebraic()));
                }
                grid[Coord::new(row, Col::from_zero_based(col))] =
                    Some(PieceOnBoard::new(kind, force, false));
                col += 1;
            } else {
                return Err(format!("unknown piece: {ch}"));
            }
        }
        if col != NUM_COLS {
            return Err(format!(
                "row {} has {col} columns, expected {NUM_COLS}",
                row.to_algebraic()
            ));
        }
    }
    Ok(grid)
}

fn validate_kings(grid: &Grid) -> Result<(), String> {
    for force in Force::iter() {
        let num_kings = grid
            .pieces_of(force)
            .filter(|(_, piece)| piece.kind == PieceKind::King)
            .count();
        if num_kings != 1 {
            return Err(format!("{force} has {num_kings} kings, expected 1"));
        }
    }
    Ok(())
}

// Pawns off their start row have moved. Kings and rooks have moved unless a castling right
// says otherwise.
fn restore_has_moved(grid: &mut Grid, castling_rights: &CastlingRights) {
    for force in Force::iter() {
        let home_row = SubjectiveRow::first().to_row(force);
        let pawn_row = SubjectiveRow::from_one_based(2).to_row(force);
        let any_right = castling_rights[force].values().any(|&ok| ok);
        for (pos, piece) in grid.pieces_of(force).collect_vec() {
            let unmoved = match piece.kind {
                PieceKind::Pawn => pos.row == pawn_row,
                PieceKind::King => any_right,
                PieceKind::Rook => CastleDirection::iter().any(|dir| {
                    castling_rights[force][dir] && pos == Coord::new(home_row, dir.rook_col())
                }),
                PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => true,
            };
            grid[pos] = Some(PieceOnBoard { has_moved: !unmoved, ..piece });
        }
    }
}

pub fn board_to_fen(board: &Board) -> String {
    format!(
        "{} {} {} {} {} {}",
        grid_to_fen(board.grid()),
        force_to_fen(board.active_force()),
        castling_rights_to_fen(&board.castling_rights()),
        en_passant_target_to_fen(board.en_passant_target()),
        board.half_move_clock(),
        board.full_move_number(),
    )
}

// FEN without the move counters. Positions with equal keys count as repetitions.
pub fn position_key(fen: &str) -> &str {
    match fen.match_indices(' ').nth(3) {
        Some((idx, _)) => &fen[..idx],
        None => fen,
    }
}

pub fn fen_to_board_setup(fen: &str) -> Result<BoardSetup, String> {
    let (
        grid_notation,
        active_force_notation,
        castling_notation,
        en_passant_target_notation,
        half_move_clock,
        full_move_number,
    ) = fen
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| format!("invalid FEN: expected 6 fields: {fen}"))?;

    let mut grid = grid_from_fen(grid_notation).map_err(|err| format!("invalid FEN: {err}"))?;
    validate_kings(&grid).map_err(|err| format!("invalid FEN: {err}"))?;
    let active_force = force_from_fen(active_force_notation)?;
    let castling_rights = castling_rights_from_fen(&grid, castling_notation)?;
    restore_has_moved(&mut grid, &castling_rights);
    let en_passant_target = en_passant_target_from_fen(en_passant_target_notation, active_force)?;
    let half_move_clock = half_move_clock
        .parse::<u32>()
        .map_err(|_| format!("invalid half-move clock: {half_move_clock}"))?;
    let full_move_number = full_move_number
        .parse::<u32>()
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| format!("invalid full move number: {full_move_number}"))?;

    Ok(BoardSetup {
        grid,
        active_force,
        en_passant_target,
        half_move_clock,
        full_move_number,
    })
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rules::ChessRules;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn starting_position() {
        let board = Board::new(ChessRules::classic(), BoardSetup::classic());
        assert_eq!(board_to_fen(&board), START);
        let setup = fen_to_board_setup(START).unwrap();
        assert_eq!(setup.grid, BoardSetup::classic().grid);
    }

    #[test]
    fn position_key_drops_counters() {
        assert_eq!(position_key(START), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
    }

    #[test]
    fn has_moved_is_reconstructed() {
        let setup = fen_to_board_setup("4k2r/8/8/8/4P3/8/8/R3K2R b Kk e3 0 12").unwrap();
        let grid = &setup.grid;
        assert!(grid[Coord::E4].unwrap().has_moved);
        assert!(!grid[Coord::E1].unwrap().has_moved);
        assert!(!grid[Coord::H1].unwrap().has_moved);
        assert!(grid[Coord::A1].unwrap().has_moved);
        assert!(!grid[Coord::H8].unwrap().has_moved);
        assert_eq!(setup.en_passant_target, Some(Coord::E3));
        assert_eq!(setup.active_force, Force::Black);
        assert_eq!(setup.full_move_number, 12);
    }

    #[test]
    fn malformed() {
        let bad = [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN1 w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
        ];
        for fen in bad {
            assert!(fen_to_board_setup(fen).is_err(), "{fen}");
        }
        let long_row = format!("{}/8/8/8/8/8/8/4K2k w - - 0 1", "9".repeat(30));
        assert!(fen_to_board_setup(&long_row).is_err());
    }
}

