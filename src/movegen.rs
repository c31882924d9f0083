// Attack detection and legal move generation.
//
// Legality is established by trying the move: the mover is put on the destination through a
// `SpeculativeGrid` (which restores the board when dropped) and the attack scan is run for the
// mover's own king.

use std::collections::BTreeMap;

use enum_map::{EnumMap, enum_map};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::coord::{Col, Coord, SubjectiveRow};
use crate::force::Force;
use crate::grid::Grid;
use crate::internal_error_message;
use crate::piece::{CastleDirection, PieceKind, PieceOnBoard};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CheckState {
    NotInCheck,
    InCheck(Coord), // king position
}

impl CheckState {
    pub fn is_check(self) -> bool { matches!(self, CheckState::InCheck(_)) }
}

pub type CastlingRights = EnumMap<Force, EnumMap<CastleDirection, bool>>;

// Origin -> destinations. Origins without legal moves are absent.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LegalMoves {
    map: BTreeMap<Coord, Vec<Coord>>,
}

impl LegalMoves {
    pub fn destinations(&self, from: Coord) -> &[Coord] {
        self.map.get(&from).map_or(&[][..], |v| v.as_slice())
    }
    pub fn contains(&self, from: Coord, to: Coord) -> bool { self.destinations(from).contains(&to) }
    pub fn is_empty(&self) -> bool { self.map.is_empty() }
    pub fn num_moves(&self) -> usize { self.map.values().map(Vec::len).sum() }
    pub fn origins(&self) -> impl Iterator<Item = Coord> + '_ { self.map.keys().copied() }
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &[Coord])> + '_ {
        self.map.iter().map(|(&from, to)| (from, to.as_slice()))
    }
    pub fn moves(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.iter().flat_map(|(from, to)| to.iter().map(move |&to| (from, to)))
    }
}

pub fn find_king(grid: &Grid, force: Force) -> Coord {
    grid.pieces_of(force)
        .find(|(_, piece)| piece.kind == PieceKind::King)
        .map(|(pos, _)| pos)
        .unwrap_or_else(|| panic!("{}", internal_error_message!("no {force} king on the board")))
}

// Whether `piece` standing on `from` attacks `target`. Pawns attack only diagonally and nothing
// attacks through other pieces.
fn attacks(grid: &Grid, from: Coord, piece: PieceOnBoard, target: Coord) -> bool {
    for &dir in piece.vectors() {
        if piece.kind == PieceKind::Pawn && dir.1 == 0 {
            continue;
        }
        let mut pos = from;
        while let Some(next) = pos.offset(dir) {
            if next == target {
                return true;
            }
            if !piece.kind.is_slider() || grid[next].is_some() {
                break;
            }
            pos = next;
        }
    }
    false
}

pub fn is_square_attacked(grid: &Grid, target: Coord, by: Force) -> bool {
    grid.pieces_of(by).any(|(from, piece)| attacks(grid, from, piece, target))
}

pub fn check_state(grid: &Grid, force: Force) -> CheckState {
    let king_pos = find_king(grid, force);
    if is_square_attacked(grid, king_pos, force.opponent()) {
        CheckState::InCheck(king_pos)
    } else {
        CheckState::NotInCheck
    }
}

// Castling rights are not stored separately: they follow from the has-moved flags of the king
// and of the corner rooks.
pub fn castling_rights(grid: &Grid) -> CastlingRights {
    let mut rights = enum_map! { _ => enum_map! { _ => false } };
    for force in Force::iter() {
        let row = SubjectiveRow::first().to_row(force);
        let unmoved = |col: Col, kind: PieceKind| {
            grid[Coord::new(row, col)]
                .is_some_and(|p| p.kind == kind && p.force == force && !p.has_moved)
        };
        if !unmoved(Col::E, PieceKind::King) {
            continue;
        }
        for dir in CastleDirection::iter() {
            rights[force][dir] = unmoved(dir.rook_col(), PieceKind::Rook);
        }
    }
    rights
}

// Applies `changes` speculatively and tests whether `force` would be in check.
fn is_safe_after(grid: &mut Grid, force: Force, changes: &[(Coord, Option<PieceOnBoard>)]) -> bool {
    let mut grid = grid.speculate();
    for &(pos, piece) in changes {
        grid.set(pos, piece);
    }
    !check_state(&grid, force).is_check()
}

fn pawn_candidate(grid: &Grid, from: Coord, pawn: PieceOnBoard, dir: (i8, i8)) -> Option<Coord> {
    let to = from.offset(dir)?;
    let occupant = grid[to];
    let (d_row, d_col) = dir;
    if d_col != 0 {
        // En passant is generated separately.
        return occupant.filter(|p| p.force != pawn.force).map(|_| to);
    }
    if occupant.is_some() {
        return None;
    }
    if d_row.abs() == 2 {
        let middle = from.offset((d_row / 2, 0))?;
        if pawn.has_moved || grid[middle].is_some() {
            return None;
        }
    }
    Some(to)
}

// Destinations reachable by the piece's vectors, not yet filtered for king safety.
fn candidate_destinations(grid: &Grid, from: Coord, piece: PieceOnBoard) -> Vec<Coord> {
    let mut candidates = Vec::new();
    for &dir in piece.vectors() {
        if piece.kind == PieceKind::Pawn {
            candidates.extend(pawn_candidate(grid, from, piece, dir));
            continue;
        }
        let mut pos = from;
        while let Some(to) = pos.offset(dir) {
            match grid[to] {
                None => candidates.push(to),
                Some(other) => {
                    if other.force != piece.force {
                        candidates.push(to);
                    }
                    break;
                }
            }
            if !piece.kind.is_slider() {
                break;
            }
            pos = to;
        }
    }
    candidates
}

fn castling_destinations(
    grid: &mut Grid, king_pos: Coord, king: PieceOnBoard, rights: &CastlingRights,
) -> Vec<Coord> {
    let mut destinations = Vec::new();
    for dir in CastleDirection::iter() {
        if !rights[king.force][dir] {
            continue;
        }
        let rook_col = dir.rook_col();
        let (col_min, col_max) = if rook_col < king_pos.col {
            (rook_col, king_pos.col)
        } else {
            (king_pos.col, rook_col)
        };
        let path_free = Col::all()
            .filter(|&col| col_min < col && col < col_max)
            .all(|col| grid[Coord::new(king_pos.row, col)].is_none());
        if !path_free {
            continue;
        }
        let step = dir.king_step();
        let (Some(transit), Some(to)) = (king_pos.offset((0, step)), king_pos.offset((0, 2 * step)))
        else {
            continue;
        };
        // The rook's squares need not be safe, only the squares the king steps on.
        let king_passes = [transit, to].into_iter().all(|square| {
            is_safe_after(grid, king.force, &[(king_pos, None), (square, Some(king))])
        });
        if king_passes {
            destinations.push(to);
        }
    }
    destinations
}

fn en_passant_destination(
    grid: &mut Grid, from: Coord, pawn: PieceOnBoard, target: Coord,
) -> Option<Coord> {
    let (d_row, d_col) = target - from;
    if d_row != pawn.force.direction_forward() || d_col.abs() != 1 || grid[target].is_some() {
        return None;
    }
    let victim_pos = Coord::new(from.row, target.col);
    let victim_ok = grid[victim_pos]
        .is_some_and(|p| p.kind == PieceKind::Pawn && p.force == pawn.force.opponent());
    let safe = victim_ok &&
        is_safe_after(grid, pawn.force, &[(from, None), (victim_pos, None), (target, Some(pawn))]);
    safe.then_some(target)
}

// Full regeneration, never incremental. The grid is returned intact.
pub fn generate_legal_moves(
    grid: &mut Grid, force: Force, en_passant_target: Option<Coord>,
) -> LegalMoves {
    let in_check = check_state(grid, force).is_check();
    let rights = castling_rights(grid);
    let mut map = BTreeMap::new();
    for (from, piece) in grid.pieces_of(force).collect_vec() {
        let mut destinations = candidate_destinations(grid, from, piece)
            .into_iter()
            .filter(|&to| is_safe_after(grid, force, &[(from, None), (to, Some(piece))]))
            .collect_vec();
        match piece.kind {
            PieceKind::King if !in_check => {
                destinations.extend(castling_destinations(grid, from, piece, &rights));
            }
            PieceKind::Pawn => {
                if let Some(target) = en_passant_target {
                    destinations.extend(en_passant_destination(grid, from, piece, target));
                }
            }
            _ => {}
        }
        if !destinations.is_empty() {
            map.insert(from, destinations);
        }
    }
    LegalMoves { map }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::starter::generate_starting_grid;

    fn put(grid: &mut Grid, pos: Coord, kind: PieceKind, force: Force) {
        grid[pos] = Some(PieceOnBoard::new(kind, force, false));
    }

    fn kings(e1: Coord, e8: Coord) -> Grid {
        let mut grid = Grid::new();
        put(&mut grid, e1, PieceKind::King, Force::White);
        put(&mut grid, e8, PieceKind::King, Force::Black);
        grid
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let mut grid = generate_starting_grid();
        let before = grid.clone();
        let moves = generate_legal_moves(&mut grid, Force::White, None);
        assert_eq!(moves.num_moves(), 20);
        assert_eq!(moves.destinations(Coord::G1), &[Coord::H3, Coord::F3]);
        assert_eq!(moves.destinations(Coord::E2), &[Coord::E3, Coord::E4]);
        assert!(moves.destinations(Coord::E1).is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn sliders_do_not_attack_through_pieces() {
        let mut grid = kings(Coord::E1, Coord::H8);
        put(&mut grid, Coord::E8, PieceKind::Rook, Force::Black);
        assert_eq!(check_state(&grid, Force::White), CheckState::InCheck(Coord::E1));
        put(&mut grid, Coord::E4, PieceKind::Knight, Force::Black);
        assert_eq!(check_state(&grid, Force::White), CheckState::NotInCheck);
    }

    #[test]
    fn pawns_attack_diagonally_only() {
        let mut grid = kings(Coord::E1, Coord::H8);
        put(&mut grid, Coord::E2, PieceKind::Pawn, Force::Black);
        assert!(!check_state(&grid, Force::White).is_check());
        put(&mut grid, Coord::D2, PieceKind::Pawn, Force::Black);
        assert!(check_state(&grid, Force::White).is_check());
    }

    #[test]
    fn pinned_piece_stays() {
        let mut grid = kings(Coord::E1, Coord::H8);
        put(&mut grid, Coord::E2, PieceKind::Knight, Force::White);
        put(&mut grid, Coord::E7, PieceKind::Rook, Force::Black);
        let moves = generate_legal_moves(&mut grid, Force::White, None);
        assert!(moves.destinations(Coord::E2).is_empty());
        assert!(moves.contains(Coord::E1, Coord::D1));
        assert!(!moves.contains(Coord::E1, Coord::E2));
    }

    #[test]
    fn king_cannot_capture_protected_piece() {
        let mut grid = kings(Coord::E1, Coord::H8);
        put(&mut grid, Coord::E2, PieceKind::Queen, Force::Black);
        put(&mut grid, Coord::E5, PieceKind::Rook, Force::Black);
        let moves = generate_legal_moves(&mut grid, Force::White, None);
        assert!(moves.is_empty());
        assert!(check_state(&grid, Force::White).is_check());
    }

    #[test]
    fn castling_rights_follow_has_moved() {
        let mut grid = generate_starting_grid();
        assert!(castling_rights(&grid).values().all(|r| r.values().all(|&ok| ok)));
        grid[Coord::H1].as_mut().unwrap().has_moved = true;
        grid[Coord::E8].as_mut().unwrap().has_moved = true;
        let rights = castling_rights(&grid);
        assert!(rights[Force::White][CastleDirection::ASide]);
        assert!(!rights[Force::White][CastleDirection::HSide]);
        assert!(!rights[Force::Black][CastleDirection::ASide]);
        assert!(!rights[Force::Black][CastleDirection::HSide]);
    }

    #[test]
    #[should_panic(expected = "no Black king")]
    fn missing_king_is_a_bug() {
        let mut grid = Grid::new();
        put(&mut grid, Coord::E1, PieceKind::King, Force::White);
        check_state(&grid, Force::Black);
    }
}
