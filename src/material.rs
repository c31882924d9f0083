use enum_map::EnumMap;
use itertools::Itertools;

use crate::coord::Coord;
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::PieceKind;


// Positions where no sequence of legal moves can lead to mate:
//   - K vs K;
//   - K + minor piece vs K;
//   - K + two knights vs K;
//   - K + bishops on same-colored squares vs K;
//   - K + B vs K + B, bishops on same-colored squares.
pub fn is_insufficient_material(grid: &Grid) -> bool {
    let mut pieces: EnumMap<Force, Vec<(Coord, PieceKind)>> = EnumMap::default();
    for (pos, piece) in grid.pieces() {
        if piece.kind != PieceKind::King {
            pieces[piece.force].push((pos, piece.kind));
        }
    }
    let (white, black) = (&pieces[Force::White], &pieces[Force::Black]);
    match (white.is_empty(), black.is_empty()) {
        (true, true) => true,
        (false, true) => lone_army_cannot_mate(white),
        (true, false) => lone_army_cannot_mate(black),
        (false, false) => match (white.as_slice(), black.as_slice()) {
            (&[(w_pos, PieceKind::Bishop)], &[(b_pos, PieceKind::Bishop)]) => {
                w_pos.is_dark() == b_pos.is_dark()
            }
            _ => false,
        },
    }
}

fn lone_army_cannot_mate(army: &[(Coord, PieceKind)]) -> bool {
    match army {
        [(_, kind)] => kind.is_minor(),
        _ if army.iter().all(|(_, kind)| *kind == PieceKind::Knight) => army.len() == 2,
        _ if army.iter().all(|(_, kind)| *kind == PieceKind::Bishop) => {
            army.iter().map(|(pos, _)| pos.is_dark()).all_equal()
        }
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceOnBoard;
    use crate::starter::generate_starting_grid;

    fn grid_with(pieces: &[(Coord, PieceKind, Force)]) -> Grid {
        let mut grid = Grid::new();
        grid[Coord::E1] = Some(PieceOnBoard::new(PieceKind::King, Force::White, false));
        grid[Coord::E8] = Some(PieceOnBoard::new(PieceKind::King, Force::Black, false));
        for &(pos, kind, force) in pieces {
            grid[pos] = Some(PieceOnBoard::new(kind, force, false));
        }
        grid
    }

    #[test]
    fn insufficient() {
        use Force::*;
        use PieceKind::*;
        assert!(is_insufficient_material(&grid_with(&[])));
        assert!(is_insufficient_material(&grid_with(&[(Coord::C1, Bishop, White)])));
        assert!(is_insufficient_material(&grid_with(&[(Coord::B8, Knight, Black)])));
        assert!(is_insufficient_material(&grid_with(&[
            (Coord::B1, Knight, White),
            (Coord::G1, Knight, White),
        ])));
        // a1, c3 and h8 are all dark.
        assert!(is_insufficient_material(&grid_with(&[
            (Coord::A1, Bishop, White),
            (Coord::C3, Bishop, White),
            (Coord::H8, Bishop, White),
        ])));
        assert!(is_insufficient_material(&grid_with(&[
            (Coord::C1, Bishop, White),
            (Coord::F8, Bishop, Black),
        ])));
    }

    #[test]
    fn sufficient() {
        use Force::*;
        use PieceKind::*;
        assert!(!is_insufficient_material(&generate_starting_grid()));
        assert!(!is_insufficient_material(&grid_with(&[(Coord::A2, Pawn, White)])));
        assert!(!is_insufficient_material(&grid_with(&[(Coord::A1, Rook, Black)])));
        assert!(!is_insufficient_material(&grid_with(&[
            (Coord::C1, Bishop, White),
            (Coord::F1, Bishop, White),
        ])));
        assert!(!is_insufficient_material(&grid_with(&[
            (Coord::C1, Bishop, White),
            (Coord::B1, Knight, White),
        ])));
        assert!(!is_insufficient_material(&grid_with(&[
            (Coord::C1, Bishop, White),
            (Coord::C8, Bishop, Black),
        ])));
        assert!(!is_insufficient_material(&grid_with(&[
            (Coord::B1, Knight, White),
            (Coord::B8, Knight, Black),
        ])));
        assert!(!is_insufficient_material(&grid_with(&[
            (Coord::B1, Knight, White),
            (Coord::G1, Knight, White),
            (Coord::C1, Knight, White),
        ])));
    }
}
