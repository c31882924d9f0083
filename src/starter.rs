use crate::coord::{Col, Coord, NUM_ROWS, Row};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceKind, PieceOnBoard};


// Everything needed to construct a `Board`. Derived state (legal moves, check, status) is not
// part of the setup: the board computes it.
#[derive(Clone, Debug)]
pub struct BoardSetup {
    pub grid: Grid,
    pub active_force: Force,
    pub en_passant_target: Option<Coord>,
    pub half_move_clock: u32,
    pub full_move_number: u32,
}

fn new_white(kind: PieceKind) -> Option<PieceOnBoard> {
    Some(PieceOnBoard::new(kind, Force::White, false))
}

fn setup_black_pieces_mirrorlike(grid: &mut Grid) {
    for coord in Coord::all() {
        if let Some(piece) = grid[coord] {
            if piece.force == Force::White {
                let mirror_row = Row::from_zero_based(NUM_ROWS - coord.row.to_zero_based() - 1);
                let mirror_coord = Coord::new(mirror_row, coord.col);
                assert!(grid[mirror_coord].is_none(), "{:?}", grid);
                grid[mirror_coord] = Some(PieceOnBoard { force: Force::Black, ..piece });
            }
        }
    }
}

pub fn generate_starting_grid() -> Grid {
    use PieceKind::*;
    let mut grid = Grid::new();
    let back_row = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
    for (col, kind) in Col::all().zip(back_row) {
        grid[Coord::new(Row::_1, col)] = new_white(kind);
        grid[Coord::new(Row::_2, col)] = new_white(Pawn);
    }
    setup_black_pieces_mirrorlike(&mut grid);
    grid
}

impl BoardSetup {
    pub fn classic() -> Self {
        BoardSetup {
            grid: generate_starting_grid(),
            active_force: Force::White,
            en_passant_target: None,
            half_move_clock: 0,
            full_move_number: 1,
        }
    }
}
