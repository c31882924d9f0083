use std::{fmt, ops};

use ndarray::{Array, Array2};
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::piece::{PieceOnBoard, piece_to_ascii};


pub type Grid = GenericGrid<PieceOnBoard>;

// What external collaborators see: FEN piece chars, uppercase for White.
pub type BoardView = GenericGrid<char>;

// Indexed by `Coord`, so `data[[0, 0]]` is a1 and `data[[7, 0]]` is a8.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericGrid<T: Clone> {
    data: Array2<Option<T>>,
}

impl<T: Clone> GenericGrid<T> {
    pub fn new() -> Self {
        GenericGrid {
            data: Array::from_elem((NUM_ROWS as usize, NUM_COLS as usize), None),
        }
    }

    pub fn map<U: Clone>(&self, f: impl FnMut(T) -> U + Copy) -> GenericGrid<U> {
        GenericGrid { data: self.data.mapv(|v| v.map(f)) }
    }

    // Row-major rows of the grid, starting from row 1.
    pub fn rows(&self) -> Vec<Vec<Option<T>>> {
        self.data.outer_iter().map(|row| row.to_vec()).collect()
    }
}

impl Grid {
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, PieceOnBoard)> + '_ {
        Coord::all().filter_map(|pos| self[pos].map(|piece| (pos, piece)))
    }

    pub fn pieces_of(&self, force: Force) -> impl Iterator<Item = (Coord, PieceOnBoard)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.force == force)
    }

    pub fn to_view(&self) -> BoardView { self.map(|piece| piece_to_ascii(piece.kind, piece.force)) }

    // Opens a speculative session: changes made through the returned guard are reverted when
    // it goes out of scope, on every exit path.
    pub fn speculate(&mut self) -> SpeculativeGrid<'_> {
        SpeculativeGrid { grid: self, saved: Vec::new() }
    }
}

pub struct SpeculativeGrid<'a> {
    grid: &'a mut Grid,
    saved: Vec<(Coord, Option<PieceOnBoard>)>,
}

impl SpeculativeGrid<'_> {
    pub fn set(&mut self, pos: Coord, piece: Option<PieceOnBoard>) {
        let original = std::mem::replace(&mut self.grid[pos], piece);
        self.saved.push((pos, original));
    }
}

impl ops::Deref for SpeculativeGrid<'_> {
    type Target = Grid;
    fn deref(&self) -> &Grid { &*self.grid }
}

impl Drop for SpeculativeGrid<'_> {
    fn drop(&mut self) {
        // Reverse order, so that a cell changed twice gets its very first value back.
        while let Some((pos, piece)) = self.saved.pop() {
            self.grid[pos] = piece;
        }
    }
}

impl<T: Clone> ops::Index<Coord> for GenericGrid<T> {
    type Output = Option<T>;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl<T: Clone> ops::IndexMut<Coord> for GenericGrid<T> {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output { &mut self.data[coord_to_index(pos)] }
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    [pos.row.to_zero_based() as usize, pos.col.to_zero_based() as usize]
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.pieces().map(|(pos, piece)| {
                let moved = if piece.has_moved { "-moved" } else { "" };
                (pos.to_algebraic(), format!("{:?}-{:?}{}", piece.force, piece.kind, moved))
            }))
            .finish()
    }
}

impl fmt::Debug for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BoardView ")?;
        f.debug_map()
            .entries(
                Coord::all().filter_map(|pos| self[pos].map(|ch| (pos.to_algebraic(), ch))),
            )
            .finish()
    }
}
