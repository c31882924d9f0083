use std::fmt;
use std::ops;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::force::Force;
use crate::util::as_single_char;


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;


const fn const_char_sub(a: char, b: char) -> u8 {
    let a_idx = a as u32;
    let b_idx = b as u32;
    assert!(a_idx >= b_idx);
    let diff = a_idx - b_idx;
    assert!(diff <= u8::MAX as u32);
    diff as u8
}


// Row from a force's point of view: row 1 is the home row, row 8 is the promotion row.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SubjectiveRow {
    idx: u8, // 0-based
}

impl SubjectiveRow {
    pub const fn from_one_based(idx: u8) -> Self {
        assert!(idx >= 1 && idx <= NUM_ROWS);
        Self { idx: idx - 1 }
    }
    pub const fn first() -> Self { Self::from_one_based(1) }
    pub const fn last() -> Self { Self::from_one_based(NUM_ROWS) }
    pub fn to_row(self, force: Force) -> Row {
        match force {
            Force::White => Row::from_zero_based(self.idx),
            Force::Black => Row::from_zero_based(NUM_ROWS - self.idx - 1),
        }
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub fn from_index(idx: i8) -> Option<Self> {
        (0..NUM_ROWS as i8).contains(&idx).then(|| Self { idx: idx as u8 })
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        ('1'..='8').contains(&ch).then(|| Self::from_zero_based(const_char_sub(ch, '1')))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}

impl ops::Sub for Row {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Col {
        assert!(idx < NUM_COLS);
        Col { idx }
    }
    pub fn from_index(idx: i8) -> Option<Self> {
        (0..NUM_COLS as i8).contains(&idx).then(|| Self { idx: idx as u8 })
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        ('a'..='h').contains(&ch).then(|| Self::from_zero_based(const_char_sub(ch, 'a')))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl Iterator<Item = Self> + Clone { (0..NUM_COLS).map(Self::from_zero_based) }
}

impl ops::Sub for Col {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


// Rows are ranks and cols are files. Row 0 is White's home row, col 0 is the a-file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    // The only entry point for unvalidated coordinates (e.g. raw UI input).
    pub fn from_indices(row: i8, col: i8) -> Option<Self> {
        Some(Self::new(Row::from_index(row)?, Col::from_index(col)?))
    }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.chars().collect_tuple()?;
        Some(Coord::new(Row::from_algebraic(row)?, Col::from_algebraic(col)?))
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    pub fn to_indices(self) -> (i8, i8) {
        (self.row.to_zero_based() as i8, self.col.to_zero_based() as i8)
    }

    // Returns `None` when the step leaves the board.
    pub fn offset(self, (d_row, d_col): (i8, i8)) -> Option<Self> {
        let (row, col) = self.to_indices();
        Self::from_indices(row + d_row, col + d_col)
    }

    // a1 is dark.
    pub fn is_dark(self) -> bool {
        self.row.to_zero_based() % 2 == self.col.to_zero_based() % 2
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
}

impl ops::Sub for Coord {
    type Output = (i8, i8);
    fn sub(self, other: Self) -> Self::Output { (self.row - other.row, self.col - other.col) }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// Helpers for notation regex captures.
pub fn row_from_capture(s: &str) -> Option<Row> { as_single_char(s).and_then(Row::from_algebraic) }

pub fn col_from_capture(s: &str) -> Option<Col> { as_single_char(s).and_then(Col::from_algebraic) }


impl Row {
    #![allow(dead_code)]
    pub const _1: Row = Row::from_zero_based(0);
    pub const _2: Row = Row::from_zero_based(1);
    pub const _3: Row = Row::from_zero_based(2);
    pub const _4: Row = Row::from_zero_based(3);
    pub const _5: Row = Row::from_zero_based(4);
    pub const _6: Row = Row::from_zero_based(5);
    pub const _7: Row = Row::from_zero_based(6);
    pub const _8: Row = Row::from_zero_based(7);
}

impl Col {
    #![allow(dead_code)]
    pub const A: Col = Col::from_zero_based(0);
    pub const B: Col = Col::from_zero_based(1);
    pub const C: Col = Col::from_zero_based(2);
    pub const D: Col = Col::from_zero_based(3);
    pub const E: Col = Col::from_zero_based(4);
    pub const F: Col = Col::from_zero_based(5);
    pub const G: Col = Col::from_zero_based(6);
    pub const H: Col = Col::from_zero_based(7);
}

macro_rules! file_coords {
    ($col:ident: $($name:ident = $row:ident),* $(,)?) => {
        $(pub const $name: Coord = Coord::new(Row::$row, Col::$col);)*
    };
}

impl Coord {
    #![allow(dead_code)]
    file_coords!(A: A1 = _1, A2 = _2, A3 = _3, A4 = _4, A5 = _5, A6 = _6, A7 = _7, A8 = _8);
    file_coords!(B: B1 = _1, B2 = _2, B3 = _3, B4 = _4, B5 = _5, B6 = _6, B7 = _7, B8 = _8);
    file_coords!(C: C1 = _1, C2 = _2, C3 = _3, C4 = _4, C5 = _5, C6 = _6, C7 = _7, C8 = _8);
    file_coords!(D: D1 = _1, D2 = _2, D3 = _3, D4 = _4, D5 = _5, D6 = _6, D7 = _7, D8 = _8);
    file_coords!(E: E1 = _1, E2 = _2, E3 = _3, E4 = _4, E5 = _5, E6 = _6, E7 = _7, E8 = _8);
    file_coords!(F: F1 = _1, F2 = _2, F3 = _3, F4 = _4, F5 = _5, F6 = _6, F7 = _7, F8 = _8);
    file_coords!(G: G1 = _1, G2 = _2, G3 = _3, G4 = _4, G5 = _5, G6 = _6, G7 = _7, G8 = _8);
    file_coords!(H: H1 = _1, H2 = _2, H3 = _3, H4 = _4, H5 = _5, H6 = _6, H7 = _7, H8 = _8);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic() {
        assert_eq!(Coord::from_algebraic("e4"), Some(Coord::E4));
        assert_eq!(Coord::from_algebraic("h8"), Some(Coord::H8));
        assert_eq!(Coord::from_algebraic("i1"), None);
        assert_eq!(Coord::from_algebraic("a9"), None);
        assert_eq!(Coord::from_algebraic("a10"), None);
        assert_eq!(Coord::C7.to_algebraic(), "c7");
    }

    #[test]
    fn indices_are_validated() {
        assert_eq!(Coord::from_indices(1, 4), Some(Coord::E2));
        assert_eq!(Coord::from_indices(8, 0), None);
        assert_eq!(Coord::from_indices(0, -1), None);
        assert_eq!(Coord::A1.offset((-1, 0)), None);
        assert_eq!(Coord::G1.offset((2, -1)), Some(Coord::F3));
    }

    #[test]
    fn square_color() {
        assert!(Coord::A1.is_dark());
        assert!(!Coord::H1.is_dark());
        assert!(Coord::H8.is_dark());
        assert!(!Coord::D1.is_dark());
    }

    #[test]
    fn subjective_rows() {
        assert_eq!(SubjectiveRow::first().to_row(Force::Black), Row::_8);
        assert_eq!(SubjectiveRow::last().to_row(Force::Black), Row::_1);
        assert_eq!(SubjectiveRow::from_one_based(2).to_row(Force::White), Row::_2);
    }
}
