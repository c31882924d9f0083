use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::coord::Col;
use crate::force::Force;
use crate::util::as_single_char;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

// A-side is queen side, H-side is king side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum CastleDirection {
    ASide,
    HSide,
}

// `has_moved` matters only for pawns (double step) and for kings and rooks (castling).
// It is never set on other pieces.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new, Serialize, Deserialize)]
pub struct PieceOnBoard {
    pub kind: PieceKind,
    pub force: Force,
    pub has_moved: bool,
}

type Vectors = &'static [(i8, i8)];

const WHITE_PAWN_UNMOVED: Vectors = &[(1, 0), (2, 0), (1, -1), (1, 1)];
const WHITE_PAWN_MOVED: Vectors = &[(1, 0), (1, -1), (1, 1)];
const BLACK_PAWN_UNMOVED: Vectors = &[(-1, 0), (-2, 0), (-1, -1), (-1, 1)];
const BLACK_PAWN_MOVED: Vectors = &[(-1, 0), (-1, -1), (-1, 1)];
const KNIGHT: Vectors = &[(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const DIAGONAL: Vectors = &[(1, 1), (1, -1), (-1, -1), (-1, 1)];
const STRAIGHT: Vectors = &[(1, 0), (0, 1), (-1, 0), (0, -1)];
const ALL_DIRECTIONS: Vectors =
    &[(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];

// Deltas are (row, col). Pawn vectors depend on the force and lose the double step once the pawn
// has moved. Castling is not a vector: it is generated separately.
pub fn movement_vectors(kind: PieceKind, force: Force, has_moved: bool) -> Vectors {
    use PieceKind::*;
    match (kind, force, has_moved) {
        (Pawn, Force::White, false) => WHITE_PAWN_UNMOVED,
        (Pawn, Force::White, true) => WHITE_PAWN_MOVED,
        (Pawn, Force::Black, false) => BLACK_PAWN_UNMOVED,
        (Pawn, Force::Black, true) => BLACK_PAWN_MOVED,
        (Knight, _, _) => KNIGHT,
        (Bishop, _, _) => DIAGONAL,
        (Rook, _, _) => STRAIGHT,
        (Queen, _, _) | (King, _, _) => ALL_DIRECTIONS,
    }
}

impl PieceOnBoard {
    pub fn vectors(&self) -> Vectors { movement_vectors(self.kind, self.force, self.has_moved) }

    pub fn tracks_moves(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn | PieceKind::Rook | PieceKind::King)
    }
}

impl PieceKind {
    // Sliders walk a vector until they hit a piece or the board edge; other pieces make one step.
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    pub fn is_minor(self) -> bool { matches!(self, PieceKind::Knight | PieceKind::Bishop) }

    pub fn can_promote_to(self) -> bool {
        use PieceKind::*;
        match self {
            Pawn | King => false,
            Knight | Bishop | Rook | Queen => true,
        }
    }

    // Should not be used to construct moves in algebraic notation, because it returns a
    // non-empty name for a pawn (use `to_algebraic_for_move` instead).
    pub fn to_full_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn to_algebraic_for_move(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    pub fn from_algebraic_char(notation: char) -> Option<Self> {
        match notation {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        as_single_char(notation).and_then(Self::from_algebraic_char)
    }
}

impl CastleDirection {
    pub fn rook_col(self) -> Col {
        match self {
            CastleDirection::ASide => Col::A,
            CastleDirection::HSide => Col::H,
        }
    }

    // Column delta of a king step towards the rook.
    pub fn king_step(self) -> i8 {
        match self {
            CastleDirection::ASide => -1,
            CastleDirection::HSide => 1,
        }
    }

    pub fn from_king_step(d_col: i8) -> Option<Self> {
        match d_col {
            -2 => Some(CastleDirection::ASide),
            2 => Some(CastleDirection::HSide),
            _ => None,
        }
    }
}

pub fn piece_to_ascii(kind: PieceKind, force: Force) -> char {
    let ch = kind.to_full_algebraic();
    match force {
        Force::White => ch,
        Force::Black => ch.to_ascii_lowercase(),
    }
}

pub fn piece_from_ascii(ch: char) -> Option<(PieceKind, Force)> {
    let kind = PieceKind::from_algebraic_char(ch.to_ascii_uppercase())?;
    let force = if ch.is_ascii_uppercase() { Force::White } else { Force::Black };
    Some((kind, force))
}

pub fn piece_to_pictogram(piece_kind: PieceKind, force: Force) -> char {
    use self::Force::*;
    use self::PieceKind::*;
    match (force, piece_kind) {
        (White, Pawn) => '♙',
        (White, Knight) => '♘',
        (White, Bishop) => '♗',
        (White, Rook) => '♖',
        (White, Queen) => '♕',
        (White, King) => '♔',
        (Black, Pawn) => '♟',
        (Black, Knight) => '♞',
        (Black, Bishop) => '♝',
        (Black, Rook) => '♜',
        (Black, Queen) => '♛',
        (Black, King) => '♚',
    }
}
