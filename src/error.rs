use std::fmt;


// Engine bugs (e.g. a missing king) are not reported through `TurnError`: they panic with this
// message instead.
#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}

// Reasons to reject a turn. A rejected turn never changes the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnError {
    // Raw coordinates outside the board.
    OutOfBounds,
    InvalidNotation,
    AmbiguousNotation,
    PieceMissing,
    WrongTurnOrder,
    // Well-formed, but the destination is not among the legal destinations of the piece.
    IllegalMove,
    BadPromotion,
    GameOver,
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            TurnError::OutOfBounds => "coordinates are outside the board",
            TurnError::InvalidNotation => "cannot parse the move",
            TurnError::AmbiguousNotation => "the move is ambiguous",
            TurnError::PieceMissing => "there is no piece on the starting square",
            TurnError::WrongTurnOrder => "it is not this piece's turn",
            TurnError::IllegalMove => "the piece cannot move to the specified square",
            TurnError::BadPromotion => "invalid promotion",
            TurnError::GameOver => "the game is over",
        };
        write!(f, "{message}")
    }
}

impl std::error::Error for TurnError {}
