use serde::{Deserialize, Serialize};


// Fifty full moves, counted in plies.
pub const FIFTY_MOVE_RULE_PLIES: u32 = 100;
pub const REPETITION_DRAW_COUNT: u8 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PromotionPolicy {
    // A promotion submitted without a piece kind becomes a queen.
    DefaultToQueen,
    // A promotion must name the piece kind.
    RequireExplicit,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessRules {
    pub promotion: PromotionPolicy,
    pub fifty_move_rule: bool,
    pub threefold_repetition: bool,
}

impl ChessRules {
    pub fn classic() -> Self {
        Self {
            promotion: PromotionPolicy::DefaultToQueen,
            fifty_move_rule: true,
            threefold_repetition: true,
        }
    }
}

impl Default for ChessRules {
    fn default() -> Self { Self::classic() }
}
