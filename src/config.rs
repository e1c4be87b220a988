/// Thresholds of the automatic draw rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameConfig {
    /// Half-moves without a capture or pawn move that end the game.
    pub fifty_move_limit: u32,
    /// Occurrences of one position that end the game.
    pub repetition_limit: u8,
}
impl GameConfig {
    pub fn with_fifty_move_limit(self, fifty_move_limit: u32) -> Self {
        GameConfig {
            fifty_move_limit,
            ..self
        }
    }
    pub fn with_repetition_limit(self, repetition_limit: u8) -> Self {
        GameConfig {
            repetition_limit,
            ..self
        }
    }
}
impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            fifty_move_limit: 100,
            repetition_limit: 3,
        }
    }
}
