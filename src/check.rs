use crate::{color::Color, coord::Coord, position::Position};

impl Position {
    /// Whether `color`'s king is attacked. A position without that king is
    /// never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        let Some(king) = self.king(color) else {
            return false;
        };
        self.is_targeted(king.cell, !color)
    }
    /// Whether some piece of `attacker` has a pseudo-legal move onto the
    /// occupied `cell`. Pawns only target occupied diagonals, so this answers
    /// for cells holding a piece of the other side.
    fn is_targeted(&self, cell: Coord, attacker: Color) -> bool {
        self.pieces(attacker).any(|(index, _)| {
            self.pseudo_legal_moves(index)
                .iter()
                .any(|movement| movement.to == cell)
        })
    }
}
