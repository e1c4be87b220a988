use thiserror::Error;

use crate::{color::Color, coord::Coord, state::EndReason};

/// Why a move attempt was turned down. The game is left untouched in every
/// case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MoveError {
    #[error("there is no piece on {0}")]
    EmptySquare(Coord),
    #[error("the piece on {cell} is {color}, but {side_to_move} is to move")]
    WrongSide {
        cell: Coord,
        color: Color,
        side_to_move: Color,
    },
    #[error("{from}{to} is not a legal move")]
    IllegalMove { from: Coord, to: Coord },
    #[error("the game is over: {0}")]
    GameOver(EndReason),
    #[error("({row}, {col}) is off the board")]
    OutOfBoard { row: i8, col: i8 },
}
