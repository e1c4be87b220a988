use std::{
    fmt::{self, Display, Formatter},
    ops::{Mul, Sub},
    str::FromStr,
};

use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseCoordError {
    #[error("found `{0}`, characters from `a` to `h` were expected instead")]
    InvalidFile(char),
    #[error("found `{0}`, characters from `1` to `8` were expected instead")]
    InvalidRank(char),
    #[error("provided string have length of {0} characters, 2 were expected")]
    NotEnoughCharacter(u8),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

/// A cell of the board. Row 0 is rank 8 and row 7 is rank 1; column 0 is the
/// a-file. A `Coord` is always on the board, so every lookup keyed by one is
/// in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8);
        debug_assert!(col < 8);
        Coord { row, col }
    }
    pub fn new_checked(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Coord::new(row.unsigned_abs(), col.unsigned_abs()))
        } else {
            None
        }
    }
    /// Const counterpart of [`FromStr`] backing the `coord!` macro. Panics on
    /// anything that is not a square name.
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        assert!(bytes.len() == 2, "square names are two characters long");
        let col = match bytes[0] {
            file @ b'a'..=b'h' => file - b'a',
            _ => panic!("file must be within `a` to `h`"),
        };
        let row = match bytes[1] {
            rank @ b'1'..=b'8' => 7 - (rank - b'1'),
            _ => panic!("rank must be within `1` to `8`"),
        };
        Coord { row, col }
    }
    pub fn from_chars(file: char, rank: char) -> Result<Self, ParseCoordError> {
        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => return Err(ParseCoordError::InvalidFile(file)),
        };
        let row = match rank {
            '1'..='8' => 7 - (rank as u8 - b'1'),
            _ => return Err(ParseCoordError::InvalidRank(rank)),
        };
        Ok(Coord::new(row, col))
    }
    pub fn row(self) -> u8 {
        self.row
    }
    pub fn col(self) -> u8 {
        self.col
    }
    pub fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).flat_map(|row| (0..8).map(move |col| Coord::new(row, col)))
    }
    pub fn move_by(self, movement: Vector) -> Option<Self> {
        Self::new_checked(
            i8::try_from(self.row).ok()? + movement.row,
            i8::try_from(self.col).ok()? + movement.col,
        )
    }
    /// Cells walked from `self` along `direction`, excluding `self`, up to
    /// the board edge.
    pub fn line_exclusive(self, direction: Vector) -> impl Iterator<Item = Self> {
        debug_assert_ne!(direction, Vector::ZERO);
        (1..).map_while(move |distance| self.move_by(direction * distance))
    }
    /// Color of the square itself, used by the same-colored bishops rule.
    pub fn color(self) -> Color {
        if (self.row + self.col) % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}
pub fn home_row(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}
pub fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::White => 6,
        Color::Black => 1,
    }
}
pub fn promotion_row(color: Color) -> u8 {
    home_row(!color)
}
pub fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}
impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let file = (self.col + b'a') as char;
        let rank = 8 - self.row;
        write!(f, "{file}{rank}")?;
        Ok(())
    }
}
impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(file) = chars.next() else {
            return Err(ParseCoordError::NotEnoughCharacter(0));
        };
        let Some(rank) = chars.next() else {
            return Err(ParseCoordError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(ParseCoordError::Unexpected(c));
        }
        Coord::from_chars(file, rank)
    }
}
impl Sub<Self> for Coord {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        // both sides are below 8, the casts are lossless
        Vector {
            row: self.row as i8 - rhs.row as i8,
            col: self.col as i8 - rhs.col as i8,
        }
    }
}

/// Offset between two cells, in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub row: i8,
    pub col: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { row: 0, col: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { row: -2, col: -1 },
        Vector { row: -2, col: 1 },
        Vector { row: 2, col: -1 },
        Vector { row: 2, col: 1 },
        Vector { row: -1, col: -2 },
        Vector { row: -1, col: 2 },
        Vector { row: 1, col: -2 },
        Vector { row: 1, col: 2 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Vector { row: -1, col: -1 },
        Vector { row: -1, col: 0 },
        Vector { row: -1, col: 1 },
        Vector { row: 0, col: -1 },
        Vector { row: 0, col: 1 },
        Vector { row: 1, col: -1 },
        Vector { row: 1, col: 0 },
        Vector { row: 1, col: 1 },
    ];
    pub const ROOK_DIRECTIONS: [Self; 4] = [
        Vector { row: -1, col: 0 },
        Vector { row: 1, col: 0 },
        Vector { row: 0, col: -1 },
        Vector { row: 0, col: 1 },
    ];
    pub const BISHOP_DIRECTIONS: [Self; 4] = [
        Vector { row: -1, col: -1 },
        Vector { row: -1, col: 1 },
        Vector { row: 1, col: -1 },
        Vector { row: 1, col: 1 },
    ];
    pub const QUEEN_DIRECTIONS: [Self; 8] = Vector::KING_MOVES;

    pub fn pawn_single_move(color: Color) -> Self {
        Vector {
            row: pawn_direction(color),
            col: 0,
        }
    }
    pub fn pawn_double_move(color: Color) -> Self {
        Vector::pawn_single_move(color) * 2
    }
    pub fn pawn_attacks(color: Color) -> [Self; 2] {
        [-1, 1].map(|col| Vector {
            row: pawn_direction(color),
            col,
        })
    }
}
impl Mul<i8> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i8) -> Self::Output {
        Vector {
            row: self.row * rhs,
            col: self.col * rhs,
        }
    }
}
