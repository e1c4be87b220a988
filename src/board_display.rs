use std::fmt::{self, Display, Formatter};

use crate::{color::Color, coord::Coord, piece::Piece, position::Position};

const WHITE: &str = "\x1b[30;107m";
const BLACK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const LAST_MOVE: &str = "\x1b[30;102m";
const RESET: &str = "\x1b[0m";

/// Terminal rendering of a position, with lines of `info` printed to the
/// right of the board.
pub struct BoardDisplay<'a, 'b> {
    pub position: &'a Position,
    pub view: Color,
    pub highlighted: &'a [Coord],
    pub info: &'b str,
}
impl BoardDisplay<'_, '_> {
    fn background(&self, cell: Coord) -> &'static str {
        let last_move = self
            .position
            .last_move()
            .is_some_and(|movement| movement.from == cell || movement.to == cell);
        if self.highlighted.contains(&cell) {
            HIGHLIGHTED
        } else if last_move {
            LAST_MOVE
        } else {
            match cell.color() {
                Color::White => WHITE,
                Color::Black => BLACK,
            }
        }
    }
}
impl Display for BoardDisplay<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        for row in 0..8 {
            let row = match self.view {
                Color::White => row,
                Color::Black => 7 - row,
            };
            for col in 0..8 {
                let col = match self.view {
                    Color::White => col,
                    Color::Black => 7 - col,
                };
                let cell = Coord::new(row, col);
                let background = self.background(cell);
                let symbol = self.position.piece_at(cell).map_or(' ', Piece::symbol);
                write!(f, "{background}{symbol} {RESET}")?;
            }
            write!(f, "{}", 8 - row)?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        match self.view {
            Color::White => write!(f, "a b c d e f g h")?,
            Color::Black => write!(f, "h g f e d c b a")?,
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
