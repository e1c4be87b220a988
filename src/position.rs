use std::{
    fmt::{self, Display, Formatter},
    ops::Index,
};

use thiserror::Error;

use crate::{
    color::Color,
    coord::{Coord, home_row, pawn_start_row},
    moves::Move,
    piece::{Piece, PieceKind},
};

pub const MAX_PIECES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PositionError {
    #[error("{0} is already occupied")]
    Occupied(Coord),
    #[error("found more than 1 {0} king")]
    SecondKing(Color),
    #[error("found more than {MAX_PIECES} pieces")]
    TooManyPieces,
}

/// Slot of a piece in the position's arena. Stays valid for as long as the
/// piece is on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceIndex(u8);

impl PieceIndex {
    pub(crate) fn new(index: u8) -> Self {
        debug_assert!(usize::from(index) < MAX_PIECES);
        PieceIndex(index)
    }
}
impl From<PieceIndex> for usize {
    fn from(value: PieceIndex) -> Self {
        value.0.into()
    }
}

/// Board state: an arena of pieces and the 8×8 grid of cells pointing into
/// it. Every change of occupancy goes through `put` and `lift`, which keep
/// the grid and each piece's `cell` in agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pieces: [Option<Piece>; MAX_PIECES],
    cells: [Option<PieceIndex>; 64],
    last_move: Option<Move>,
}
impl Position {
    pub fn empty() -> Self {
        Position {
            pieces: [None; MAX_PIECES],
            cells: [None; 64],
            last_move: None,
        }
    }
    /// The standard starting setup.
    pub fn initial() -> Self {
        let mut position = Position::empty();
        for color in Color::ALL {
            for (col, kind) in (0..).zip(PieceKind::STARTING_CONFIGURATION) {
                for (row, kind) in [(home_row(color), kind), (pawn_start_row(color), PieceKind::Pawn)]
                {
                    let piece = Piece::new(kind, color, Coord::new(row, col));
                    if let Err(err) = position.add_piece(piece) {
                        unreachable!("starting setup is valid: {err}");
                    }
                }
            }
        }
        position
    }
    pub fn from_placement(
        placement: impl IntoIterator<Item = (Coord, Color, PieceKind)>,
    ) -> Result<Self, PositionError> {
        let mut position = Position::empty();
        for (cell, color, kind) in placement {
            position.add_piece(Piece::new(kind, color, cell))?;
        }
        Ok(position)
    }
    pub fn add_piece(&mut self, piece: Piece) -> Result<PieceIndex, PositionError> {
        if self[piece.cell].is_some() {
            return Err(PositionError::Occupied(piece.cell));
        }
        if piece.kind == PieceKind::King && self.king(piece.color).is_some() {
            return Err(PositionError::SecondKing(piece.color));
        }
        let slot = self
            .pieces
            .iter()
            .position(Option::is_none)
            .ok_or(PositionError::TooManyPieces)?;
        let index = PieceIndex::new(u8::try_from(slot).map_err(|_| PositionError::TooManyPieces)?);
        self.pieces[slot] = Some(piece);
        self.put(index, piece.cell);
        Ok(index)
    }
    pub fn piece(&self, index: PieceIndex) -> Option<Piece> {
        self[index]
    }
    pub fn piece_at(&self, cell: Coord) -> Option<Piece> {
        self[cell].and_then(|index| self[index])
    }
    /// Lookup by raw row and column; anything off the board is an empty
    /// answer rather than a failure.
    pub fn lookup(&self, row: i8, col: i8) -> Option<Piece> {
        Coord::new_checked(row, col).and_then(|cell| self.piece_at(cell))
    }
    pub fn all_pieces(&self) -> impl Iterator<Item = (PieceIndex, Piece)> + '_ {
        (0..)
            .zip(self.pieces.iter().copied())
            .filter_map(|(index, piece)| piece.map(|piece| (PieceIndex::new(index), piece)))
    }
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (PieceIndex, Piece)> + '_ {
        self.all_pieces()
            .filter(move |(_, piece)| piece.color == color)
    }
    pub fn non_kings(&self) -> impl Iterator<Item = Piece> + '_ {
        self.all_pieces()
            .map(|(_, piece)| piece)
            .filter(|piece| piece.kind != PieceKind::King)
    }
    pub fn king(&self, color: Color) -> Option<Piece> {
        self.pieces(color)
            .map(|(_, piece)| piece)
            .find(|piece| piece.kind == PieceKind::King)
    }
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }
    pub(crate) fn set_last_move(&mut self, movement: Option<Move>) {
        self.last_move = movement;
    }
    pub(crate) fn piece_mut(&mut self, index: PieceIndex) -> Option<&mut Piece> {
        self.pieces[usize::from(index)].as_mut()
    }
    /// Seats a piece already in the arena on an empty cell.
    pub(crate) fn put(&mut self, index: PieceIndex, cell: Coord) {
        debug_assert!(self[cell].is_none(), "{cell} is occupied");
        if let Some(piece) = self.piece_mut(index) {
            piece.cell = cell;
            self.cells[cell.index()] = Some(index);
        }
    }
    /// Empties a cell, leaving the piece in the arena.
    pub(crate) fn lift(&mut self, cell: Coord) -> Option<PieceIndex> {
        self.cells[cell.index()].take()
    }
    /// Takes a piece off the board and out of the arena.
    pub(crate) fn remove(&mut self, cell: Coord) -> Option<(PieceIndex, Piece)> {
        let index = self.lift(cell)?;
        let piece = self.pieces[usize::from(index)].take()?;
        Some((index, piece))
    }
    /// Puts a removed piece back into its slot and onto its cell.
    pub(crate) fn restore(&mut self, index: PieceIndex, piece: Piece) {
        self.pieces[usize::from(index)] = Some(piece);
        self.put(index, piece.cell);
    }
}
impl Default for Position {
    fn default() -> Self {
        Position::initial()
    }
}
impl Index<Coord> for Position {
    type Output = Option<PieceIndex>;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[index.index()]
    }
}
impl Index<PieceIndex> for Position {
    type Output = Option<Piece>;

    fn index(&self, index: PieceIndex) -> &Self::Output {
        &self.pieces[usize::from(index)]
    }
}
impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                let letter = self
                    .piece_at(Coord::new(row, col))
                    .map_or('.', Piece::letter);
                write!(f, "{letter}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
