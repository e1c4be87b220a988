//! Legal move filtering on top of pseudo-legal generation, using moves that
//! are played on the position and taken back.

use crate::{
    color::Color,
    moves::{Move, Special},
    piece::{Piece, PieceKind},
    position::{PieceIndex, Position},
};

/// Everything [`Position::apply`] overwrote, so that [`Position::undo`] can
/// put it back.
#[derive(Debug, Clone)]
pub struct Undo {
    movement: Move,
    moving: Piece,
    captured: Option<(PieceIndex, Piece)>,
    rook: Option<(PieceIndex, Piece)>,
}

impl Position {
    /// Plays a move on the board: captured pieces leave the arena, the mover
    /// (and for castling the rook) is relocated and marked as moved, and a
    /// promoting pawn changes kind. Returns `None` without touching anything
    /// if the move does not fit the position.
    pub fn apply(&mut self, movement: &Move) -> Option<Undo> {
        let moving = self[movement.piece]?;
        if moving.cell != movement.from {
            return None;
        }
        let rook = match movement.special {
            Special::Castle { rook_from, .. } => {
                let index = self[rook_from]?;
                Some((index, self[index]?))
            }
            _ => None,
        };
        self.lift(movement.from);
        let captured = match movement.special {
            Special::EnPassant => self.remove(movement.en_passant_victim()),
            _ => self.remove(movement.to),
        };
        self.put(movement.piece, movement.to);
        if let Some(piece) = self.piece_mut(movement.piece) {
            piece.has_moved = true;
            if let Some(kind) = movement.promotion() {
                piece.kind = kind;
            }
        }
        if let (Some((index, _)), Special::Castle { rook_from, rook_to }) = (rook, movement.special)
        {
            self.lift(rook_from);
            self.put(index, rook_to);
            if let Some(rook) = self.piece_mut(index) {
                rook.has_moved = true;
            }
        }
        Some(Undo {
            movement: *movement,
            moving,
            captured,
            rook,
        })
    }
    /// Takes back a move played by [`Position::apply`].
    pub fn undo(&mut self, undo: Undo) {
        let Undo {
            movement,
            moving,
            captured,
            rook,
        } = undo;
        self.lift(movement.to);
        self.restore(movement.piece, moving);
        if let Some((index, rook)) = rook {
            if let Special::Castle { rook_to, .. } = movement.special {
                self.lift(rook_to);
            }
            self.restore(index, rook);
        }
        if let Some((index, piece)) = captured {
            self.restore(index, piece);
        }
    }
    fn leaves_in_check(&mut self, movement: &Move, color: Color) -> bool {
        let Some(undo) = self.apply(movement) else {
            return true;
        };
        let check = self.is_in_check(color);
        self.undo(undo);
        check
    }
    fn candidate_moves(&mut self, index: PieceIndex) -> Vec<Move> {
        match self[index] {
            Some(piece) if piece.kind == PieceKind::King => self.all_possible_moves(index),
            Some(_) => self.pseudo_legal_moves(index),
            None => Vec::new(),
        }
    }
    fn legal_moves_in_place(&mut self, index: PieceIndex) -> Vec<Move> {
        let Some(piece) = self[index] else {
            return Vec::new();
        };
        self.candidate_moves(index)
            .into_iter()
            .filter(|movement| !self.leaves_in_check(movement, piece.color))
            .collect()
    }
    /// Moves of the piece that do not leave its own king in check. The
    /// simulations run on a scratch copy.
    pub fn legal_moves(&self, index: PieceIndex) -> Vec<Move> {
        self.clone().legal_moves_in_place(index)
    }
    /// Legal moves of every piece of `color`.
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut scratch = self.clone();
        let indices: Vec<_> = self.pieces(color).map(|(index, _)| index).collect();
        indices
            .into_iter()
            .flat_map(|index| scratch.legal_moves_in_place(index))
            .collect()
    }
    /// Stops at the first legal move found.
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        let mut scratch = self.clone();
        self.pieces(color).any(|(index, _)| {
            scratch
                .candidate_moves(index)
                .iter()
                .any(|movement| !scratch.leaves_in_check(movement, color))
        })
    }
}
