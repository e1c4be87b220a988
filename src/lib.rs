//! Chess rules engine: legal move generation, check detection, move
//! execution and the automatic end-of-game rules.
//!
//! [`Game`] is the entry point for playing; [`Position`] exposes the board
//! and the move generator underneath it.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate, clippy::missing_panics_doc)]

pub mod board_display;
mod check;
pub mod color;
pub mod config;
pub mod coord;
pub mod error;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod position;
pub mod state;

pub use crate::{
    color::Color,
    config::GameConfig,
    coord::{Coord, Vector},
    error::MoveError,
    game::{Game, MoveOutcome},
    legal::Undo,
    moves::{Move, MoveRequest, Special},
    piece::{Piece, PieceKind},
    position::{PieceIndex, Position, PositionError},
    state::{EndReason, EndState, GameState},
};

/// A [`Coord`] from a square name, checked at compile time.
#[macro_export]
macro_rules! coord {
    ($name:literal) => {
        const { $crate::coord::Coord::from_name($name) }
    };
}
