use tracing::{debug, trace};

use crate::{
    color::Color,
    config::GameConfig,
    coord::Coord,
    error::MoveError,
    moves::Move,
    piece::PieceKind,
    position::Position,
    state::{EndReason, GameState, Repetitions, evaluate},
};

/// Result of [`Game::attempt_move`], shaped for a front-end: whether the
/// move went through, the state the game is now in and, when it has ended,
/// why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub state: GameState,
    pub is_game_over: bool,
    pub reason: Option<EndReason>,
    pub error: Option<MoveError>,
}

/// A game session. The position is only ever changed by playing legal moves
/// through it, or by [`Game::reset`].
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    side_to_move: Color,
    history: Vec<Move>,
    repetitions: Repetitions,
    half_move_clock: u32,
    state: GameState,
    config: GameConfig,
}
impl Game {
    pub fn new() -> Self {
        Game::with_config(GameConfig::default())
    }
    pub fn with_config(config: GameConfig) -> Self {
        Game::setup(Position::initial(), Color::White, config)
    }
    /// A session starting from an arbitrary setup.
    pub fn from_position(position: Position, side_to_move: Color) -> Self {
        Game::from_position_with_config(position, side_to_move, GameConfig::default())
    }
    pub fn from_position_with_config(
        position: Position,
        side_to_move: Color,
        config: GameConfig,
    ) -> Self {
        Game::setup(position, side_to_move, config)
    }
    fn setup(position: Position, side_to_move: Color, config: GameConfig) -> Self {
        let mut repetitions = Repetitions::default();
        repetitions.record(position.signature(side_to_move));
        let mut game = Game {
            position,
            side_to_move,
            history: Vec::new(),
            repetitions,
            half_move_clock: 0,
            state: GameState::Normal,
            config,
        };
        game.state = game.evaluate();
        game
    }
    pub fn position(&self) -> &Position {
        &self.position
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
    pub fn end_reason(&self) -> Option<EndReason> {
        self.state.end_reason(self.side_to_move)
    }
    pub fn history(&self) -> &[Move] {
        &self.history
    }
    pub fn last_move(&self) -> Option<Move> {
        self.position.last_move()
    }
    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }
    pub fn config(&self) -> GameConfig {
        self.config
    }
    /// Legal moves of the piece on `cell`, empty unless it belongs to the
    /// side to move of a game still in progress.
    pub fn legal_moves_from(&self, cell: Coord) -> Vec<Move> {
        match self.position[cell] {
            Some(index)
                if !self.is_game_over()
                    && self.position[index].is_some_and(|piece| piece.color == self.side_to_move) =>
            {
                self.position.legal_moves(index)
            }
            _ => Vec::new(),
        }
    }
    /// All legal moves of the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        self.position.all_legal_moves(self.side_to_move)
    }
    /// Plays `movement` if a legal move with the same origin and destination
    /// exists. Only the coordinates of `movement` are looked at.
    pub fn make_move(&mut self, movement: &Move) -> bool {
        self.try_move(movement.from, movement.to).is_ok()
    }
    pub fn attempt_move(&mut self, from: Coord, to: Coord) -> MoveOutcome {
        let result = self.try_move(from, to);
        MoveOutcome {
            accepted: result.is_ok(),
            state: self.state,
            is_game_over: self.is_game_over(),
            reason: self.end_reason(),
            error: result.err(),
        }
    }
    /// Same as [`Game::attempt_move`] for raw coordinates that may lie off
    /// the board.
    pub fn attempt_move_at(&mut self, from: (i8, i8), to: (i8, i8)) -> MoveOutcome {
        match (
            Coord::new_checked(from.0, from.1),
            Coord::new_checked(to.0, to.1),
        ) {
            (Some(from), Some(to)) => self.attempt_move(from, to),
            (from_cell, _) => {
                let (row, col) = if from_cell.is_none() { from } else { to };
                let error = MoveError::OutOfBoard { row, col };
                trace!(%error, "move rejected");
                MoveOutcome {
                    accepted: false,
                    state: self.state,
                    is_game_over: self.is_game_over(),
                    reason: self.end_reason(),
                    error: Some(error),
                }
            }
        }
    }
    pub fn try_move(&mut self, from: Coord, to: Coord) -> Result<GameState, MoveError> {
        let movement = self.validate(from, to).inspect_err(|error| {
            trace!(%error, "move rejected");
        })?;
        self.commit(movement)?;
        Ok(self.state)
    }
    /// Looks up the generated move matching `from` and `to`. The generated
    /// move, not anything supplied by the caller, decides what gets played.
    fn validate(&self, from: Coord, to: Coord) -> Result<Move, MoveError> {
        if let Some(reason) = self.end_reason() {
            return Err(MoveError::GameOver(reason));
        }
        let index = self.position[from].ok_or(MoveError::EmptySquare(from))?;
        let piece = self.position[index].ok_or(MoveError::EmptySquare(from))?;
        if piece.color != self.side_to_move {
            return Err(MoveError::WrongSide {
                cell: from,
                color: piece.color,
                side_to_move: self.side_to_move,
            });
        }
        let requested = Move::new(from, to, index, None);
        self.position
            .legal_moves(index)
            .into_iter()
            .find(|movement| *movement == requested)
            .ok_or(MoveError::IllegalMove { from, to })
    }
    fn commit(&mut self, movement: Move) -> Result<(), MoveError> {
        let is_pawn = self.position[movement.piece].is_some_and(|piece| piece.kind == PieceKind::Pawn);
        self.position
            .apply(&movement)
            .ok_or(MoveError::IllegalMove {
                from: movement.from,
                to: movement.to,
            })?;
        if movement.is_capture() || is_pawn {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock += 1;
        }
        self.position.set_last_move(Some(movement));
        self.history.push(movement);
        self.side_to_move = !self.side_to_move;
        self.repetitions
            .record(self.position.signature(self.side_to_move));
        self.state = self.evaluate();
        debug!(%movement, state = %self.state, half_move_clock = self.half_move_clock, "move played");
        if let Some(reason) = self.end_reason() {
            debug!(%reason, moves = self.history.len(), "game over");
        }
        Ok(())
    }
    fn evaluate(&self) -> GameState {
        evaluate(
            &self.position,
            self.side_to_move,
            self.half_move_clock,
            &self.repetitions,
            &self.config,
        )
    }
    /// Back to the starting position with every counter and all history
    /// cleared. The configuration is kept.
    pub fn reset(&mut self) {
        *self = Game::with_config(self.config);
        trace!("game reset");
    }
}
impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
