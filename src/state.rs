use std::fmt::{self, Display, Formatter};

use rustc_hash::FxHashMap;

use crate::{
    color::Color,
    config::GameConfig,
    coord::Coord,
    piece::{Piece, PieceKind},
    position::Position,
};

/// Where the game stands for the side to move. Recomputed after every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Normal,
    Check,
    Checkmate,
    Stalemate,
    DrawFiftyMove,
    DrawRepetition,
    DrawInsufficientMaterial,
}
impl GameState {
    pub fn is_game_over(self) -> bool {
        !matches!(self, GameState::Normal | GameState::Check)
    }
    pub fn is_check(self) -> bool {
        matches!(self, GameState::Check | GameState::Checkmate)
    }
    /// `side_to_move` is the side that would be moving now, i.e. the mated
    /// side for a checkmate.
    pub fn end_reason(self, side_to_move: Color) -> Option<EndReason> {
        let reason = match self {
            GameState::Normal | GameState::Check => return None,
            GameState::Checkmate => EndReason::Checkmate {
                winner: !side_to_move,
            },
            GameState::Stalemate => EndReason::Stalemate,
            GameState::DrawFiftyMove => EndReason::FiftyMoveRule,
            GameState::DrawRepetition => EndReason::ThreefoldRepetition,
            GameState::DrawInsufficientMaterial => EndReason::InsufficientMaterial,
        };
        Some(reason)
    }
}
impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Normal => write!(f, "normal")?,
            GameState::Check => write!(f, "check")?,
            GameState::Checkmate => write!(f, "checkmate")?,
            GameState::Stalemate => write!(f, "stalemate")?,
            GameState::DrawFiftyMove => write!(f, "draw by the fifty-move rule")?,
            GameState::DrawRepetition => write!(f, "draw by threefold repetition")?,
            GameState::DrawInsufficientMaterial => write!(f, "draw by insufficient material")?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}
impl EndReason {
    pub fn end_state(self) -> EndState {
        match self {
            EndReason::Checkmate { winner } => EndState::Win(winner),
            _ => EndState::Draw,
        }
    }
}
impl Display for EndReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Checkmate { winner } => write!(f, "{winner} wins by checkmate")?,
            EndReason::Stalemate => write!(f, "draw by stalemate")?,
            EndReason::FiftyMoveRule => write!(f, "draw by the fifty-move rule")?,
            EndReason::ThreefoldRepetition => write!(f, "draw by threefold repetition")?,
            EndReason::InsufficientMaterial => write!(f, "draw by insufficient material")?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndState {
    Win(Color),
    Draw,
}
impl Display for EndState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Win(color) => write!(f, "{color} wins")?,
            EndState::Draw => write!(f, "draw")?,
        }
        Ok(())
    }
}

/// Piece placement plus the side to move; the unit of repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    board: [Option<(Color, PieceKind)>; 64],
    side_to_move: Color,
}

#[derive(Debug, Clone, Default)]
pub struct Repetitions(FxHashMap<Signature, u8>);

impl Repetitions {
    pub fn record(&mut self, signature: Signature) {
        let count = self.0.entry(signature).or_default();
        *count = count.saturating_add(1);
    }
    pub fn count(&self, signature: &Signature) -> u8 {
        self.0.get(signature).copied().unwrap_or_default()
    }
    pub fn max_count(&self) -> u8 {
        self.0.values().copied().max().unwrap_or_default()
    }
}

impl Position {
    pub fn signature(&self, side_to_move: Color) -> Signature {
        let mut board = [None; 64];
        for cell in Coord::all() {
            board[cell.index()] = self.piece_at(cell).map(|piece| (piece.color, piece.kind));
        }
        Signature {
            board,
            side_to_move,
        }
    }
    /// Neither side can ever mate: bare kings, a single minor piece, or
    /// nothing but bishops that all stand on squares of one color.
    pub fn has_insufficient_material(&self) -> bool {
        let non_kings: Vec<Piece> = self.non_kings().collect();
        match non_kings.as_slice() {
            [] => true,
            [piece] => matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop),
            [first, rest @ ..] => {
                first.kind == PieceKind::Bishop
                    && rest.iter().all(|piece| {
                        piece.kind == PieceKind::Bishop && piece.cell.color() == first.cell.color()
                    })
            }
        }
    }
}

/// Draw rules first, in the order fifty-move, repetition, material; then
/// check and mobility of `side_to_move`.
pub fn evaluate(
    position: &Position,
    side_to_move: Color,
    half_move_clock: u32,
    repetitions: &Repetitions,
    config: &GameConfig,
) -> GameState {
    if half_move_clock >= config.fifty_move_limit {
        return GameState::DrawFiftyMove;
    }
    if repetitions.max_count() >= config.repetition_limit {
        return GameState::DrawRepetition;
    }
    if position.has_insufficient_material() {
        return GameState::DrawInsufficientMaterial;
    }
    let check = position.is_in_check(side_to_move);
    let can_move = position.has_any_legal_move(side_to_move);
    match (check, can_move) {
        (false, false) => GameState::Stalemate,
        (true, false) => GameState::Checkmate,
        (true, true) => GameState::Check,
        (false, true) => GameState::Normal,
    }
}
#[cfg(test)]
mod test {
    use crate::{
        color::Color,
        config::GameConfig,
        coord,
        piece::PieceKind,
        position::Position,
        state::{EndReason, EndState, GameState, Repetitions, evaluate},
    };

    fn kings_and(extra: &[(crate::coord::Coord, Color, PieceKind)]) -> Position {
        Position::from_placement(
            [
                (coord!("e1"), Color::White, PieceKind::King),
                (coord!("e8"), Color::Black, PieceKind::King),
            ]
            .into_iter()
            .chain(extra.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn insufficient_material() {
        assert!(kings_and(&[]).has_insufficient_material());
        assert!(kings_and(&[(coord!("c3"), Color::White, PieceKind::Knight)]).has_insufficient_material());
        assert!(kings_and(&[(coord!("c3"), Color::Black, PieceKind::Bishop)]).has_insufficient_material());
        // c1 and f8 are both dark
        assert!(
            kings_and(&[
                (coord!("c1"), Color::White, PieceKind::Bishop),
                (coord!("f8"), Color::Black, PieceKind::Bishop),
            ])
            .has_insufficient_material()
        );
        assert!(
            !kings_and(&[
                (coord!("c1"), Color::White, PieceKind::Bishop),
                (coord!("c8"), Color::Black, PieceKind::Bishop),
            ])
            .has_insufficient_material()
        );
        assert!(
            !kings_and(&[
                (coord!("c3"), Color::White, PieceKind::Knight),
                (coord!("c6"), Color::Black, PieceKind::Knight),
            ])
            .has_insufficient_material()
        );
        assert!(!kings_and(&[(coord!("a2"), Color::White, PieceKind::Pawn)]).has_insufficient_material());
        assert!(!kings_and(&[(coord!("a2"), Color::Black, PieceKind::Rook)]).has_insufficient_material());
        assert!(!Position::initial().has_insufficient_material());
    }
    #[test]
    fn draws_take_precedence_over_mate() {
        // back rank mate, but the clock already ran out
        let position = kings_and(&[
            (coord!("a8"), Color::White, PieceKind::Rook),
            (coord!("d7"), Color::Black, PieceKind::Pawn),
            (coord!("e7"), Color::Black, PieceKind::Pawn),
            (coord!("f7"), Color::Black, PieceKind::Pawn),
        ]);
        let config = GameConfig::default();
        let repetitions = Repetitions::default();
        assert_eq!(
            evaluate(&position, Color::Black, 0, &repetitions, &config),
            GameState::Checkmate
        );
        assert_eq!(
            evaluate(&position, Color::Black, 100, &repetitions, &config),
            GameState::DrawFiftyMove
        );
        let mut repetitions = Repetitions::default();
        for _ in 0..3 {
            repetitions.record(position.signature(Color::Black));
        }
        assert_eq!(repetitions.count(&position.signature(Color::Black)), 3);
        assert_eq!(repetitions.count(&position.signature(Color::White)), 0);
        assert_eq!(
            evaluate(&position, Color::Black, 0, &repetitions, &config),
            GameState::DrawRepetition
        );
    }
    #[test]
    fn signature_includes_side_to_move() {
        let position = Position::initial();
        assert_ne!(position.signature(Color::White), position.signature(Color::Black));
        assert_eq!(position.signature(Color::White), Position::initial().signature(Color::White));
    }
    #[test]
    fn end_reasons() {
        assert_eq!(GameState::Check.end_reason(Color::White), None);
        assert_eq!(
            GameState::Checkmate.end_reason(Color::Black),
            Some(EndReason::Checkmate {
                winner: Color::White
            })
        );
        assert_eq!(
            EndReason::Checkmate {
                winner: Color::White
            }
            .to_string(),
            "white wins by checkmate"
        );
        assert_eq!(EndReason::Stalemate.end_state(), EndState::Draw);
        assert!(GameState::DrawRepetition.is_game_over());
        assert!(!GameState::Check.is_game_over());
    }
}
