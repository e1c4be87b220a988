use std::{
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    coord::{Coord, ParseCoordError},
    piece::{InvalidPieceLetter, PieceKind},
    position::PieceIndex,
};

/// What a move does beyond relocating the moving piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    None,
    DoublePush,
    /// The captured pawn sits on the origin row, destination column.
    EnPassant,
    Promotion(PieceKind),
    Castle {
        rook_from: Coord,
        rook_to: Coord,
    },
}

/// A generated move. Equality and hashing only look at the origin and
/// destination: a move handed in from outside is matched against the
/// generated ones by coordinates and the generated one is what gets played.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
    pub piece: PieceIndex,
    pub captured: Option<PieceIndex>,
    pub special: Special,
}
impl Move {
    pub fn new(from: Coord, to: Coord, piece: PieceIndex, captured: Option<PieceIndex>) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            special: Special::None,
        }
    }
    pub fn with_special(self, special: Special) -> Self {
        Move { special, ..self }
    }
    pub fn is_capture(self) -> bool {
        self.captured.is_some()
    }
    pub fn is_double_push(self) -> bool {
        self.special == Special::DoublePush
    }
    pub fn is_en_passant(self) -> bool {
        self.special == Special::EnPassant
    }
    pub fn is_castle(self) -> bool {
        matches!(self.special, Special::Castle { .. })
    }
    pub fn promotion(self) -> Option<PieceKind> {
        match self.special {
            Special::Promotion(kind) => Some(kind),
            _ => None,
        }
    }
    /// Cell of the pawn removed by an en passant capture.
    pub fn en_passant_victim(self) -> Coord {
        Coord::new(self.from.row(), self.to.col())
    }
}
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}
impl Eq for Move {}
impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}
impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{}", promotion.lowercase())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseMoveError {
    #[error("provided string contains invalid character")]
    InvalidChar,
    #[error(transparent)]
    ParseCoordError(#[from] ParseCoordError),
    #[error(transparent)]
    InvalidPieceLetter(#[from] InvalidPieceLetter),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

/// A move as typed by a player, in long algebraic notation such as `e2e4`
/// or `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    pub from: Coord,
    pub to: Coord,
    pub promotion: Option<PieceKind>,
}
impl Display for MoveRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.lowercase())?;
        }
        Ok(())
    }
}
impl FromStr for MoveRequest {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let from = s.get(0..2).ok_or(ParseMoveError::InvalidChar)?.parse()?;
        let to = s.get(2..4).ok_or(ParseMoveError::InvalidChar)?.parse()?;
        let mut rest = s.get(4..).ok_or(ParseMoveError::InvalidChar)?.chars();
        let promotion = rest.next().map(PieceKind::from_letter).transpose()?;

        if let Some(c) = rest.next() {
            return Err(ParseMoveError::Unexpected(c));
        }
        Ok(MoveRequest {
            from,
            to,
            promotion,
        })
    }
}
#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use crate::{
        coord,
        coord::ParseCoordError,
        moves::{Move, MoveRequest, ParseMoveError, Special},
        piece::PieceKind,
        position::PieceIndex,
    };

    #[test]
    fn equality_ignores_flags() {
        let plain = Move::new(coord!("e7"), coord!("e8"), PieceIndex::new(3), None);
        let forged = plain.with_special(Special::Castle {
            rook_from: coord!("h8"),
            rook_to: coord!("f8"),
        });
        assert_eq!(plain, forged);
        let set: HashSet<_> = [plain, forged].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
    #[test]
    fn promotion_suffix() {
        let promotion = Move::new(coord!("b7"), coord!("a8"), PieceIndex::new(9), None)
            .with_special(Special::Promotion(PieceKind::Queen));
        assert_eq!(promotion.to_string(), "b7a8q");
        assert_eq!(promotion.en_passant_victim(), coord!("a7"));
    }
    #[test]
    fn parse_request() {
        assert_eq!(
            "e7e8q".parse(),
            Ok(MoveRequest {
                from: coord!("e7"),
                to: coord!("e8"),
                promotion: Some(PieceKind::Queen),
            })
        );
        assert_eq!(
            "e2".parse::<MoveRequest>(),
            Err(ParseMoveError::InvalidChar)
        );
        assert_eq!(
            "e2z4".parse::<MoveRequest>(),
            Err(ParseMoveError::ParseCoordError(ParseCoordError::InvalidFile('z')))
        );
        assert_eq!(
            "e2e4qq".parse::<MoveRequest>(),
            Err(ParseMoveError::Unexpected('q'))
        );
    }
}
