//! Pseudo-legal move generation: board edges and friendly blocking are
//! respected, leaving the own king in check is not.

use crate::{
    coord::{Coord, Vector, home_row, pawn_start_row, promotion_row},
    moves::{Move, Special},
    piece::{Piece, PieceKind},
    position::{PieceIndex, Position},
};

impl Position {
    fn step_moves<'a>(
        &'a self,
        index: PieceIndex,
        piece: Piece,
        offsets: &'a [Vector],
    ) -> impl Iterator<Item = Move> + 'a {
        offsets
            .iter()
            .copied()
            .filter_map(move |offset| piece.cell.move_by(offset))
            .filter_map(move |destination| {
                if let Some(capture) = self[destination] {
                    self.is_enemy(capture, piece)
                        .then(|| Move::new(piece.cell, destination, index, Some(capture)))
                } else {
                    Some(Move::new(piece.cell, destination, index, None))
                }
            })
    }
    fn directional_moves(
        &self,
        index: PieceIndex,
        piece: Piece,
        direction: Vector,
    ) -> impl Iterator<Item = Move> + '_ {
        let mut resume = true;
        piece
            .cell
            .line_exclusive(direction)
            .map_while(move |destination| {
                if !resume {
                    return None;
                }
                if let Some(capture) = self[destination] {
                    resume = false;
                    self.is_enemy(capture, piece)
                        .then(|| Move::new(piece.cell, destination, index, Some(capture)))
                } else {
                    Some(Move::new(piece.cell, destination, index, None))
                }
            })
    }
    fn all_directional_moves<'a>(
        &'a self,
        index: PieceIndex,
        piece: Piece,
        directions: &'a [Vector],
    ) -> impl Iterator<Item = Move> + 'a {
        directions
            .iter()
            .copied()
            .flat_map(move |direction| self.directional_moves(index, piece, direction))
    }
    fn pawn_moves(&self, index: PieceIndex, pawn: Piece) -> impl Iterator<Item = Move> + '_ {
        let color = pawn.color;
        let forward_jumps = if pawn.cell.row() == pawn_start_row(color) {
            2
        } else {
            1
        };
        let pushes = pawn
            .cell
            .line_exclusive(Vector::pawn_single_move(color))
            .take(forward_jumps)
            .take_while(move |cell| self[*cell].is_none())
            .map(move |destination| {
                let movement = Move::new(pawn.cell, destination, index, None);
                if destination - pawn.cell == Vector::pawn_double_move(color) {
                    movement.with_special(Special::DoublePush)
                } else {
                    movement
                }
            });
        let captures = Vector::pawn_attacks(color)
            .into_iter()
            .filter_map(move |offset| pawn.cell.move_by(offset))
            .filter_map(move |destination| {
                let capture = self[destination]?;
                self.is_enemy(capture, pawn)
                    .then(|| Move::new(pawn.cell, destination, index, Some(capture)))
            });
        pushes
            .chain(captures)
            .chain(self.en_passant(index, pawn))
            .map(move |movement| {
                if movement.to.row() == promotion_row(color) {
                    movement.with_special(Special::Promotion(PieceKind::PROMOTION))
                } else {
                    movement
                }
            })
    }
    /// Capture of an enemy pawn that double pushed on the previous move and
    /// now stands beside `pawn`.
    fn en_passant(&self, index: PieceIndex, pawn: Piece) -> Option<Move> {
        let last_move = self.last_move()?;
        if !last_move.is_double_push()
            || last_move.to.row() != pawn.cell.row()
            || last_move.to.col().abs_diff(pawn.cell.col()) != 1
        {
            return None;
        }
        let victim_index = self[last_move.to]?;
        let victim = self[victim_index]?;
        if victim.kind != PieceKind::Pawn || victim.color == pawn.color {
            return None;
        }
        let destination = last_move.to.move_by(Vector::pawn_single_move(pawn.color))?;
        if self[destination].is_some() {
            return None;
        }
        Some(
            Move::new(pawn.cell, destination, index, Some(victim_index))
                .with_special(Special::EnPassant),
        )
    }
    fn is_enemy(&self, index: PieceIndex, piece: Piece) -> bool {
        self[index].is_some_and(|other| other.color != piece.color)
    }
    /// Moves of the piece ignoring self-check. Never includes castling, so
    /// attack detection built on it cannot recurse into castling rules.
    pub fn pseudo_legal_moves(&self, index: PieceIndex) -> Vec<Move> {
        let Some(piece) = self[index] else {
            return Vec::new();
        };
        let moves: Box<dyn Iterator<Item = Move>> = match piece.kind {
            PieceKind::Pawn => Box::new(self.pawn_moves(index, piece)),
            PieceKind::Knight => Box::new(self.step_moves(index, piece, &Vector::KNIGHT_MOVES)),
            PieceKind::Bishop => Box::new(self.all_directional_moves(
                index,
                piece,
                &Vector::BISHOP_DIRECTIONS,
            )),
            PieceKind::Rook => Box::new(self.all_directional_moves(
                index,
                piece,
                &Vector::ROOK_DIRECTIONS,
            )),
            PieceKind::Queen => Box::new(self.all_directional_moves(
                index,
                piece,
                &Vector::QUEEN_DIRECTIONS,
            )),
            PieceKind::King => Box::new(self.step_moves(index, piece, &Vector::KING_MOVES)),
        };
        moves.collect()
    }
    /// Pseudo-legal moves plus castling for kings. Castling is checked by
    /// stepping the king over its path, so this needs the position mutably;
    /// it is left as it was found.
    pub fn all_possible_moves(&mut self, index: PieceIndex) -> Vec<Move> {
        let mut moves = self.pseudo_legal_moves(index);
        if let Some(king) = self[index]
            && king.kind == PieceKind::King
        {
            moves.extend(self.castling_moves(index, king));
        }
        moves
    }
    fn castling_moves(&mut self, index: PieceIndex, king: Piece) -> Vec<Move> {
        if king.has_moved
            || king.cell.row() != home_row(king.color)
            || self.is_in_check(king.color)
        {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for (rook_col, step) in [(7, 1), (0, -1)] {
            let rook_from = Coord::new(king.cell.row(), rook_col);
            let Some(rook) = self.piece_at(rook_from) else {
                continue;
            };
            if rook.kind != PieceKind::Rook
                || rook.color != king.color
                || rook.has_moved
                || rook_col.abs_diff(king.cell.col()) < 3
            {
                continue;
            }
            let direction = Vector { row: 0, col: step };
            if king
                .cell
                .line_exclusive(direction)
                .take_while(|cell| *cell != rook_from)
                .any(|cell| self[cell].is_some())
            {
                continue;
            }
            let (Some(rook_to), Some(king_to)) = (
                king.cell.move_by(direction),
                king.cell.move_by(direction * 2),
            ) else {
                continue;
            };
            if [rook_to, king_to]
                .into_iter()
                .any(|cell| self.is_attacked_on_step(index, king, cell))
            {
                continue;
            }
            moves.push(
                Move::new(king.cell, king_to, index, None)
                    .with_special(Special::Castle { rook_from, rook_to }),
            );
        }
        moves
    }
    /// Whether the king would stand in check on `cell`, found by placing it
    /// there and taking it back.
    fn is_attacked_on_step(&mut self, index: PieceIndex, king: Piece, cell: Coord) -> bool {
        let Some(undo) = self.apply(&Move::new(king.cell, cell, index, None)) else {
            return true;
        };
        let check = self.is_in_check(king.color);
        self.undo(undo);
        check
    }
}
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{
        color::Color,
        coord,
        coord::Coord,
        moves::{Move, Special},
        piece::PieceKind,
        position::Position,
    };

    fn destinations(moves: &[Move]) -> Vec<Coord> {
        let mut destinations: Vec<_> = moves.iter().map(|movement| movement.to).collect();
        destinations.sort();
        destinations
    }
    fn moves_of(position: &Position, cell: Coord) -> Vec<Move> {
        position.pseudo_legal_moves(position[cell].unwrap())
    }

    #[test]
    fn starting_pawn_and_knight() {
        let position = Position::initial();
        let pawn = moves_of(&position, coord!("e2"));
        assert_eq!(destinations(&pawn), [coord!("e4"), coord!("e3")]);
        assert!(pawn.iter().any(|movement| movement.to == coord!("e4") && movement.is_double_push()));
        assert!(pawn.iter().any(|movement| movement.to == coord!("e3") && !movement.is_double_push()));
        let knight = moves_of(&position, coord!("g1"));
        assert_eq!(destinations(&knight), [coord!("f3"), coord!("h3")]);
        assert!(moves_of(&position, coord!("a1")).is_empty());
        assert!(moves_of(&position, coord!("d1")).is_empty());
    }
    #[test]
    fn blocked_double_push() {
        let position = Position::from_placement([
            (coord!("e2"), Color::White, PieceKind::Pawn),
            (coord!("e4"), Color::Black, PieceKind::Knight),
            (coord!("d2"), Color::White, PieceKind::Pawn),
            (coord!("d3"), Color::Black, PieceKind::Knight),
        ])
        .unwrap();
        assert_eq!(
            destinations(&moves_of(&position, coord!("e2"))),
            [coord!("d3"), coord!("e3")]
        );
        // blocked straight ahead, nothing on the diagonals
        assert!(moves_of(&position, coord!("d2")).is_empty());
    }
    #[test]
    fn sliders_stop_at_pieces() {
        let position = Position::from_placement([
            (coord!("d4"), Color::White, PieceKind::Rook),
            (coord!("d6"), Color::Black, PieceKind::Pawn),
            (coord!("f4"), Color::White, PieceKind::Pawn),
            (coord!("d2"), Color::White, PieceKind::King),
        ])
        .unwrap();
        let rook = moves_of(&position, coord!("d4"));
        assert_eq!(
            destinations(&rook),
            [
                coord!("d6"),
                coord!("d5"),
                coord!("a4"),
                coord!("b4"),
                coord!("c4"),
                coord!("e4"),
                coord!("d3"),
            ]
        );
        assert_eq!(rook.iter().filter(|movement| movement.is_capture()).count(), 1);
    }
    #[test]
    fn bishop_and_queen_from_corner() {
        let position = Position::from_placement([
            (coord!("a1"), Color::White, PieceKind::Bishop),
            (coord!("h8"), Color::White, PieceKind::Queen),
            (coord!("e5"), Color::Black, PieceKind::Pawn),
        ])
        .unwrap();
        assert_eq!(
            destinations(&moves_of(&position, coord!("a1"))),
            [coord!("e5"), coord!("d4"), coord!("c3"), coord!("b2")]
        );
        // 7 along the rank, 7 along the file, 3 down the diagonal up to the pawn
        assert_eq!(moves_of(&position, coord!("h8")).len(), 17);
    }
    #[test]
    fn knight_on_edge_and_friendly_blocking() {
        let position = Position::from_placement([
            (coord!("a1"), Color::White, PieceKind::Knight),
            (coord!("b3"), Color::White, PieceKind::Pawn),
            (coord!("c2"), Color::Black, PieceKind::Pawn),
        ])
        .unwrap();
        let knight = moves_of(&position, coord!("a1"));
        assert_eq!(destinations(&knight), [coord!("c2")]);
        assert!(knight[0].is_capture());
    }
    #[test]
    fn promotion_is_always_queen() {
        let position = Position::from_placement([
            (coord!("b7"), Color::White, PieceKind::Pawn),
            (coord!("a8"), Color::Black, PieceKind::Rook),
            (coord!("b2"), Color::Black, PieceKind::Pawn),
        ])
        .unwrap();
        let moves = moves_of(&position, coord!("b7"));
        assert_eq!(moves.len(), 2);
        assert!(
            moves
                .iter()
                .all(|movement| movement.promotion() == Some(PieceKind::Queen))
        );
        let black = moves_of(&position, coord!("b2"));
        assert_eq!(destinations(&black), [coord!("b1")]);
        assert_eq!(black[0].promotion(), Some(PieceKind::Queen));
    }
    #[test]
    fn en_passant_needs_the_previous_double_push() {
        let mut position = Position::from_placement([
            (coord!("d4"), Color::Black, PieceKind::Pawn),
            (coord!("e2"), Color::White, PieceKind::Pawn),
            (coord!("c2"), Color::White, PieceKind::Pawn),
        ])
        .unwrap();
        let push = moves_of(&position, coord!("e2"))
            .into_iter()
            .find(|movement| movement.is_double_push())
            .unwrap();
        position.apply(&push).unwrap();
        position.set_last_move(Some(push));

        let black = moves_of(&position, coord!("d4"));
        let en_passant: Vec<_> = black.iter().filter(|movement| movement.is_en_passant()).collect();
        assert_eq!(en_passant.len(), 1);
        assert_eq!(en_passant[0].to, coord!("e3"));
        assert_eq!(en_passant[0].en_passant_victim(), coord!("e4"));
        assert_eq!(en_passant[0].captured, position[coord!("e4")]);

        // a single push right after does not qualify
        let single = moves_of(&position, coord!("c2"))
            .into_iter()
            .find(|movement| movement.to == coord!("c3"))
            .unwrap();
        position.apply(&single).unwrap();
        position.set_last_move(Some(single));
        assert!(!moves_of(&position, coord!("d4")).iter().any(|movement| movement.is_en_passant()));
    }

    fn castling_setup() -> Position {
        Position::from_placement([
            (coord!("e1"), Color::White, PieceKind::King),
            (coord!("h1"), Color::White, PieceKind::Rook),
            (coord!("a1"), Color::White, PieceKind::Rook),
            (coord!("e8"), Color::Black, PieceKind::King),
        ])
        .unwrap()
    }
    fn castles(position: &mut Position) -> Vec<Move> {
        let king = position[coord!("e1")].unwrap();
        position
            .all_possible_moves(king)
            .into_iter()
            .filter(|movement| movement.is_castle())
            .collect()
    }

    #[test]
    fn castling_both_sides() {
        let mut position = castling_setup();
        let castles = castles(&mut position);
        assert_eq!(destinations(&castles), [coord!("c1"), coord!("g1")]);
        let kingside = castles.iter().find(|movement| movement.to == coord!("g1")).unwrap();
        assert_eq!(
            kingside.special,
            Special::Castle {
                rook_from: coord!("h1"),
                rook_to: coord!("f1"),
            }
        );
        assert_eq!(position, castling_setup());
    }
    #[test]
    fn plain_king_moves_never_castle() {
        let position = castling_setup();
        let king = position[coord!("e1")].unwrap();
        assert!(!position.pseudo_legal_moves(king).iter().any(|movement| movement.is_castle()));
    }
    #[test]
    fn no_castling_after_rook_moved() {
        let mut position = castling_setup();
        let rook = position[coord!("h1")].unwrap();
        position.piece_mut(rook).unwrap().has_moved = true;
        assert_eq!(destinations(&castles(&mut position)), [coord!("c1")]);
    }
    #[test]
    fn no_castling_after_king_moved() {
        let mut position = castling_setup();
        let king = position[coord!("e1")].unwrap();
        position.piece_mut(king).unwrap().has_moved = true;
        assert!(castles(&mut position).is_empty());
    }
    #[test]
    fn no_castling_through_attacked_cells() {
        let mut position = castling_setup();
        position
            .add_piece(crate::piece::Piece::new(PieceKind::Rook, Color::Black, coord!("f8")))
            .unwrap();
        assert_eq!(destinations(&castles(&mut position)), [coord!("c1")]);

        let mut position = castling_setup();
        position
            .add_piece(crate::piece::Piece::new(PieceKind::Bishop, Color::Black, coord!("e3")))
            .unwrap();
        // e3 bishop hits c1 and g1
        assert!(castles(&mut position).is_empty());
    }
    #[test]
    fn no_castling_out_of_check_or_through_pieces() {
        let mut position = castling_setup();
        position
            .add_piece(crate::piece::Piece::new(PieceKind::Rook, Color::Black, coord!("e5")))
            .unwrap();
        assert!(castles(&mut position).is_empty());

        let mut position = castling_setup();
        position
            .add_piece(crate::piece::Piece::new(PieceKind::Knight, Color::White, coord!("b1")))
            .unwrap();
        assert_eq!(destinations(&castles(&mut position)), [coord!("g1")]);
    }
    #[test]
    fn queenside_b_file_may_be_attacked() {
        let mut position = castling_setup();
        position
            .add_piece(crate::piece::Piece::new(PieceKind::Rook, Color::Black, coord!("b8")))
            .unwrap();
        assert_eq!(destinations(&castles(&mut position)), [coord!("c1"), coord!("g1")]);
    }
    #[test]
    fn no_castling_away_from_the_home_row() {
        let mut position = Position::from_placement([
            (coord!("e4"), Color::White, PieceKind::King),
            (coord!("h4"), Color::White, PieceKind::Rook),
            (coord!("a4"), Color::White, PieceKind::Rook),
            (coord!("e8"), Color::Black, PieceKind::King),
        ])
        .unwrap();
        let king = position[coord!("e4")].unwrap();
        assert!(
            !position
                .all_possible_moves(king)
                .iter()
                .any(|movement| movement.is_castle())
        );
    }
}
