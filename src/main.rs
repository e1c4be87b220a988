#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::{
    fmt::Write as _,
    io::{self, Write as _, stdin, stdout},
};

use arbiter::{
    Color, Coord, Game, Move, MoveRequest, PieceKind, board_display::BoardDisplay,
};

fn print_help() {
    println!("flip           - flip the board");
    println!("reset          - reset to starting position");
    println!("random         - play a random legal move");
    println!("exit           - exit the game");
    println!("e2             - view valid moves");
    println!("e2e4           - play the move");
    println!("e7e8q          - move and promote");
    println!("e1g1           - perform castling");
}
fn main() -> io::Result<()> {
    let mut game = Game::new();
    let mut info = String::new();
    let mut highlighted: Vec<Coord> = Vec::new();
    let mut update = true;
    let mut view = Color::White;
    let mut first_time = true;
    loop {
        if update {
            info.clear();
            match game.end_reason() {
                Some(reason) => writeln!(&mut info, "{reason}"),
                None if game.state().is_check() => {
                    writeln!(&mut info, "{} plays, in check", game.side_to_move())
                }
                None => writeln!(&mut info, "{} plays", game.side_to_move()),
            }
            .map_err(io::Error::other)?;
        }
        if first_time {
            writeln!(&mut info, "type `help` for instructions").map_err(io::Error::other)?;
            first_time = false;
        }
        update = false;
        print!(
            "{}",
            BoardDisplay {
                position: game.position(),
                view,
                highlighted: &highlighted,
                info: &info,
            },
        );
        loop {
            print!("> ");
            stdout().flush()?;
            let mut input = String::new();
            if stdin().read_line(&mut input)? == 0 {
                return Ok(());
            }
            let input = input.trim();
            if input == "help" {
                print_help();
                continue;
            } else if input == "reset" {
                game.reset();
                update = true;
                highlighted.clear();
            } else if input == "exit" {
                return Ok(());
            } else if input == "flip" {
                view = !view;
            } else if input == "random" {
                let moves = game.legal_moves();
                if moves.is_empty() {
                    eprintln!("Error: there are no legal moves");
                    continue;
                }
                let movement = moves[rand::random_range(0..moves.len())];
                play(&mut game, &mut highlighted, movement.from, movement.to);
                update = true;
            } else if let Ok(cell) = input.parse::<Coord>() {
                highlighted.clear();
                highlighted.extend(
                    game.legal_moves_from(cell)
                        .into_iter()
                        .map(|movement: Move| movement.to),
                );
            } else {
                let request: MoveRequest = match input.parse() {
                    Ok(request) => request,
                    Err(err) => {
                        eprintln!("Error: {err}");
                        continue;
                    }
                };
                if let Some(kind) = request.promotion
                    && kind != PieceKind::PROMOTION
                {
                    eprintln!("Error: pawns can only be promoted to a {}", PieceKind::PROMOTION);
                    continue;
                }
                if !play(&mut game, &mut highlighted, request.from, request.to) {
                    continue;
                }
                update = true;
            }
            break;
        }
    }
}
fn play(game: &mut Game, highlighted: &mut Vec<Coord>, from: Coord, to: Coord) -> bool {
    let outcome = game.attempt_move(from, to);
    if let Some(error) = outcome.error {
        eprintln!("Error: {error}");
        return false;
    }
    highlighted.clear();
    true
}
