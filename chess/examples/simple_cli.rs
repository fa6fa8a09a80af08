// Simple command-line application to play chess
//
// Enter moves as two squares, like `e2 e4`. Other commands are `moves e2`, `undo`, `reset` and
// `quit`. Set `RUST_LOG=debug` to see what the engine does.

use owlrules::{board::PrettyStyle, Color, Coord, MoveChain};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

fn main() {
    env_logger::init();

    let mut stdin = io::stdin().lock();
    let mut chain = MoveChain::new_initial();

    loop {
        println!("{}", chain.last().pretty(PrettyStyle::Utf8));
        if let Some(status) = chain.status() {
            match status.winner(chain.side()) {
                Some(winner) => println!("{}, {} wins", status, winner),
                None => println!("{}", status),
            }
        }
        print!("{} move #{}: ", chain.side(), chain.len() + 1);
        io::stdout().flush().unwrap();

        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let tokens: Vec<&str> = s.split_whitespace().collect();

        match tokens.as_slice() {
            ["quit"] => break,
            ["undo"] => match chain.pop() {
                Some(rec) => println!("Took back {}", rec.mv()),
                None => println!("Nothing to take back"),
            },
            ["reset"] => chain.reset(),
            ["moves", src] => match Coord::from_str(src) {
                Ok(src) => {
                    let moves: Vec<String> = chain
                        .valid_moves(src)
                        .iter()
                        .map(|mv| mv.dst().to_string())
                        .collect();
                    println!("Moves: {}", moves.join(" "));
                }
                Err(e) => println!("Bad square: {}", e),
            },
            [src, dst] => match chain.push_str(src, dst) {
                Ok(rec) => {
                    if let Some(captured) = rec.mv().captured() {
                        println!("Captured {}", captured);
                    }
                }
                Err(e) => println!("Bad move: {}", e),
            },
            _ => println!("Unknown command"),
        }

        println!();
    }

    for color in Color::iter() {
        let captured: Vec<String> = chain.captured_by(color).map(|c| c.to_string()).collect();
        println!("Captured by {}: {}", color, captured.join(", "));
    }
}
