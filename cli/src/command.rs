use std::str::FromStr;

use minefield_core::{Coord, Coord2};
use thiserror::Error;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Open(Coord2),
    Flag(Coord2),
    Unflag(Coord2),
    Reset,
    Dump,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("`{0}` expects a row and a column")]
    MissingCoords(&'static str),
    #[error("Invalid number `{0}`")]
    InvalidNumber(String),
    #[error("Unexpected trailing input `{0}`")]
    Trailing(String),
}

pub const HELP: &str = "\
commands:
  open ROW COL    (o)  open a cell
  flag ROW COL    (f)  flag a cell
  unflag ROW COL  (u)  remove a flag
  reset           (r)  close the board and shuffle the mines
  dump                 print the board as JSON
  help            (h)  show this text
  quit            (q)  leave";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "open" | "o" => Command::Open(parse_coords(&mut words, "open")?),
            "flag" | "f" => Command::Flag(parse_coords(&mut words, "flag")?),
            "unflag" | "u" => Command::Unflag(parse_coords(&mut words, "unflag")?),
            "reset" | "r" => Command::Reset,
            "dump" => Command::Dump,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<Coord2, CommandError> {
    let row = parse_coord(words.next().ok_or(CommandError::MissingCoords(name))?)?;
    let col = parse_coord(words.next().ok_or(CommandError::MissingCoords(name))?)?;
    Ok((row, col))
}

fn parse_coord(word: &str) -> Result<Coord, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_string()))
}
