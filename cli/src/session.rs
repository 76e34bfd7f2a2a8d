use std::io::{BufRead, Write};

use minefield_core::{BoardView, CellIndex, Coord2, MineField, RandomSource};

use crate::command::{Command, CommandError, HELP};
use crate::render::{render_board, render_status};

/// Interactive game loop over any line-based input and text output.
pub struct Session<R> {
    field: MineField<R>,
}

impl<R: RandomSource> Session<R> {
    pub fn new(field: MineField<R>) -> Self {
        Self { field }
    }

    #[cfg(test)]
    pub fn field(&self) -> &MineField<R> {
        &self.field
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
        self.print_board(&mut output)?;

        for line in input.lines() {
            let line = line?;
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(err) => {
                    writeln!(output, "{err}")?;
                    continue;
                }
            };

            log::trace!("command: {:?}", command);
            if !self.apply(command, &mut output)? {
                break;
            }
        }

        output.flush()?;
        Ok(())
    }

    /// Returns `false` once the player asked to quit.
    fn apply(&mut self, command: Command, output: &mut impl Write) -> anyhow::Result<bool> {
        match command {
            Command::Open(coords) => {
                let Some(index) = self.index_at(coords, output)? else {
                    return Ok(true);
                };
                if self.field.lost() {
                    writeln!(output, "Game over, type `reset` to play again.")?;
                    return Ok(true);
                }
                let outcome = self.field.open(index)?;
                log::debug!("open {:?}: {:?}", coords, outcome);
                if outcome.has_update() {
                    self.print_board(output)?;
                }
            }
            Command::Flag(coords) | Command::Unflag(coords) => {
                let Some(index) = self.index_at(coords, output)? else {
                    return Ok(true);
                };
                let outcome = if matches!(command, Command::Flag(_)) {
                    self.field.flag(index)?
                } else {
                    self.field.unflag(index)?
                };
                log::debug!("{:?}: {:?}", command, outcome);
                if outcome.has_update() {
                    self.print_board(output)?;
                }
            }
            Command::Reset => {
                self.field.reset()?;
                log::info!("Board reset");
                self.print_board(output)?;
            }
            Command::Dump => {
                let view = BoardView::from_field(&self.field);
                writeln!(output, "{}", serde_json::to_string(&view)?)?;
            }
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    fn index_at(&self, (row, col): Coord2, output: &mut impl Write) -> anyhow::Result<Option<CellIndex>> {
        if row < self.field.rows() && col < self.field.cols() {
            Ok(Some(self.field.cell_index(row, col)))
        } else {
            writeln!(
                output,
                "({row}, {col}) is outside the {}x{} board",
                self.field.rows(),
                self.field.cols()
            )?;
            Ok(None)
        }
    }

    fn print_board(&self, output: &mut impl Write) -> anyhow::Result<()> {
        let view = BoardView::from_field(&self.field);
        write!(output, "{}", render_board(&view))?;
        writeln!(output, "{}", render_status(&view, self.field.flag_count()))?;
        Ok(())
    }
}
