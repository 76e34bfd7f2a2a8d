use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index is outside the board")]
    InvalidIndex,
    #[error("Board needs at least one row and one column")]
    EmptyBoard,
    #[error("Too many mines, requested {requested} but only {capacity} cells fit")]
    TooManyMines {
        requested: CellCount,
        capacity: CellCount,
    },
}

pub type Result<T> = core::result::Result<T, GameError>;
