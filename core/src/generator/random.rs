use alloc::collections::BTreeSet;

use super::*;

/// Draws `amount` distinct cell indices from `0..size` by repeated uniform draws.
///
/// Duplicate draws are discarded and retried until the set is full. Requesting more mines than there are cells is
/// rejected instead of looping forever.
pub fn draw_mine_set<S>(source: &mut S, size: CellCount, amount: CellCount) -> Result<BTreeSet<CellIndex>>
where
    S: RandomSource + ?Sized,
{
    if amount > size {
        log::warn!(
            "Refusing to place mines, requested {} but only {} cells fit",
            amount,
            size
        );
        return Err(GameError::TooManyMines {
            requested: amount,
            capacity: size,
        });
    }

    let mut mines = BTreeSet::new();

    // optimize for full boards
    if amount == size {
        mines.extend(0..size);
        return Ok(mines);
    }

    let last_index = size - 1;
    let mut draws: usize = 0;
    while mines.len() < amount {
        mines.insert(source.random_int(0, last_index));
        draws += 1;
    }

    log::trace!("Placed {} mines in {} draws", amount, draws);
    Ok(mines)
}
