use serde::{Deserialize, Serialize};

/// What a renderer shows for a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Closed,
    Flagged,
    /// Open safe cell with its vicinity count.
    Open(u8),
    /// Open mine, only visible after a loss.
    Mine,
}

impl CellView {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed | Self::Flagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Closed
    }
}
