use crate::*;
pub use random::*;

mod random;

/// Source of uniformly distributed integers consumed by mine placement.
pub trait RandomSource {
    /// Returns an integer in `min..=max`, both ends inclusive.
    fn random_int(&mut self, min: CellIndex, max: CellIndex) -> CellIndex;
}

impl<R: rand::RngCore> RandomSource for R {
    fn random_int(&mut self, min: CellIndex, max: CellIndex) -> CellIndex {
        use rand::Rng;

        self.random_range(min..=max)
    }
}
