use rand::Rng;

use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    /// Lays out the initial mines for `config`, drawing randomness from `rng`.
    fn generate<R: Rng + ?Sized>(self, config: &GameConfig, rng: &mut R) -> Result<GameState>;
}
