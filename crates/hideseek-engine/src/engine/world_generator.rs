use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CellType, Grid, GridError};

/// Seed for deterministic world generation.
///
/// A 128-bit seed serialized as a 32-character hex string. The same seed and
/// dimensions always produce the same grid, which makes generated worlds
/// reproducible in reports and tests.
///
/// # Example
///
/// ```
/// use hideseek_engine::{WorldGenerator, WorldSeed};
/// use rand::Rng as _;
///
/// let seed: WorldSeed = rand::rng().random();
/// let a = WorldGenerator::with_seed(seed).generate(3, 5).unwrap();
/// let b = WorldGenerator::with_seed(seed).generate(3, 5).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSeed([u8; 16]);

impl WorldSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Parses a seed from its 32-character hex form.
    pub fn from_hex(hex_str: &str) -> Result<Self, String> {
        if hex_str.len() != 32 {
            return Err(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            ));
        }
        let num = u128::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex: {hex_str} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").expect("writing to a String cannot fail");
        hex_str
    }
}

impl Serialize for WorldSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WorldSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

impl Distribution<WorldSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> WorldSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        WorldSeed(seed)
    }
}

/// Generates grids of uniformly random cell types.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    rng: Pcg32,
}

impl Default for WorldGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but deterministic.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Generates a `rows`×`cols` grid.
    pub fn generate(&mut self, rows: usize, cols: usize) -> Result<Grid, GridError> {
        let cells: Vec<CellType> = (0..rows * cols).map(|_| self.rng.random()).collect();
        Grid::new(rows, cols, cells)
    }
}
