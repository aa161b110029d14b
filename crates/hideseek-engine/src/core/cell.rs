use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Difficulty tier of a grid cell.
///
/// The tier decides what the hider wins when it escapes from the cell and
/// what it loses when the seeker finds it there (see [`PayoffRule`](super::PayoffRule)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CellType {
    /// Easy to search. Small loss when caught, small gain on escape.
    Soft = 0,
    /// Rewarding hideout. Small loss when caught, double gain on escape.
    Medium = 1,
    /// Risky hideout. Triple loss when caught.
    Hard = 2,
}

impl Distribution<CellType> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CellType {
        match rng.random_range(0..=2) {
            0 => CellType::Soft,
            1 => CellType::Medium,
            _ => CellType::Hard,
        }
    }
}

impl CellType {
    /// Number of cell types (3).
    pub const LEN: usize = 3;

    pub const ALL: [CellType; Self::LEN] = [CellType::Soft, CellType::Medium, CellType::Hard];

    /// Returns the single character representation of this cell type.
    ///
    /// # Examples
    ///
    /// ```
    /// use hideseek_engine::CellType;
    ///
    /// assert_eq!(CellType::Soft.as_char(), 'S');
    /// assert_eq!(CellType::Hard.as_char(), 'H');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            CellType::Soft => 'S',
            CellType::Medium => 'M',
            CellType::Hard => 'H',
        }
    }

    /// Parses a cell type from a single character (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use hideseek_engine::CellType;
    ///
    /// assert_eq!(CellType::from_char('M'), Some(CellType::Medium));
    /// assert_eq!(CellType::from_char('h'), Some(CellType::Hard));
    /// assert_eq!(CellType::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'S' | 's' => Some(CellType::Soft),
            'M' | 'm' => Some(CellType::Medium),
            'H' | 'h' => Some(CellType::Hard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_char_roundtrip() {
        for cell in CellType::ALL {
            assert_eq!(CellType::from_char(cell.as_char()), Some(cell));
        }
    }

    #[test]
    fn test_sampling_covers_all_types() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; CellType::LEN];
        for _ in 0..200 {
            let cell: CellType = rng.random();
            seen[cell as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every cell type should be sampled");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&CellType::Medium).unwrap(),
            "\"medium\""
        );
        let cell: CellType = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(cell, CellType::Hard);
    }
}
