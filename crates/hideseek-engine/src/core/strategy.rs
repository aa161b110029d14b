use serde::{Deserialize, Serialize};

use crate::StrategyError;

/// Entries down to this (negative) value are accepted as numerical noise and clamped to 0.
pub const NEGATIVE_TOLERANCE: f64 = 1e-9;

/// Largest accepted distance between the probability sum and 1.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// A mixed strategy: a probability distribution over grid positions.
///
/// Construction validates the distribution: every entry must be finite and at
/// least `-NEGATIVE_TOLERANCE`, and the entries must sum to 1 within
/// [`SUM_TOLERANCE`]. Tiny negative entries are clamped to 0 and the vector is
/// renormalized, so the stored probabilities are exactly non-negative.
///
/// # Example
///
/// ```
/// use hideseek_engine::Strategy;
///
/// let strategy = Strategy::new(vec![0.25, 0.75]).unwrap();
/// assert_eq!(strategy.len(), 2);
/// assert_eq!(strategy.probability(1), 0.75);
///
/// assert!(Strategy::new(vec![0.5, 0.6]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Strategy {
    probabilities: Vec<f64>,
}

impl TryFrom<Vec<f64>> for Strategy {
    type Error = StrategyError;

    fn try_from(probabilities: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(probabilities)
    }
}

impl From<Strategy> for Vec<f64> {
    fn from(strategy: Strategy) -> Self {
        strategy.probabilities
    }
}

impl Strategy {
    pub fn new(mut probabilities: Vec<f64>) -> Result<Self, StrategyError> {
        if probabilities.is_empty() {
            return Err(StrategyError::Empty);
        }
        for (index, p) in probabilities.iter_mut().enumerate() {
            if !p.is_finite() {
                return Err(StrategyError::NonFinite { index });
            }
            if *p < -NEGATIVE_TOLERANCE {
                return Err(StrategyError::Negative { index, value: *p });
            }
            if *p < 0.0 {
                log::warn!("clamping probability {p:e} at position {index} to 0");
                *p = 0.0;
            }
        }
        let sum = probabilities.iter().sum::<f64>();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(StrategyError::Sum { sum });
        }
        for p in &mut probabilities {
            *p /= sum;
        }
        Ok(Self { probabilities })
    }

    /// Returns the strategy that always plays `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[must_use]
    pub fn pure(len: usize, index: usize) -> Self {
        assert!(index < len, "pure strategy index {index} out of {len}");
        let mut probabilities = vec![0.0; len];
        probabilities[index] = 1.0;
        Self { probabilities }
    }

    /// Returns the uniform distribution over `len` positions.
    ///
    /// # Panics
    ///
    /// Panics if `len == 0`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn uniform(len: usize) -> Self {
        assert!(len > 0, "uniform strategy needs at least one position");
        Self {
            probabilities: vec![1.0 / len as f64; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always `false`: strategies cover at least one position.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    #[must_use]
    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities[index]
    }

    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Positions played with positive probability.
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .filter(|(_, p)| **p > 0.0)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Strategy::new(vec![]), Err(StrategyError::Empty));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(
            Strategy::new(vec![0.5, f64::NAN]),
            Err(StrategyError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_rejects_negative_beyond_tolerance() {
        let err = Strategy::new(vec![1.1, -0.1]).unwrap_err();
        assert!(matches!(err, StrategyError::Negative { index: 1, .. }));
    }

    #[test]
    fn test_rejects_bad_sum() {
        assert!(matches!(
            Strategy::new(vec![0.3, 0.3]),
            Err(StrategyError::Sum { .. })
        ));
    }

    #[test]
    fn test_clamps_numerical_noise() {
        let strategy = Strategy::new(vec![1.0 + 5e-10, -5e-10]).unwrap();
        assert!(strategy.probabilities().iter().all(|p| *p >= 0.0));
        assert_eq!(strategy.probability(1), 0.0);
        assert!((strategy.probabilities().iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pure_and_uniform() {
        let pure = Strategy::pure(3, 2);
        assert_eq!(pure.probabilities(), &[0.0, 0.0, 1.0]);
        assert_eq!(pure.support().collect::<Vec<_>>(), vec![2]);

        let uniform = Strategy::uniform(4);
        assert!(uniform.probabilities().iter().all(|p| *p == 0.25));
        assert_eq!(uniform.support().count(), 4);
    }

    #[test]
    fn test_serde_validates() {
        let strategy: Strategy = serde_json::from_str("[0.5, 0.5]").unwrap();
        assert_eq!(serde_json::to_string(&strategy).unwrap(), "[0.5,0.5]");

        let result: Result<Strategy, _> = serde_json::from_str("[0.5, 0.4]");
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("sum"), "unexpected error: {err_msg}");
    }
}
