//! Reduction of trial samples to a reportable (mean, stdev) pair.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub mean: f64,
    pub stdev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdevFormula {
    /// sqrt(sum(x^2)/n - mean^2), the single-pass population form
    #[default]
    Population,
    /// sqrt(sum((x - mean)^2)/n), numerically stable
    TwoPass,
}

/// Population mean and standard deviation of `samples`.
///
/// Rounding in the single-pass form can leave a tiny negative variance for
/// near-constant samples; it is clamped to zero rather than reported as NaN.
pub fn mean_and_stdev(samples: &[u64], formula: StdevFormula) -> Result<Aggregate> {
    if samples.is_empty() {
        return Err(Error::EmptySamples);
    }

    let n = samples.len() as f64;
    let sum: f64 = samples.iter().map(|&s| s as f64).sum();
    let mean = sum / n;

    let variance = match formula {
        StdevFormula::Population => {
            let sqr_sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
            sqr_sum / n - mean * mean
        }
        StdevFormula::TwoPass => {
            samples
                .iter()
                .map(|&s| {
                    let d = s as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / n
        }
    };

    Ok(Aggregate {
        mean,
        stdev: variance.max(0.0).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_values() {
        let agg = mean_and_stdev(&[2, 4, 4, 4, 5, 5, 7, 9], StdevFormula::Population).unwrap();
        assert_relative_eq!(agg.mean, 5.0);
        assert_relative_eq!(agg.stdev, 2.0);
    }

    #[test]
    fn test_formulas_agree_on_small_samples() {
        let samples = [120, 131, 118, 125, 140];
        let single = mean_and_stdev(&samples, StdevFormula::Population).unwrap();
        let two_pass = mean_and_stdev(&samples, StdevFormula::TwoPass).unwrap();

        assert_relative_eq!(single.mean, two_pass.mean);
        assert_relative_eq!(single.stdev, two_pass.stdev, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_samples_have_zero_spread() {
        let agg = mean_and_stdev(&[1_000_003; 5], StdevFormula::Population).unwrap();
        assert_eq!(agg.mean, 1_000_003.0);
        assert_eq!(agg.stdev, 0.0);
    }

    #[test]
    fn test_single_sample() {
        let agg = mean_and_stdev(&[42], StdevFormula::TwoPass).unwrap();
        assert_eq!(agg, Aggregate { mean: 42.0, stdev: 0.0 });
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(
            mean_and_stdev(&[], StdevFormula::Population),
            Err(Error::EmptySamples)
        ));
    }
}
