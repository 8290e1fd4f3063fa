use approx::assert_relative_eq;
use slicebench::{mean_and_stdev, StdevFormula};

#[test]
fn test_population_formula_is_reproducible() {
    let samples = [1502, 1498, 1533, 1476, 1510];
    let first = mean_and_stdev(&samples, StdevFormula::Population).unwrap();
    let second = mean_and_stdev(&samples, StdevFormula::Population).unwrap();

    assert_eq!(first, second);
    assert_relative_eq!(first.mean, 1503.8);

    let sqr_mean = samples.iter().map(|&s| (s * s) as f64).sum::<f64>() / 5.0;
    assert_relative_eq!(first.stdev, (sqr_mean - 1503.8 * 1503.8).sqrt(), epsilon = 1e-9);
}

#[test]
fn test_two_pass_on_large_offsets() {
    let samples = [100_000_001, 100_000_003, 100_000_005];
    let agg = mean_and_stdev(&samples, StdevFormula::TwoPass).unwrap();

    assert_relative_eq!(agg.mean, 100_000_003.0);
    assert_relative_eq!(agg.stdev, (8.0f64 / 3.0).sqrt(), epsilon = 1e-9);
}
