use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::harness::workload::FillMode;
use crate::io::ReportMode;
use crate::kernel::Op;
use crate::parallel::DispatchStrategy;
use crate::stats::StdevFormula;

pub const DEFAULT_MAX_WORKERS: usize = 12;
pub const DEFAULT_TRIALS: usize = 5;
pub const ARRAY_SIZES: [usize; 4] = [500_000, 5_000_000, 50_000_000, 500_000_000];
pub const VECTOR_SIZES: [usize; 2] = [5_000_000, 50_000_000];
pub const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElementType {
    F32,
    F64,
    I32,
    I64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DispatchMode {
    /// Thread per partition per call
    #[default]
    Spawn,
    /// Reused worker pool
    Pool,
    /// Both, reported as separate rows
    Both,
}

impl DispatchMode {
    pub fn strategies(self) -> &'static [DispatchStrategy] {
        match self {
            DispatchMode::Spawn => &[DispatchStrategy::Spawn],
            DispatchMode::Pool => &[DispatchStrategy::Pool],
            DispatchMode::Both => &[DispatchStrategy::Spawn, DispatchStrategy::Pool],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Floating-point arrays, random fill, all elementwise kernels
    Array,
    /// Integer vectors, zero fill, copy-and-reduce
    Vector,
}

/// Everything that defines one experiment matrix.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub max_workers: usize,
    pub trials: usize,
    pub sizes: Vec<usize>,
    pub kernels: Vec<Op>,
    pub element: ElementType,
    pub delimiter: String,
    pub report_mode: ReportMode,
    pub fill: FillMode,
    pub seed: u64,
    pub stdev: StdevFormula,
    pub dispatch: DispatchMode,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::array()
    }
}

impl ExperimentConfig {
    pub fn array() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            trials: DEFAULT_TRIALS,
            sizes: ARRAY_SIZES.to_vec(),
            kernels: Op::ARRAY.to_vec(),
            element: ElementType::F64,
            delimiter: "#".to_string(),
            report_mode: ReportMode::MeanStdev,
            fill: FillMode::Random,
            seed: DEFAULT_SEED,
            stdev: StdevFormula::Population,
            dispatch: DispatchMode::Spawn,
        }
    }

    pub fn vector() -> Self {
        Self {
            sizes: VECTOR_SIZES.to_vec(),
            kernels: Op::VECTOR.to_vec(),
            element: ElementType::I32,
            delimiter: ", ".to_string(),
            report_mode: ReportMode::MeanOnly,
            fill: FillMode::Zero,
            ..Self::array()
        }
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Array => Self::array(),
            Preset::Vector => Self::vector(),
        }
    }

    /// Number of timed columns per report row.
    pub fn columns(&self) -> usize {
        2 + self.max_workers
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::InvalidConfig(
                "max workers must be at least 1".to_string(),
            ));
        }
        if self.trials == 0 {
            return Err(Error::InvalidConfig("trials must be at least 1".to_string()));
        }
        if self.sizes.is_empty() {
            return Err(Error::InvalidConfig("no input sizes given".to_string()));
        }
        if self.kernels.is_empty() {
            return Err(Error::InvalidConfig("no kernels selected".to_string()));
        }
        if self.delimiter.is_empty() {
            return Err(Error::InvalidConfig("delimiter must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_defaults() {
        let config = ExperimentConfig::default();
        assert_eq!(config.max_workers, 12);
        assert_eq!(config.trials, 5);
        assert_eq!(config.sizes, vec![500_000, 5_000_000, 50_000_000, 500_000_000]);
        assert_eq!(config.delimiter, "#");
        assert_eq!(config.columns(), 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_vector_preset() {
        let config = ExperimentConfig::vector();
        assert_eq!(config.sizes, vec![5_000_000, 50_000_000]);
        assert_eq!(config.delimiter, ", ");
        assert_eq!(config.report_mode, ReportMode::MeanOnly);
        assert_eq!(config.fill, FillMode::Zero);
        assert_eq!(config.kernels, vec![Op::CopyReduce]);
        assert_eq!(config.max_workers, 12);
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = ExperimentConfig {
            max_workers: 0,
            ..ExperimentConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_empty_inputs() {
        let no_trials = ExperimentConfig {
            trials: 0,
            ..ExperimentConfig::default()
        };
        let no_sizes = ExperimentConfig {
            sizes: Vec::new(),
            ..ExperimentConfig::default()
        };
        assert!(no_trials.validate().is_err());
        assert!(no_sizes.validate().is_err());
    }
}
