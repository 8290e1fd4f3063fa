//! Drives the kernel x size x worker-count matrix and aggregates trial timings.
//!
//! Every report row carries `2 + max_workers` columns in a fixed order:
//!
//! 1. the whole range processed by one synchronous call,
//! 2. one synchronous call over `size / max_workers` elements, the best case
//!    parallel execution could reach with zero overhead,
//! 3. dispatched runs with 1, 2, .. `max_workers` workers.

pub mod stopwatch;
pub mod workload;

use std::hint::black_box;

use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::config::ExperimentConfig;
use crate::error::{Error, Result};
use crate::kernel::{Element, Kernel, Span};
use crate::parallel::ParallelProcessor;
use crate::stats::{mean_and_stdev, Aggregate};

pub use stopwatch::Stopwatch;
pub use workload::{FillMode, Workload};

/// Aggregated timings for one (kernel, size) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub size: usize,
    pub columns: Vec<Aggregate>,
}

pub struct Harness {
    config: ExperimentConfig,
    rng: StdRng,
    stopwatch: Stopwatch,
}

impl Harness {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            rng,
            stopwatch: Stopwatch::new(),
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Times every column of one configuration over `trials` fresh workloads.
    pub fn run_configuration<T, K>(
        &mut self,
        processor: &ParallelProcessor,
        label: &str,
        kernel: &K,
        size: usize,
    ) -> Result<ReportRow>
    where
        T: Element,
        K: Kernel<T> + ?Sized,
    {
        let max_workers = self.config.max_workers;
        if processor.max_workers() < max_workers {
            return Err(Error::InvalidConfig(format!(
                "dispatcher supports {} workers, experiment needs {max_workers}",
                processor.max_workers()
            )));
        }

        let ideal = size / max_workers;
        let mut times = vec![Vec::with_capacity(self.config.trials); self.config.columns()];

        debug!(label, size, element = T::NAME, "Running configuration");

        for trial in 0..self.config.trials {
            // Fresh buffers every trial so no cache state leaks between trials.
            let mut work = Workload::<T>::prepare(size, self.config.fill, &mut self.rng)?;
            let (y, x) = work.buffers();

            self.stopwatch.start();
            black_box(kernel.apply(Span::full(&mut *y, x)));
            self.stopwatch.stop();
            times[0].push(self.stopwatch.elapsed_micros());

            self.stopwatch.start();
            black_box(kernel.apply(Span::new(&mut y[..ideal], &x[..ideal], size, 0, ideal)));
            self.stopwatch.stop();
            times[1].push(self.stopwatch.elapsed_micros());

            for nb_workers in 1..=max_workers {
                self.stopwatch.start();
                let partials = processor.dispatch(&mut *y, x, nb_workers, kernel)?;
                self.stopwatch.stop();
                // Partial results are not reported, only the buffers matter.
                black_box(partials);
                times[1 + nb_workers].push(self.stopwatch.elapsed_micros());
            }

            trace!(label, size, trial, sequential_us = times[0][trial], "Trial done");
        }

        let columns = times
            .iter()
            .map(|samples| mean_and_stdev(samples, self.config.stdev))
            .collect::<Result<Vec<_>>>()?;

        Ok(ReportRow {
            label: format!("{label}{}", processor.strategy().label_suffix()),
            size,
            columns,
        })
    }

    /// Runs the full matrix, handing each row to `on_row` as soon as it is ready.
    pub fn run<T, F>(&mut self, progress: Option<&ProgressBar>, mut on_row: F) -> Result<()>
    where
        T: Element,
        F: FnMut(&ReportRow) -> Result<()>,
    {
        let processors = self
            .config
            .dispatch
            .strategies()
            .iter()
            .map(|&strategy| ParallelProcessor::new(strategy, self.config.max_workers))
            .collect::<Result<Vec<_>>>()?;

        let kernels = self.config.kernels.clone();
        let sizes = self.config.sizes.clone();

        info!(
            kernels = kernels.len(),
            sizes = sizes.len(),
            max_workers = self.config.max_workers,
            trials = self.config.trials,
            element = T::NAME,
            "Starting experiment"
        );

        for op in &kernels {
            for &size in &sizes {
                for processor in &processors {
                    let row = self.run_configuration::<T, _>(processor, op.label(), op, size)?;
                    on_row(&row)?;
                }

                if let Some(pb) = progress {
                    pb.inc(1);
                }
            }
        }

        Ok(())
    }
}
