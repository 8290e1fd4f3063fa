//! Measures how elementwise array kernels scale when a range is split across
//! worker threads.

pub mod config;
pub mod error;
pub mod harness;
pub mod io;
pub mod kernel;
pub mod parallel;
pub mod stats;

pub use config::{DispatchMode, ElementType, ExperimentConfig, Preset};
pub use error::{Error, Result};
pub use harness::{Harness, ReportRow};
pub use kernel::{Element, Kernel, Op, Span};
pub use parallel::{partition, DispatchStrategy, ParallelProcessor};
pub use stats::{mean_and_stdev, Aggregate, StdevFormula};
