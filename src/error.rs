use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected before any work is dispatched
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Buffer length mismatch: y has {y} elements, x has {x}")]
    LengthMismatch { y: usize, x: usize },

    #[error("Failed to allocate workload of {size} elements")]
    Allocation { size: usize },

    #[error("Fill shape {rows}x{cols} does not fit a buffer of {len} elements")]
    FillShape { rows: usize, cols: usize, len: usize },

    #[error("Failed to spawn worker {worker}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("Failed to build worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to write report")]
    Io(#[from] std::io::Error),

    #[error("Cannot aggregate an empty sample set")]
    EmptySamples,
}
