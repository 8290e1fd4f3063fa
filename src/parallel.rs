use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::kernel::{Element, Kernel, Span};

/// Splits `[0, size)` into `nb_workers` contiguous slices of `size / nb_workers`
/// elements. The last slice always ends at `size` and absorbs the remainder.
pub fn partition(size: usize, nb_workers: usize) -> Result<Vec<Range<usize>>> {
    if nb_workers == 0 {
        return Err(Error::InvalidConfig(
            "worker count must be at least 1".to_string(),
        ));
    }

    let work_slice = size / nb_workers;

    Ok((0..nb_workers)
        .map(|w| {
            let start = w * work_slice;
            let end = if w == nb_workers - 1 {
                size
            } else {
                (w + 1) * work_slice
            };
            start..end
        })
        .collect())
}

/// Cuts both buffers along a partition plan into disjoint spans.
///
/// The plan must tile `[0, len)` in order, as produced by [`partition`].
pub fn split_spans<'a, T>(
    y: &'a mut [T],
    x: &'a [T],
    plan: &[Range<usize>],
) -> Result<Vec<Span<'a, T>>> {
    if y.len() != x.len() {
        return Err(Error::LengthMismatch {
            y: y.len(),
            x: x.len(),
        });
    }

    let size = y.len();
    let mut cursor = 0;
    for range in plan {
        if range.start != cursor || range.end < range.start {
            return Err(Error::InvalidConfig(format!(
                "partition {range:?} does not continue from {cursor}"
            )));
        }
        cursor = range.end;
    }
    if cursor != size {
        return Err(Error::InvalidConfig(format!(
            "partition plan ends at {cursor}, buffers hold {size} elements"
        )));
    }

    let mut rest = y;
    let mut spans = Vec::with_capacity(plan.len());

    for range in plan {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        rest = tail;
        spans.push(Span::new(head, &x[range.clone()], size, range.start, range.end));
    }

    Ok(spans)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStrategy {
    /// A fresh OS thread per partition on every call
    Spawn,
    /// Tasks on a reusable worker pool
    Pool,
}

impl DispatchStrategy {
    /// Suffix appended to report labels of rows measured with this strategy.
    pub fn label_suffix(self) -> &'static str {
        match self {
            DispatchStrategy::Spawn => "",
            DispatchStrategy::Pool => " [pool]",
        }
    }
}

pub struct ParallelProcessor {
    strategy: DispatchStrategy,
    pool: Option<ThreadPool>,
    max_workers: usize,
}

impl ParallelProcessor {
    pub fn new(strategy: DispatchStrategy, max_workers: usize) -> Result<Self> {
        if max_workers == 0 {
            return Err(Error::InvalidConfig(
                "worker ceiling must be at least 1".to_string(),
            ));
        }

        let pool = match strategy {
            DispatchStrategy::Spawn => None,
            DispatchStrategy::Pool => Some(
                ThreadPoolBuilder::new()
                    .num_threads(max_workers)
                    .thread_name(|i| format!("pool-worker-{i}"))
                    .build()?,
            ),
        };

        debug!(?strategy, max_workers, "Dispatcher ready");

        Ok(Self {
            strategy,
            pool,
            max_workers,
        })
    }

    pub fn strategy(&self) -> DispatchStrategy {
        self.strategy
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Runs `kernel` once per partition on `nb_workers` concurrent workers and
    /// returns once every worker has finished.
    ///
    /// Per-partition return values come back in partition order.
    pub fn dispatch<T, K>(
        &self,
        y: &mut [T],
        x: &[T],
        nb_workers: usize,
        kernel: &K,
    ) -> Result<Vec<T>>
    where
        T: Element,
        K: Kernel<T> + ?Sized,
    {
        trace!(nb_workers, size = y.len(), "Dispatching");
        let plan = partition(y.len(), nb_workers)?;
        let spans = split_spans(y, x, &plan)?;

        match &self.pool {
            None => spawn_per_partition(spans, kernel),
            Some(pool) => {
                if nb_workers > self.max_workers {
                    return Err(Error::InvalidConfig(format!(
                        "{nb_workers} workers requested from a pool of {}",
                        self.max_workers
                    )));
                }
                run_on_pool(pool, spans, kernel)
            }
        }
    }
}

fn spawn_per_partition<T, K>(spans: Vec<Span<'_, T>>, kernel: &K) -> Result<Vec<T>>
where
    T: Element,
    K: Kernel<T> + ?Sized,
{
    thread::scope(|s| {
        let mut handles = Vec::with_capacity(spans.len());
        let mut spawn_error = None;

        for (worker, span) in spans.into_iter().enumerate() {
            match thread::Builder::new()
                .name(format!("worker-{worker}"))
                .spawn_scoped(s, move || kernel.apply(span))
            {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    spawn_error = Some(Error::Spawn { worker, source });
                    break;
                }
            }
        }

        // Join everything that did start before reporting any failure.
        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();

        if let Some(err) = spawn_error {
            return Err(err);
        }

        joined
            .into_iter()
            .enumerate()
            .map(|(worker, res)| res.map_err(|_| Error::WorkerPanicked { worker }))
            .collect()
    })
}

fn run_on_pool<T, K>(pool: &ThreadPool, spans: Vec<Span<'_, T>>, kernel: &K) -> Result<Vec<T>>
where
    T: Element,
    K: Kernel<T> + ?Sized,
{
    let mut results: Vec<Option<T>> = vec![None; spans.len()];

    // A panicking task leaves its slot empty instead of unwinding through the scope.
    pool.scope(|s| {
        for (span, slot) in spans.into_iter().zip(results.iter_mut()) {
            s.spawn(move |_| {
                *slot = panic::catch_unwind(AssertUnwindSafe(|| kernel.apply(span))).ok();
            });
        }
    });

    results
        .into_iter()
        .enumerate()
        .map(|(worker, slot)| slot.ok_or(Error::WorkerPanicked { worker }))
        .collect()
}
