use std::fmt::Debug;
use std::hint::black_box;

use clap::ValueEnum;
use num_traits::{Num, NumCast};

/// Numeric element stored in a workload buffer.
pub trait Element: Num + NumCast + PartialOrd + Copy + Debug + Send + Sync + 'static {
    /// Name used in logs and on the command line.
    const NAME: &'static str;

    fn abs_value(self) -> Self {
        if self < Self::zero() {
            Self::zero() - self
        } else {
            self
        }
    }
}

impl Element for f32 {
    const NAME: &'static str = "f32";
}

impl Element for f64 {
    const NAME: &'static str = "f64";
}

impl Element for i32 {
    const NAME: &'static str = "i32";
}

impl Element for i64 {
    const NAME: &'static str = "i64";
}

/// One partition of a workload as seen by a kernel.
///
/// `y` and `x` are partition-local: local index `i` is absolute index `start + i`.
/// `size` is the extent of the whole workload, which most kernels ignore.
#[derive(Debug)]
pub struct Span<'a, T> {
    pub y: &'a mut [T],
    pub x: &'a [T],
    pub size: usize,
    pub start: usize,
    pub end: usize,
}

impl<'a, T> Span<'a, T> {
    pub fn new(y: &'a mut [T], x: &'a [T], size: usize, start: usize, end: usize) -> Self {
        debug_assert_eq!(y.len(), end - start);
        debug_assert_eq!(x.len(), end - start);
        Self {
            y,
            x,
            size,
            start,
            end,
        }
    }

    /// The whole workload as a single span.
    pub fn full(y: &'a mut [T], x: &'a [T]) -> Self {
        let size = y.len();
        Self::new(y, x, size, 0, size)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An elementwise range processor.
///
/// Implementations may be invoked concurrently on disjoint spans of the same
/// buffers and must not touch anything outside the span they are given.
pub trait Kernel<T: Element>: Sync {
    fn apply(&self, span: Span<'_, T>) -> T;
}

impl<T, F> Kernel<T> for F
where
    T: Element,
    F: Fn(Span<'_, T>) -> T + Sync,
{
    fn apply(&self, span: Span<'_, T>) -> T {
        self(span)
    }
}

/// The kernels shipped with the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Op {
    /// Walk the index range without touching memory
    Loop,
    /// Read every x[i]
    Touch,
    /// Count elements into the accumulator
    Count,
    /// y[i] += 1
    Increment,
    /// y[i] += 1 while counting elements into the accumulator
    IncrementCount,
    /// y[i] = x[i]
    Copy,
    /// y[i] += x[i]
    Add,
    /// Sum x into the accumulator
    Reduce,
    /// Maximum of x
    Max,
    /// Maximum of |x|
    MaxAbs,
    /// Running maximum of |x|, stored into y
    RunningMaxAbs,
    /// y[i] *= y[i]
    Square,
    /// Sum x into the accumulator while copying it into y
    CopyReduce,
}

impl Op {
    /// Kernels run by the array preset.
    pub const ARRAY: [Op; 12] = [
        Op::Loop,
        Op::Touch,
        Op::Count,
        Op::Increment,
        Op::IncrementCount,
        Op::Copy,
        Op::Add,
        Op::Reduce,
        Op::Max,
        Op::MaxAbs,
        Op::RunningMaxAbs,
        Op::Square,
    ];

    /// Kernels run by the vector preset.
    pub const VECTOR: [Op; 1] = [Op::CopyReduce];

    /// Label printed in the first report column.
    pub fn label(self) -> &'static str {
        match self {
            Op::Loop => "for i in start..end {}",
            Op::Touch => "x[i]",
            Op::Count => "acc += 1",
            Op::Increment => "y[i] += 1",
            Op::IncrementCount => "y[i] += 1; acc += 1",
            Op::Copy => "y[i] = x[i]",
            Op::Add => "y[i] += x[i]",
            Op::Reduce => "acc += x[i]",
            Op::Max => "acc = max(acc, x[i])",
            Op::MaxAbs => "acc = max(acc, |x[i]|)",
            Op::RunningMaxAbs => "acc = max(acc, |x[i]|); y[i] = acc",
            Op::Square => "y[i] *= y[i]",
            Op::CopyReduce => "acc += x[i]; y[i] = x[i]",
        }
    }

    pub fn run<T: Element>(self, span: Span<'_, T>) -> T {
        let Span { y, x, .. } = span;
        let mut acc = T::zero();

        match self {
            Op::Loop => {
                for i in 0..x.len() {
                    black_box(i);
                }
            }
            Op::Touch => {
                for &v in x {
                    black_box(v);
                }
            }
            Op::Count => {
                for _ in 0..x.len() {
                    acc = acc + T::one();
                }
            }
            Op::Increment => {
                for out in y.iter_mut() {
                    *out = *out + T::one();
                }
            }
            Op::IncrementCount => {
                for out in y.iter_mut() {
                    *out = *out + T::one();
                    acc = acc + T::one();
                }
            }
            Op::Copy => y.copy_from_slice(x),
            Op::Add => {
                for (out, &v) in y.iter_mut().zip(x) {
                    *out = *out + v;
                }
            }
            Op::Reduce => {
                for &v in x {
                    acc = acc + v;
                }
            }
            Op::Max => {
                for &v in x {
                    if v > acc {
                        acc = v;
                    }
                }
            }
            Op::MaxAbs => {
                for &v in x {
                    let v = v.abs_value();
                    if v > acc {
                        acc = v;
                    }
                }
            }
            Op::RunningMaxAbs => {
                for (out, &v) in y.iter_mut().zip(x) {
                    let v = v.abs_value();
                    if v > acc {
                        acc = v;
                    }
                    *out = acc;
                }
            }
            Op::Square => {
                for out in y.iter_mut() {
                    *out = *out * *out;
                }
            }
            Op::CopyReduce => {
                for (out, &v) in y.iter_mut().zip(x) {
                    acc = acc + v;
                    *out = v;
                }
            }
        }

        acc
    }
}

impl<T: Element> Kernel<T> for Op {
    fn apply(&self, span: Span<'_, T>) -> T {
        self.run(span)
    }
}
