use clap::ValueEnum;
use rand::Rng;

use crate::error::{Error, Result};
use crate::kernel::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FillMode {
    /// Pseudo-random values in [0, 1)
    #[default]
    Random,
    /// All zeros
    Zero,
}

/// The pair of buffers one trial operates on.
#[derive(Debug)]
pub struct Workload<T> {
    pub y: Vec<T>,
    pub x: Vec<T>,
}

impl<T: Element> Workload<T> {
    /// Allocates and fills both buffers, touching every element.
    pub fn prepare<R: Rng + ?Sized>(size: usize, fill: FillMode, rng: &mut R) -> Result<Self> {
        let mut y = allocate(size)?;
        let mut x = allocate(size)?;

        if fill == FillMode::Random {
            fill_random(&mut y, size, 1, rng)?;
            fill_random(&mut x, size, 1, rng)?;
        }

        Ok(Self { y, x })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn buffers(&mut self) -> (&mut [T], &[T]) {
        (self.y.as_mut_slice(), self.x.as_slice())
    }
}

/// Zero-initialised buffer; an allocation failure is reported instead of aborting.
pub fn allocate<T: Element>(size: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| Error::Allocation { size })?;
    buffer.resize(size, T::zero());
    Ok(buffer)
}

/// Fills a `rows` x `cols` row-major region with `rand(0..i32::MAX) / i32::MAX`.
///
/// Integer element types truncate these values to zero.
pub fn fill_random<T, R>(buffer: &mut [T], rows: usize, cols: usize, rng: &mut R) -> Result<()>
where
    T: Element,
    R: Rng + ?Sized,
{
    let len = rows
        .checked_mul(cols)
        .filter(|&n| n <= buffer.len())
        .ok_or(Error::FillShape {
            rows,
            cols,
            len: buffer.len(),
        })?;

    let scale = f64::from(i32::MAX);
    for slot in &mut buffer[..len] {
        let value = f64::from(rng.gen_range(0..i32::MAX)) / scale;
        *slot = <T as num_traits::NumCast>::from(value).unwrap_or_else(T::zero);
    }

    Ok(())
}
