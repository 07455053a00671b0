//! Index-range parallel-for over row-major tables.
//!
//! ## Purpose
//!
//! Every per-target phase (neighbor query, coefficient solve, coordinate
//! gather, field application) writes exactly one row of an output table.
//! These helpers run a closure over each row, on the rayon pool when the
//! `parallel` feature is enabled and sequentially otherwise.
//!
//! ## Invariants
//!
//! * Closures receive the row index and an exclusive slice of that row only.
//! * Sequential and parallel execution produce identical tables.
//! * Rows are visited in unspecified order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::primitives::errors::MlsError;

/// Run `f(row, slice)` over every `row_len`-sized row of `data`.
pub fn for_each_row<T, F>(data: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, row)| f(i, row));

    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, row)| f(i, row));
}

/// Like [`for_each_row`], with one scratch value per worker built by `init`.
pub fn for_each_row_init<T, S, I, F>(data: &mut [T], row_len: usize, init: I, f: F)
where
    T: Send,
    I: Fn() -> S + Send + Sync,
    F: Fn(&mut S, usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each_init(init, |scratch, (i, row)| f(scratch, i, row));

    #[cfg(not(feature = "parallel"))]
    {
        let mut scratch = init();
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(i, row)| f(&mut scratch, i, row));
    }
}

/// Fallible [`for_each_row_init`]. Stops at the first error; which failing
/// row is reported is unspecified when several rows fail.
pub fn try_for_each_row_init<T, S, E, I, F>(
    data: &mut [T],
    row_len: usize,
    init: I,
    f: F,
) -> Result<(), E>
where
    T: Send,
    E: Send,
    I: Fn() -> S + Send + Sync,
    F: Fn(&mut S, usize, &mut [T]) -> Result<(), E> + Send + Sync,
{
    if row_len == 0 {
        return Ok(());
    }

    #[cfg(feature = "parallel")]
    {
        data.par_chunks_mut(row_len)
            .enumerate()
            .try_for_each_init(init, |scratch, (i, row)| f(scratch, i, row))
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut scratch = init();
        for (i, row) in data.chunks_mut(row_len).enumerate() {
            f(&mut scratch, i, row)?;
        }
        Ok(())
    }
}

/// Run `f` inside a dedicated pool of `threads` workers, or on the ambient
/// pool when `threads` is `None`.
pub fn install<R, F>(threads: Option<usize>, f: F) -> Result<R, MlsError>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match threads {
        None => Ok(f()),
        #[cfg(feature = "parallel")]
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| MlsError::ExecutionContext(e.to_string()))?;
            Ok(pool.install(f))
        }
        #[cfg(not(feature = "parallel"))]
        Some(_) => Ok(f()),
    }
}
