//! Statically partitioned parallel batch execution.
//!
//! Requests in a batch are independent, so the executor's only job is even
//! load partitioning: the batch is split into one contiguous equal-length
//! slice per worker and each slice is priced with no synchronisation
//! between workers. Input is read-only, output regions are disjoint, and
//! the call returns only after every worker has finished; callers never
//! observe a partially written result vector.

use bopm_core::lattice;
use bopm_core::types::OptionRequest;
use rayon::prelude::*;
use std::ops::Range;
use thiserror::Error;

/// Errors from batch execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// Worker count must be positive.
    #[error("worker count must be positive")]
    ZeroWorkers,

    /// The batch cannot be split into equal contiguous slices.
    #[error("batch of {len} requests is not a multiple of {workers} workers")]
    UnevenPartition {
        /// Batch length.
        len: usize,
        /// Configured worker count.
        workers: usize,
    },
}

/// Splits `[0, len)` into `workers` contiguous equal ranges.
///
/// `len` must be a multiple of `workers`; the generator's padding
/// guarantees this for every expanded batch. The union of the returned
/// ranges covers `[0, len)` exactly once.
pub fn partition_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    debug_assert!(workers > 0 && len % workers == 0);
    let slice_len = len / workers;
    (0..workers)
        .map(|w| w * slice_len..(w + 1) * slice_len)
        .collect()
}

/// Prices a batch on a fixed pool of parallel workers.
///
/// The batch is partitioned per [`partition_ranges`] and every slice runs
/// independently; each worker reuses a single scratch buffer across its
/// slice. Results are gathered in input order.
///
/// # Errors
///
/// Fails if `workers` is zero or the batch length is not a multiple of
/// `workers`. An empty batch prices to an empty result vector.
pub fn price_batch(
    requests: &[OptionRequest],
    workers: usize,
) -> Result<Vec<f32>, ExecutorError> {
    if workers == 0 {
        return Err(ExecutorError::ZeroWorkers);
    }
    if requests.is_empty() {
        return Ok(Vec::new());
    }
    if requests.len() % workers != 0 {
        return Err(ExecutorError::UnevenPartition {
            len: requests.len(),
            workers,
        });
    }

    let slice_len = requests.len() / workers;
    let mut results = vec![0.0f32; requests.len()];

    // Disjoint write regions, one per worker; for_each joins before
    // returning, so the whole vector is complete when it becomes visible.
    requests
        .par_chunks(slice_len)
        .zip(results.par_chunks_mut(slice_len))
        .for_each(|(slice, out)| {
            let mut scratch = Vec::new();
            for (request, slot) in slice.iter().zip(out.iter_mut()) {
                *slot = lattice::price_with_scratch(request, &mut scratch);
            }
        });

    Ok(results)
}
