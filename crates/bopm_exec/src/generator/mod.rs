//! Expansion of sparse batch specifications into dense request lists.
//!
//! A specification row describes a family of requests: a base request, a
//! strike-price increment and a repeat count. Expansion preserves specification
//! order, steps the strike linearly within each row, and pads the batch up
//! to the next multiple of the lane count with trivial requests whose
//! results the caller discards.

use bopm_core::types::OptionRequest;
use thiserror::Error;

/// One row of the test-batch table.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchSpec {
    /// Display label for the row (company name in the sample data).
    pub label: String,
    /// Base request; every generated request copies its fields.
    pub base: OptionRequest,
    /// Strike increment applied per repeat.
    pub strike_step: f32,
    /// Number of requests this row expands to.
    pub repeats: u32,
}

impl BatchSpec {
    /// Creates a specification row.
    pub fn new(label: impl Into<String>, base: OptionRequest, strike_step: f32, repeats: u32) -> Self {
        Self {
            label: label.into(),
            base,
            strike_step,
            repeats,
        }
    }
}

/// Errors from batch expansion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// No specification rows were provided.
    #[error("no batch specifications were provided")]
    Empty,

    /// Lane count must be positive to round the batch size.
    #[error("lane count must be positive")]
    ZeroLanes,

    /// A specification row expands to zero requests.
    #[error("specification '{label}' repeats zero requests")]
    ZeroRepeats {
        /// Label of the offending row.
        label: String,
    },

    /// The defined batch exceeds the configured maximum.
    #[error("batch of {got} requests exceeds the maximum of {max}")]
    TooLarge {
        /// Total defined request count.
        got: usize,
        /// Configured maximum batch size.
        max: usize,
    },

    /// The batch fits but its padded size does not.
    #[error("batch rounded to {rounded} requests for {lanes} lanes exceeds the maximum of {max}")]
    RoundedTooLarge {
        /// Batch size after rounding up to the lane count.
        rounded: usize,
        /// Lane count used for rounding.
        lanes: usize,
        /// Configured maximum batch size.
        max: usize,
    },
}

/// A dense, padded request batch.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    /// All requests: the specification expansion followed by padding rows.
    pub requests: Vec<OptionRequest>,
    /// Number of leading specification-derived requests; everything past this index
    /// is padding and its results must not be read or validated.
    pub defined: usize,
}

impl Batch {
    /// Number of trailing padding requests.
    #[inline]
    pub fn padding(&self) -> usize {
        self.requests.len() - self.defined
    }
}

/// Rounds `defined` up to the smallest multiple of `lanes`.
#[inline]
pub fn round_up_to_lanes(defined: usize, lanes: usize) -> usize {
    defined.div_ceil(lanes) * lanes
}

/// Expands specification rows into a dense batch padded for `lanes` workers.
///
/// The first `sum(repeats)` requests are the expansion in specification order; within
/// a row the strike increases by `strike_step` per repeat. The remainder up
/// to the next multiple of `lanes` is filled with
/// [`OptionRequest::padding`] rows.
///
/// # Errors
///
/// Fails without expanding anything if the specification list is empty, any row has
/// zero repeats, `lanes` is zero, or the defined or rounded size exceeds
/// `max_batch`.
pub fn expand_specs(
    specs: &[BatchSpec],
    lanes: usize,
    max_batch: usize,
) -> Result<Batch, BatchError> {
    if specs.is_empty() {
        return Err(BatchError::Empty);
    }
    if lanes == 0 {
        return Err(BatchError::ZeroLanes);
    }

    let mut defined: usize = 0;
    for spec in specs {
        if spec.repeats == 0 {
            return Err(BatchError::ZeroRepeats {
                label: spec.label.clone(),
            });
        }
        defined += spec.repeats as usize;
    }

    if defined > max_batch {
        return Err(BatchError::TooLarge {
            got: defined,
            max: max_batch,
        });
    }

    let rounded = round_up_to_lanes(defined, lanes);
    if rounded > max_batch {
        return Err(BatchError::RoundedTooLarge {
            rounded,
            lanes,
            max: max_batch,
        });
    }

    let mut requests = Vec::with_capacity(rounded);
    for spec in specs {
        for k in 0..spec.repeats {
            let strike = spec.base.strike + spec.strike_step * k as f32;
            requests.push(spec.base.with_strike(strike));
        }
    }
    requests.resize(rounded, OptionRequest::padding());

    Ok(Batch { requests, defined })
}
