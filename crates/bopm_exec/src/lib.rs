//! # bopm_exec: Batch Execution Layer for bopm-bench
//!
//! Turns sparse test specifications into dense request batches and runs
//! them on one of two backends with identical semantics:
//!
//! - [`executor`] runs the software path: a fixed pool of OS threads, each
//!   pricing a disjoint contiguous slice of the batch (rayon underneath,
//!   join barrier before results become visible).
//! - [`accel`] runs the accelerated path: a pool of compute units behind the
//!   [`accel::ComputeUnit`] trait, driven one request at a time per unit
//!   with explicit load / execute / retrieve sequencing. Vendor runtimes
//!   are external collaborators; an in-process [`accel::EmulatedUnit`]
//!   stands in for them.
//!
//! [`generator`] expands specifications and pads the batch to a multiple of
//! the effective lane count so either backend can partition it evenly.

pub mod accel;
pub mod executor;
pub mod generator;
