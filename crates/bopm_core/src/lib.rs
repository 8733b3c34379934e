//! # bopm_core: Lattice Kernel and Value Types for bopm-bench
//!
//! ## Foundation Layer Role
//!
//! bopm_core is the bottom layer of the workspace, providing:
//! - The Cox-Ross-Rubinstein American-put lattice kernel (`lattice`)
//! - Pricing request types and batch limits (`types`)
//! - Relative-error result validation (`validate`)
//! - Error types: `RequestError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! The foundation layer has no dependencies on other bopm_* crates, with
//! minimal external dependencies:
//! - num-traits: generic floating-point lattice kernel
//! - thiserror: structured error types
//! - serde: serialisation support (optional)
//!
//! Execution backends (thread pool, accelerator harness) live one layer up
//! in `bopm_exec`; this crate is purely computational and allocation-light.
//!
//! ## Usage Examples
//!
//! ```rust
//! use bopm_core::lattice;
//! use bopm_core::types::OptionRequest;
//!
//! let request = OptionRequest::new(1, 100.0, 110.0, 0.05, 0.3, 0.01, 500);
//! let price = lattice::price(&request);
//! assert!(price > 10.0); // deep in the money: at least intrinsic value
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialisation for `OptionRequest` and `Mismatch`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod lattice;
pub mod types;
pub mod validate;
