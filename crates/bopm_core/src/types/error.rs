//! Error types for request validation.

use thiserror::Error;

/// Validation errors for a single pricing request.
///
/// Requests are validated before they reach any execution backend; the
/// lattice kernel itself assumes validated inputs (see
/// [`lattice`](crate::lattice)).
///
/// # Examples
/// ```
/// use bopm_core::types::{OptionRequest, RequestError, MAX_TREE_HEIGHT};
///
/// let request = OptionRequest::new(1, 100.0, 100.0, 0.05, 0.3, 0.0, 0);
/// assert_eq!(
///     request.validate(MAX_TREE_HEIGHT),
///     Err(RequestError::TreeHeightOutOfRange { got: 0, max: MAX_TREE_HEIGHT })
/// );
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestError {
    /// Tree height outside the valid range `[1, max]`.
    #[error("tree height {got} outside valid range [1, {max}]")]
    TreeHeightOutOfRange {
        /// The tree height that was requested.
        got: u32,
        /// Maximum tree height accepted by the execution backends.
        max: u32,
    },

    /// Time to expiration must be positive.
    #[error("maturity must be positive")]
    ZeroMaturity,
}
