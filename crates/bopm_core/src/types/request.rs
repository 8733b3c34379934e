//! Pricing request type and batch limits.

use super::error::RequestError;

/// Maximum binomial-tree height accepted by any execution backend.
///
/// Accelerated backends plan on-chip scratch storage against this bound, so
/// it applies uniformly to the software path as well: a batch that prices
/// correctly in software must also fit the hardware variants.
pub const MAX_TREE_HEIGHT: u32 = 1024;

/// Maximum number of requests in a single batch, padding included.
pub const MAX_BATCH_SIZE: usize = 1024;

/// A single American-put pricing request.
///
/// Immutable once created: batches are generated once per run, read by every
/// worker, and each result slot is written exactly once by exactly one
/// worker. Fields are single precision because that is the wire format the
/// accelerated backends consume.
///
/// # Examples
///
/// ```rust
/// use bopm_core::types::{OptionRequest, MAX_TREE_HEIGHT};
///
/// let request = OptionRequest::new(1, 100.0, 100.0, 0.05, 0.3, 0.01, 1000);
/// assert!(request.validate(MAX_TREE_HEIGHT).is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionRequest {
    /// Time to expiration in whole time units (years in the sample data).
    pub maturity: u32,
    /// Spot price of the underlying.
    pub spot: f32,
    /// Strike price.
    pub strike: f32,
    /// Continuously compounded risk-free rate.
    pub rate: f32,
    /// Volatility of the underlying.
    pub volatility: f32,
    /// Continuous dividend yield.
    pub dividend_yield: f32,
    /// Number of time steps in the binomial tree.
    pub tree_height: u32,
}

impl OptionRequest {
    /// Creates a new pricing request.
    ///
    /// # Arguments
    ///
    /// * `maturity` - Time to expiration in whole time units
    /// * `spot` - Spot price of the underlying
    /// * `strike` - Strike price
    /// * `rate` - Continuously compounded risk-free rate
    /// * `volatility` - Volatility of the underlying
    /// * `dividend_yield` - Continuous dividend yield
    /// * `tree_height` - Number of time steps in the binomial tree
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        maturity: u32,
        spot: f32,
        strike: f32,
        rate: f32,
        volatility: f32,
        dividend_yield: f32,
        tree_height: u32,
    ) -> Self {
        Self {
            maturity,
            spot,
            strike,
            rate,
            volatility,
            dividend_yield,
            tree_height,
        }
    }

    /// Creates a padding request.
    ///
    /// Padding rows fill a batch up to a multiple of the lane count. All
    /// parameters are unit values and the tree height is the minimum, so a
    /// padding row costs one lattice step; its result is discarded by the
    /// caller and never enters validation.
    pub fn padding() -> Self {
        Self {
            maturity: 1,
            spot: 1.0,
            strike: 1.0,
            rate: 1.0,
            volatility: 1.0,
            dividend_yield: 1.0,
            tree_height: 1,
        }
    }

    /// Returns a copy of this request with a different strike.
    ///
    /// Batch expansion holds every field fixed except the strike, which
    /// steps linearly across repeats of a specification.
    pub fn with_strike(&self, strike: f32) -> Self {
        Self { strike, ..*self }
    }

    /// Validates the request against the backend limits.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if:
    /// - `tree_height` is 0 or greater than `max_tree_height`
    /// - `maturity` is 0 (the lattice step `T / n` would be degenerate)
    pub fn validate(&self, max_tree_height: u32) -> Result<(), RequestError> {
        if self.tree_height == 0 || self.tree_height > max_tree_height {
            return Err(RequestError::TreeHeightOutOfRange {
                got: self.tree_height,
                max: max_tree_height,
            });
        }
        if self.maturity == 0 {
            return Err(RequestError::ZeroMaturity);
        }
        Ok(())
    }
}
