//! Cox-Ross-Rubinstein binomial lattice for American puts.
//!
//! The kernel values an American put by backward induction over a
//! recombining binomial tree. Per step the underlying moves by a
//! multiplicative factor `up = exp(sigma * sqrt(dt))` or its reciprocal,
//! and the transition weights fold the single-step discount factor into the
//! risk-neutral probabilities:
//!
//! ```text
//! p0 = (up * exp(-q dt) - exp(-r dt)) / (up^2 - 1)
//! p1 = exp(-r dt) - p0
//! ```
//!
//! `p0 + p1 = exp(-r dt)`, so the recursion
//! `value = max(p0 * p[i+1] + p1 * p[i], K - S * up^(2i - j))`
//! discounts and applies the early-exercise floor in one pass; no separate
//! discounting sweep is needed.
//!
//! All functions use generic type parameter `F: num_traits::Float` for
//! f32/f64 support. The batch engine instantiates at `f32`, which is the
//! wire format of the accelerated backends; `f64` instantiations are useful
//! for precision cross-checks.
//!
//! References: Cox-Ross-Rubinstein (1979); Hull (11th ed.) Ch. 13.

use crate::types::OptionRequest;
use num_traits::Float;

/// Values an American put on a binomial lattice.
///
/// The scratch buffer is resized to `tree_height` and overwritten; passing
/// the same buffer across calls amortises the allocation when pricing a
/// batch. The logical contract is a scratch of length at least
/// `tree_height`, not any particular compile-time bound.
///
/// # Arguments
///
/// * `maturity` - Time to expiration in whole time units
/// * `spot` - Spot price of the underlying
/// * `strike` - Strike price
/// * `rate` - Continuously compounded risk-free rate
/// * `volatility` - Volatility of the underlying
/// * `dividend_yield` - Continuous dividend yield
/// * `tree_height` - Number of time steps, at least 1
/// * `scratch` - Reusable node-value buffer
///
/// # Preconditions
///
/// `tree_height >= 1` and `maturity >= 1`; both are enforced by
/// [`OptionRequest::validate`](crate::types::OptionRequest::validate) before
/// a request reaches any execution backend. A zero tree height would make
/// the time step `maturity / tree_height` degenerate and is rejected here
/// by a debug assertion.
///
/// # Examples
///
/// ```rust
/// use bopm_core::lattice::american_put;
///
/// let mut scratch = Vec::new();
/// let price: f32 = american_put(1, 100.0, 100.0, 0.05, 0.3, 0.01, 1000, &mut scratch);
/// assert!(price > 0.0);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn american_put<F: Float>(
    maturity: u32,
    spot: F,
    strike: F,
    rate: F,
    volatility: F,
    dividend_yield: F,
    tree_height: u32,
    scratch: &mut Vec<F>,
) -> F {
    debug_assert!(tree_height >= 1, "tree height must be at least 1");
    let n = tree_height as usize;

    let dt = F::from(maturity).unwrap() / F::from(tree_height).unwrap();
    let up = (volatility * dt.sqrt()).exp();
    let step_discount = (-rate * dt).exp();

    let p0 = (up * (-dividend_yield * dt).exp() - step_discount) / (up * up - F::one());
    let p1 = step_discount - p0;

    // Terminal layer: intrinsic put value at node i, i.e. after i up-moves
    // and n - i down-moves the underlying sits at S * up^(2i - n).
    scratch.clear();
    for i in 0..n {
        let intrinsic = strike - spot * up.powi(2 * i as i32 - n as i32);
        scratch.push(intrinsic.max(F::zero()));
    }

    // Backward induction with the early-exercise floor at every node. For a
    // tree of height 1 the loop is empty and the terminal node is the price.
    for j in (1..n).rev() {
        for i in 0..j {
            let continuation = p0 * scratch[i + 1] + p1 * scratch[i];
            let exercise = strike - spot * up.powi(2 * i as i32 - j as i32);
            scratch[i] = continuation.max(exercise);
        }
    }

    scratch[0]
}

/// Values a request with a caller-provided scratch buffer.
///
/// Used by the batch executors, where one buffer per worker is reused across
/// the worker's whole slice.
pub fn price_with_scratch(request: &OptionRequest, scratch: &mut Vec<f32>) -> f32 {
    american_put(
        request.maturity,
        request.spot,
        request.strike,
        request.rate,
        request.volatility,
        request.dividend_yield,
        request.tree_height,
        scratch,
    )
}

/// Values a single request, allocating its own scratch buffer.
pub fn price(request: &OptionRequest) -> f32 {
    let mut scratch = Vec::with_capacity(request.tree_height as usize);
    price_with_scratch(request, &mut scratch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn reference_request() -> OptionRequest {
        OptionRequest::new(1, 100.0, 100.0, 0.05, 0.3, 0.01, 1000)
    }

    #[test]
    fn test_single_step_closed_form() {
        // With one step there is no reduction loop: the price is the
        // intrinsic value at the single terminal node, max(K - S / up, 0)
        // with up computed from dt = T.
        let request = OptionRequest::new(1, 100.0, 105.0, 0.05, 0.3, 0.01, 1);
        let up = (0.3f32 * 1.0f32.sqrt()).exp();
        let expected = (105.0 - 100.0 / up).max(0.0);
        assert_relative_eq!(price(&request), expected, max_relative = 1e-6);
    }

    #[test]
    fn test_single_step_out_of_the_money_is_zero() {
        // K far below S / up: the terminal payoff clamps to zero.
        let request = OptionRequest::new(1, 100.0, 10.0, 0.05, 0.3, 0.01, 1);
        assert_eq!(price(&request), 0.0);
    }

    #[test]
    fn test_reference_scenario_price_band() {
        // T=1, S=100, K=100, r=0.05, sigma=0.3, q=0.01, n=1000. The
        // Black-Scholes European put for these inputs is ~9.73; the CRR
        // American value sits a little above it. The band is wide enough to
        // absorb single-precision accumulation, tight enough to catch any
        // algebra mistake in the transition weights.
        let value = price(&reference_request());
        assert!(
            value > 9.7 && value < 10.3,
            "reference American put priced at {}",
            value
        );
    }

    #[test]
    fn test_american_at_least_intrinsic() {
        // Early exercise is always available, so the value can never fall
        // below K - S.
        let request = OptionRequest::new(1, 80.0, 120.0, 0.05, 0.2, 0.0, 500);
        assert!(price(&request) >= 120.0 - 80.0);
    }

    #[test]
    fn test_convergence_in_tree_height() {
        // CRR discretisation error shrinks with n; n=1000 and n=2000 must
        // agree within the harness' own comparison tolerance.
        let coarse = price(&reference_request());
        let fine = price(&OptionRequest {
            tree_height: 2000,
            ..reference_request()
        });
        assert_relative_eq!(coarse, fine, max_relative = 2e-3);
    }

    #[test]
    fn test_f32_and_f64_agree() {
        let mut scratch32 = Vec::new();
        let mut scratch64 = Vec::new();
        let value32: f32 = american_put(1, 100.0, 100.0, 0.05, 0.3, 0.01, 1000, &mut scratch32);
        let value64: f64 = american_put(1, 100.0, 100.0, 0.05, 0.3, 0.01, 1000, &mut scratch64);
        assert_relative_eq!(f64::from(value32), value64, max_relative = 5e-3);
    }

    #[test]
    fn test_scratch_reuse_is_equivalent() {
        let mut scratch = Vec::new();
        let tall = OptionRequest::new(1, 100.0, 110.0, 0.05, 0.3, 0.01, 800);
        let short = OptionRequest::new(1, 100.0, 110.0, 0.05, 0.3, 0.01, 200);

        let first = price_with_scratch(&tall, &mut scratch);
        // Reusing a buffer previously sized for a taller tree must not leak
        // stale node values into the shorter valuation.
        let second = price_with_scratch(&short, &mut scratch);

        assert_eq!(first, price(&tall));
        assert_eq!(second, price(&short));
    }

    #[test]
    fn test_longer_maturity_worth_more() {
        let one_year = price(&OptionRequest::new(1, 100.0, 110.0, 0.02, 0.3, 0.0, 500));
        let three_years = price(&OptionRequest::new(3, 100.0, 110.0, 0.02, 0.3, 0.0, 500));
        // More time to exercise at a low rate: the option gains value.
        assert!(three_years > one_year);
    }

    proptest! {
        #[test]
        fn prop_non_decreasing_in_strike(
            strike_lo in 60.0f32..140.0,
            bump in 0.0f32..20.0,
        ) {
            let lower = price(&OptionRequest::new(1, 100.0, strike_lo, 0.05, 0.3, 0.01, 200));
            let higher = price(&OptionRequest::new(1, 100.0, strike_lo + bump, 0.05, 0.3, 0.01, 200));
            // A put with a higher strike is worth at least as much; allow
            // one ulp-scale slack for single-precision accumulation.
            prop_assert!(higher >= lower - 1e-4 * lower.abs().max(1.0));
        }

        #[test]
        fn prop_non_increasing_in_spot(
            spot_lo in 60.0f32..140.0,
            bump in 0.0f32..20.0,
        ) {
            let lower_spot = price(&OptionRequest::new(1, spot_lo, 100.0, 0.05, 0.3, 0.01, 200));
            let higher_spot = price(&OptionRequest::new(1, spot_lo + bump, 100.0, 0.05, 0.3, 0.01, 200));
            prop_assert!(higher_spot <= lower_spot + 1e-4 * lower_spot.abs().max(1.0));
        }
    }
}
