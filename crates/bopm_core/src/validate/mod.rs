//! Relative-error comparison of two result vectors.
//!
//! When a batch is priced by two execution paths (software reference and an
//! accelerated backend), the two result vectors are compared entry by entry
//! with a relative tolerance. Only the defined, specification-derived prefix of the
//! vectors is compared; padding results are excluded by slicing the compared
//! range, not by filtering.

/// Relative tolerance below which two prices are considered equal.
pub const REL_TOLERANCE: f32 = 1e-3;

/// A single divergence between the reference and candidate vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mismatch {
    /// Index of the diverging result.
    pub index: usize,
    /// Reference value at that index.
    pub expected: f32,
    /// Candidate value at that index.
    pub actual: f32,
}

/// Outcome of comparing two result vectors.
///
/// `mismatches` counts every divergence; `samples` retains at most the
/// requested number of examples for reporting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Comparison {
    /// Total number of entries exceeding the tolerance.
    pub mismatches: usize,
    /// Bounded list of example mismatches, in index order.
    pub samples: Vec<Mismatch>,
}

impl Comparison {
    /// Returns true when no entry exceeded the tolerance.
    #[inline]
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }
}

/// Returns true when two values agree within [`REL_TOLERANCE`].
///
/// The test is `|a - b| / max(a, b) <= REL_TOLERANCE` with an unguarded
/// denominator. For option prices, which are positive for every
/// non-degenerate request, this is well defined. When both inputs are
/// non-positive, or the larger one is zero, the quotient is meaningless or
/// NaN and the pair reports as a mismatch; intended behaviour for such
/// inputs is unspecified, and callers must guard against them rather than
/// rely on this function. A symmetric test such as
/// `|a - b| <= tol * max(|a|, |b|, eps)` would remove the hazard but would
/// change which borderline pairs pass, so it is not silently substituted.
#[inline]
pub fn relative_match(a: f32, b: f32) -> bool {
    ((a - b) / a.max(b)).abs() <= REL_TOLERANCE
}

/// Compares the first `count` entries of two result vectors.
///
/// # Arguments
///
/// * `expected` - Reference results (software path)
/// * `actual` - Candidate results (accelerated path)
/// * `count` - Number of leading entries to compare; both slices must be at
///   least this long. Callers pass the defined batch size so that padding
///   results never enter the comparison.
/// * `max_reports` - Maximum number of example mismatches to retain
///
/// # Examples
///
/// ```rust
/// use bopm_core::validate::compare_results;
///
/// let comparison = compare_results(&[1.0, 2.0], &[1.0005, 2.5], 2, 5);
/// assert_eq!(comparison.mismatches, 1);
/// assert_eq!(comparison.samples[0].index, 1);
/// ```
pub fn compare_results(
    expected: &[f32],
    actual: &[f32],
    count: usize,
    max_reports: usize,
) -> Comparison {
    let mut comparison = Comparison::default();

    for (index, (&reference, &candidate)) in
        expected.iter().zip(actual.iter()).take(count).enumerate()
    {
        if !relative_match(reference, candidate) {
            comparison.mismatches += 1;
            if comparison.samples.len() < max_reports {
                comparison.samples.push(Mismatch {
                    index,
                    expected: reference,
                    actual: candidate,
                });
            }
        }
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_pass() {
        let results = [9.87f32, 0.5, 123.0];
        let comparison = compare_results(&results, &results, results.len(), 5);
        assert!(comparison.passed());
        assert!(comparison.samples.is_empty());
    }

    #[test]
    fn test_single_mismatch_reported() {
        let comparison = compare_results(&[1.0, 2.0], &[1.0005, 2.5], 2, 5);
        assert_eq!(comparison.mismatches, 1);
        assert_eq!(
            comparison.samples,
            vec![Mismatch {
                index: 1,
                expected: 2.0,
                actual: 2.5
            }]
        );
    }

    #[test]
    fn test_tolerance_boundary() {
        // 0.1% of 1000 is exactly 1.0: inside the tolerance.
        assert!(relative_match(1000.0, 999.0));
        // 0.2% is out.
        assert!(!relative_match(1000.0, 998.0));
    }

    #[test]
    fn test_padding_excluded_by_count() {
        // The trailing entry diverges wildly but sits past the compared
        // range, as padding results do.
        let comparison = compare_results(&[1.0, 2.0, 0.0], &[1.0, 2.0, 42.0], 2, 5);
        assert!(comparison.passed());
    }

    #[test]
    fn test_sample_list_is_bounded() {
        let expected = vec![1.0f32; 10];
        let actual = vec![2.0f32; 10];
        let comparison = compare_results(&expected, &actual, 10, 3);
        assert_eq!(comparison.mismatches, 10);
        assert_eq!(comparison.samples.len(), 3);
        assert_eq!(comparison.samples[2].index, 2);
    }

    #[test]
    fn test_zero_pair_counts_as_mismatch() {
        // 0/0 is NaN, which fails the tolerance test. Callers comparing
        // possibly-zero values must guard before calling.
        assert!(!relative_match(0.0, 0.0));
    }

    #[test]
    fn test_zero_max_reports_keeps_count() {
        let comparison = compare_results(&[1.0, 1.0], &[2.0, 2.0], 2, 0);
        assert_eq!(comparison.mismatches, 2);
        assert!(comparison.samples.is_empty());
    }
}
