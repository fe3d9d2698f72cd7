use thiserror::Error;

/// Errors produced by the estimation contract.
///
/// Numerical degeneracy (rank deficient systems, points at infinity) is never reported here.
/// It shows up in the returned values instead, as large residuals or a near-zero homogeneous
/// coordinate, so that the scoring stage of the robust estimator can reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The solver does not implement the requested operation.
    #[error("{solver} does not support solving with weights")]
    UnsupportedOperation { solver: &'static str },
    /// The two sides of a correspondence set have a different number of bearings.
    #[error("mismatched correspondences: {left} bearings in the first view and {right} in the second")]
    MismatchedCorrespondences { left: usize, right: usize },
}
