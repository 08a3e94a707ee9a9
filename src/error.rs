use crate::algorithm::KMeansResult;
use std::fmt::Debug;
use thiserror::Error;

/// Error types for the typedkmeans library
#[derive(Error, Debug)]
pub enum KMeansError<T: Debug> {
    /// The number of clusters is outside `1..=n_samples`
    #[error("Invalid cluster count: k = {k} for {n_samples} samples (expected 1 <= k <= n_samples)")]
    InvalidClusterCount { k: usize, n_samples: usize },

    /// No samples were provided
    #[error("Input contains no samples")]
    EmptyInput,

    /// The iteration cap was reached before a zero-change pass.
    ///
    /// Carries the centroids and labels of the last completed iteration.
    #[error("Did not converge within {} iterations", .0.n_iterations)]
    NonConvergence(Box<KMeansResult<T>>),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call train() or fit() first.")]
    NotFitted,
}

impl<T: Debug> KMeansError<T> {
    /// Partial result of a run that hit its iteration cap, if this is one.
    pub fn partial_result(&self) -> Option<&KMeansResult<T>> {
        match self {
            KMeansError::NonConvergence(result) => Some(result),
            _ => None,
        }
    }

    /// Consumes the error, returning the partial result of a capped run.
    pub fn into_partial_result(self) -> Option<KMeansResult<T>> {
        match self {
            KMeansError::NonConvergence(result) => Some(*result),
            _ => None,
        }
    }
}
