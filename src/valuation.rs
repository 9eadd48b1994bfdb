//! Valuation oracle abstraction.

use crate::selection::Selection;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuationError {
    /// Transport-level failure: no response was received at all.
    #[error("valuation oracle unreachable: {0}")]
    Unreachable(String),
    /// A response arrived but did not carry a usable price.
    #[error("invalid valuation response: {0}")]
    Invalid(String),
}

/// Single-point price estimator. Opaque and unreliable by contract; callers
/// must be prepared for either error class on every call.
#[async_trait]
pub trait ValuationProvider: Send + Sync {
    /// Predicts the auction price (in JPY) for `selection` as registered in
    /// `year`. Every other attribute of the selection is held fixed.
    async fn predict(&self, selection: &Selection, year: u16) -> Result<f64, ValuationError>;
}
