//! Reference data for the selection hierarchy.

use async_trait::async_trait;
use thiserror::Error;

/// Valid identifiers for every selection level, scoped to one maker (or
/// unscoped for the top-level catalog). Ordering is meaningful: the first
/// entry of each list is the default for its field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSet {
    pub makers: Vec<String>,
    pub models: Vec<String>,
    pub chassis_ids: Vec<String>,
    pub fuels: Vec<String>,
    pub colours: Vec<String>,
    pub years: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only metadata source for the selection hierarchy.
///
/// A failed fetch must never be turned into an empty catalog: callers keep
/// their last known-good `CatalogSet` and surface the error.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetches the catalog scoped to `maker`, or the top-level catalog when
    /// `maker` is `None`.
    async fn fetch_catalog(&self, maker: Option<&str>) -> Result<CatalogSet, CatalogError>;
}
