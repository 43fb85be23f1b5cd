//! Read-only seam to the brand policy catalog.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::BrandPolicy;

/// Catalog read failure. Callers treat this as transient-retryable; the
/// matcher surfaces it unmodified and never retries on its own.
#[derive(Debug, Error)]
#[error("brand policy catalog read failed: {message}")]
pub struct CatalogError {
    message: String,
}

impl CatalogError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The one query the matcher performs against reference data.
#[async_trait]
pub trait PolicyCatalog: Send + Sync {
    /// Return every active policy belonging to a brand whose canonical name
    /// contains `substring`, case-insensitively, in catalog iteration order.
    /// Multiple brands may match when their names overlap lexically; all of
    /// their policies are included.
    async fn find_active_policies_by_brand_name_contains(
        &self,
        substring: &str,
    ) -> Result<Vec<BrandPolicy>, CatalogError>;
}
