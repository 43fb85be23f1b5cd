//! Store-backed implementation of the matcher's catalog seam.

use async_trait::async_trait;
use benefits::{BrandPolicy, CatalogError, PolicyCatalog};

use crate::store::ZavviStore;

/// Adapts `ZavviStore` rows into the matcher's read-only catalog view.
#[derive(Clone)]
pub struct StoreCatalog {
    store: ZavviStore,
}

impl StoreCatalog {
    pub fn new(store: ZavviStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PolicyCatalog for StoreCatalog {
    async fn find_active_policies_by_brand_name_contains(
        &self,
        substring: &str,
    ) -> Result<Vec<BrandPolicy>, CatalogError> {
        let rows = self
            .store
            .find_active_policies_by_brand_contains(substring)
            .await;

        Ok(rows
            .into_iter()
            .map(|(brand, policy)| BrandPolicy {
                id: policy.id,
                brand_id: policy.brand_id,
                brand_name: brand.name,
                policy_type: policy.policy_type,
                title: policy.title,
                description: policy.description,
                duration: policy.duration,
                conditions: policy.conditions,
                process: policy.process,
                exclusions: policy.exclusions,
                is_active: policy.is_active,
            })
            .collect())
    }
}
