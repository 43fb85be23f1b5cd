//! The matching routine: one catalog read, then a bounded in-memory transform.

use chrono::Duration;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{CatalogError, PolicyCatalog};
use crate::model::{
    DerivedReturnPolicy, DerivedWarranty, MatchOutcome, PolicyType, PurchaseFacts, RefundType,
    WarrantyType, RETURN_CONDITIONS_FALLBACK, RETURN_PROCESS_FALLBACK,
    WARRANTY_CLAIM_PROCESS_FALLBACK, WARRANTY_EXCLUSIONS_FALLBACK,
};

#[derive(Debug, Error)]
pub enum MatchError {
    /// Bad input shape: empty brand, or an unparseable purchase date rejected
    /// by the intake layer before a `PurchaseFacts` exists.
    #[error("invalid purchase input: {0}")]
    Validation(String),
    /// The catalog read failed; the whole operation aborts with no partial
    /// derivation.
    #[error(transparent)]
    Lookup(#[from] CatalogError),
}

/// Match a purchase against the brand policy catalog and derive benefit
/// records.
///
/// Matching is a plain case-insensitive containment filter (catalog brand
/// name contains the purchase's brand string), not a ranked match. A brand
/// absent from the catalog is a valid zero-match outcome, not an error. The
/// derived records are returned for the caller to persist; this function has
/// no side effects beyond the catalog read.
pub async fn match_purchase(
    catalog: &dyn PolicyCatalog,
    purchase: &PurchaseFacts,
) -> Result<MatchOutcome, MatchError> {
    let brand = purchase.brand.trim();
    if brand.is_empty() {
        return Err(MatchError::Validation("Brand is required".to_string()));
    }

    let policies = catalog
        .find_active_policies_by_brand_name_contains(brand)
        .await?;
    debug!(
        brand = %brand,
        matched = policies.len(),
        "matched brand policies for purchase"
    );

    let mut outcome = MatchOutcome {
        matched_policy_count: policies.len(),
        ..MatchOutcome::default()
    };

    for policy in &policies {
        // Duration-less policies are informational only.
        let days = match policy.duration {
            Some(d) => d,
            None => continue,
        };
        let expires_at = purchase.purchase_date + Duration::days(days);

        match policy.policy_type {
            PolicyType::Warranty => outcome.warranties.push(DerivedWarranty {
                brand: purchase.brand.clone(),
                duration: days,
                warranty_type: WarrantyType::Manufacturer,
                description: policy.description.clone(),
                coverage: policy.description.clone(),
                exclusions: policy
                    .exclusions
                    .clone()
                    .unwrap_or_else(|| WARRANTY_EXCLUSIONS_FALLBACK.to_string()),
                claim_process: policy
                    .process
                    .clone()
                    .unwrap_or_else(|| WARRANTY_CLAIM_PROCESS_FALLBACK.to_string()),
                expires_at,
                is_active: true,
            }),
            PolicyType::Return => outcome.return_policies.push(DerivedReturnPolicy {
                brand: purchase.brand.clone(),
                duration: days,
                conditions: policy
                    .conditions
                    .clone()
                    .unwrap_or_else(|| RETURN_CONDITIONS_FALLBACK.to_string()),
                process: policy
                    .process
                    .clone()
                    .unwrap_or_else(|| RETURN_PROCESS_FALLBACK.to_string()),
                refund_type: RefundType::Full,
                expires_at,
                is_active: true,
            }),
            PolicyType::PriceProtection | PolicyType::Other => {}
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct EmptyCatalog;

    #[async_trait::async_trait]
    impl PolicyCatalog for EmptyCatalog {
        async fn find_active_policies_by_brand_name_contains(
            &self,
            _substring: &str,
        ) -> Result<Vec<crate::model::BrandPolicy>, CatalogError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn empty_brand_is_rejected_before_the_catalog_read() {
        let purchase = PurchaseFacts {
            brand: "   ".to_string(),
            purchase_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let err = match_purchase(&EmptyCatalog, &purchase).await.unwrap_err();
        assert!(matches!(err, MatchError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_brand_yields_zero_matches_not_an_error() {
        let purchase = PurchaseFacts {
            brand: "Unknown Co".to_string(),
            purchase_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let outcome = match_purchase(&EmptyCatalog, &purchase).await.unwrap();
        assert_eq!(outcome.matched_policy_count, 0);
        assert!(outcome.warranties.is_empty());
        assert!(outcome.return_policies.is_empty());
    }
}
