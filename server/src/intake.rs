//! Purchase intake: validate, persist the purchase, then attach derived
//! benefits from the policy match.

use anyhow::Context;
use benefits::{match_purchase, MatchOutcome, PurchaseFacts};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::StoreCatalog;
use crate::models::{CreatePurchaseRequest, Purchase, ReturnPolicy, Warranty};
use crate::store::ZavviStore;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Everything one intake call produced, for the route layer to report.
#[derive(Debug, Clone)]
pub struct CreatedPurchase {
    pub purchase: Purchase,
    pub warranties: Vec<Warranty>,
    pub return_policies: Vec<ReturnPolicy>,
    pub matched_policy_count: usize,
}

#[derive(Clone)]
pub struct PurchaseService {
    store: ZavviStore,
    catalog: StoreCatalog,
}

impl PurchaseService {
    pub fn new(store: ZavviStore) -> Self {
        let catalog = StoreCatalog::new(store.clone());
        Self { store, catalog }
    }

    /// Create a purchase on behalf of `principal` (an opaque caller-supplied
    /// identity) and materialize warranty / return-policy records for every
    /// matching brand policy.
    ///
    /// The purchase stands even when the match fails: a catalog problem
    /// degrades to zero attached benefits instead of failing the request.
    pub async fn create_purchase(
        &self,
        principal: &str,
        request: CreatePurchaseRequest,
    ) -> Result<CreatedPurchase, IntakeError> {
        let purchase_date = validate(principal, &request)?;
        let now = Utc::now();

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            brand: request.brand.clone(),
            product_name: request.product_name.clone(),
            purchase_price: request.purchase_price,
            purchase_date,
            receipt_image_url: request.receipt_image_url.clone(),
            receipt_text: request.receipt_text.clone(),
            category: request.category.clone(),
            tags: request.tags.clone(),
            store_url: request.store_url.clone(),
            image_url: request.image_url.clone(),
            user_id: principal.to_string(),
            created_at: now,
            updated_at: now,
        };

        let purchase = self
            .store
            .insert_purchase(purchase)
            .await
            .context("persisting purchase")?;

        let facts = PurchaseFacts {
            brand: purchase.brand.clone(),
            purchase_date: purchase.purchase_date,
        };
        let outcome = match match_purchase(&self.catalog, &facts).await {
            Ok(outcome) => outcome,
            Err(err) => {
                // The purchase record persists regardless; only the derived
                // benefits attachment is skipped.
                warn!(
                    purchase_id = %purchase.id,
                    error = %err,
                    "policy match failed; creating purchase without benefits"
                );
                MatchOutcome::default()
            }
        };

        let mut warranties = Vec::with_capacity(outcome.warranties.len());
        for derived in outcome.warranties {
            let record = Warranty {
                id: Uuid::new_v4().to_string(),
                purchase_id: purchase.id.clone(),
                brand: derived.brand,
                duration: derived.duration,
                warranty_type: derived.warranty_type,
                description: derived.description,
                coverage: derived.coverage,
                exclusions: derived.exclusions,
                claim_process: derived.claim_process,
                expires_at: derived.expires_at,
                is_active: derived.is_active,
                user_id: principal.to_string(),
                created_at: now,
                updated_at: now,
            };
            warranties.push(
                self.store
                    .insert_warranty(record)
                    .await
                    .context("persisting derived warranty")?,
            );
        }

        let mut return_policies = Vec::with_capacity(outcome.return_policies.len());
        for derived in outcome.return_policies {
            let record = ReturnPolicy {
                id: Uuid::new_v4().to_string(),
                purchase_id: purchase.id.clone(),
                brand: derived.brand,
                duration: derived.duration,
                conditions: derived.conditions,
                process: derived.process,
                refund_type: derived.refund_type,
                expires_at: derived.expires_at,
                is_active: derived.is_active,
                user_id: principal.to_string(),
                created_at: now,
                updated_at: now,
            };
            return_policies.push(
                self.store
                    .insert_return_policy(record)
                    .await
                    .context("persisting derived return policy")?,
            );
        }

        info!(
            purchase_id = %purchase.id,
            brand = %purchase.brand,
            matched = outcome.matched_policy_count,
            warranties = warranties.len(),
            return_policies = return_policies.len(),
            "purchase created with brand policies applied"
        );

        Ok(CreatedPurchase {
            purchase,
            warranties,
            return_policies,
            matched_policy_count: outcome.matched_policy_count,
        })
    }
}

fn validate(
    principal: &str,
    request: &CreatePurchaseRequest,
) -> Result<DateTime<Utc>, IntakeError> {
    if principal.trim().is_empty() {
        return Err(IntakeError::Validation("Principal ID is required".into()));
    }
    if request.title.trim().is_empty() {
        return Err(IntakeError::Validation("Title is required".into()));
    }
    if request.description.trim().is_empty() {
        return Err(IntakeError::Validation("Description is required".into()));
    }
    if request.brand.trim().is_empty() {
        return Err(IntakeError::Validation("Brand is required".into()));
    }
    if request.product_name.trim().is_empty() {
        return Err(IntakeError::Validation("Product name is required".into()));
    }
    if request.purchase_price <= 0.0 {
        return Err(IntakeError::Validation(
            "Purchase price must be positive".into(),
        ));
    }
    if request.category.trim().is_empty() {
        return Err(IntakeError::Validation("Category is required".into()));
    }

    let purchase_date = DateTime::parse_from_rfc3339(&request.purchase_date)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            IntakeError::Validation("Purchase date must be an RFC 3339 timestamp".into())
        })?;

    Ok(purchase_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreatePurchaseRequest {
        serde_json::from_value(serde_json::json!({
            "title": "MacBook Air",
            "description": "Laptop for work",
            "brand": "Apple",
            "productName": "MacBook Air M3",
            "purchasePrice": 1299.0,
            "purchaseDate": "2024-06-01T00:00:00Z",
            "category": "electronics"
        }))
        .unwrap()
    }

    #[test]
    fn validate_accepts_a_well_formed_request() {
        let date = validate("user-1", &request()).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn validate_rejects_missing_principal() {
        let err = validate("  ", &request()).unwrap_err();
        assert!(matches!(err, IntakeError::Validation(ref m) if m == "Principal ID is required"));
    }

    #[test]
    fn validate_rejects_bad_dates_with_the_matcher_error_shape() {
        let mut bad = request();
        bad.purchase_date = "June 1st 2024".to_string();
        let err = validate("user-1", &bad).unwrap_err();
        assert!(matches!(err, IntakeError::Validation(_)));
    }

    #[test]
    fn validate_rejects_non_positive_prices() {
        let mut bad = request();
        bad.purchase_price = 0.0;
        let err = validate("user-1", &bad).unwrap_err();
        assert!(
            matches!(err, IntakeError::Validation(ref m) if m == "Purchase price must be positive")
        );
    }
}
