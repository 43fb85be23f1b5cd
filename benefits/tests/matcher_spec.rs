//! Behavior tests for purchase-to-policy matching and benefit derivation.

use async_trait::async_trait;
use benefits::{
    match_purchase, BrandPolicy, CatalogError, MatchError, PolicyCatalog, PolicyType,
    PurchaseFacts, RefundType,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// In-memory catalog that applies the production containment rule: a brand
/// matches when its canonical name contains the needle, case-insensitively.
struct FakeCatalog {
    policies: Vec<BrandPolicy>,
    fail: bool,
}

impl FakeCatalog {
    fn new(policies: Vec<BrandPolicy>) -> Self {
        Self {
            policies,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            policies: vec![],
            fail: true,
        }
    }
}

#[async_trait]
impl PolicyCatalog for FakeCatalog {
    async fn find_active_policies_by_brand_name_contains(
        &self,
        substring: &str,
    ) -> Result<Vec<BrandPolicy>, CatalogError> {
        if self.fail {
            return Err(CatalogError::new("catalog unavailable"));
        }
        let needle = substring.to_lowercase();
        Ok(self
            .policies
            .iter()
            .filter(|p| p.is_active && p.brand_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

fn policy(
    brand_name: &str,
    policy_type: PolicyType,
    duration: Option<i64>,
) -> BrandPolicy {
    BrandPolicy {
        id: format!("policy-{}", brand_name.to_lowercase()),
        brand_id: format!("brand-{}", brand_name.to_lowercase()),
        brand_name: brand_name.to_string(),
        policy_type,
        title: format!("{brand_name} policy"),
        description: format!("{brand_name} benefit description"),
        duration,
        conditions: None,
        process: None,
        exclusions: None,
        is_active: true,
    }
}

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn purchase(brand: &str, purchase_date: DateTime<Utc>) -> PurchaseFacts {
    PurchaseFacts {
        brand: brand.to_string(),
        purchase_date,
    }
}

#[tokio::test]
async fn warranty_expiry_is_purchase_date_plus_duration_days() {
    let catalog = FakeCatalog::new(vec![policy("Apple", PolicyType::Warranty, Some(365))]);
    let outcome = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap();

    assert_eq!(outcome.matched_policy_count, 1);
    assert_eq!(outcome.warranties.len(), 1);
    let warranty = &outcome.warranties[0];
    assert_eq!(warranty.expires_at, date(2025, 6, 1));
    assert_eq!(warranty.duration, 365);
    assert_eq!(warranty.brand, "Apple");
    assert!(warranty.is_active);
}

#[tokio::test]
async fn matching_is_case_insensitive() {
    let catalog = FakeCatalog::new(vec![policy("Apple", PolicyType::Warranty, Some(365))]);
    let outcome = match_purchase(&catalog, &purchase("APPLE", date(2024, 6, 1)))
        .await
        .unwrap();
    assert_eq!(outcome.matched_policy_count, 1);
    assert_eq!(outcome.warranties.len(), 1);
}

#[tokio::test]
async fn lexically_overlapping_brands_all_match() {
    // The containment rule is deliberately loose: "Snapple" contains "apple".
    let catalog = FakeCatalog::new(vec![
        policy("Apple", PolicyType::Warranty, Some(365)),
        policy("Snapple", PolicyType::Return, Some(30)),
    ]);
    let outcome = match_purchase(&catalog, &purchase("apple", date(2024, 6, 1)))
        .await
        .unwrap();
    assert_eq!(outcome.matched_policy_count, 2);
    assert_eq!(outcome.warranties.len(), 1);
    assert_eq!(outcome.return_policies.len(), 1);
}

#[tokio::test]
async fn long_lived_return_policy_keeps_exact_day_arithmetic() {
    let catalog = FakeCatalog::new(vec![policy("Costco", PolicyType::Return, Some(999_999))]);
    let purchased = date(2024, 1, 1);
    let outcome = match_purchase(&catalog, &purchase("Costco", purchased))
        .await
        .unwrap();

    assert_eq!(outcome.return_policies.len(), 1);
    let ret = &outcome.return_policies[0];
    assert_eq!(ret.expires_at, purchased + Duration::days(999_999));
    assert_eq!(ret.refund_type, RefundType::Full);
}

#[tokio::test]
async fn duration_less_policies_derive_nothing_regardless_of_type() {
    let catalog = FakeCatalog::new(vec![
        policy("Apple", PolicyType::Warranty, None),
        policy("Apple", PolicyType::Return, None),
    ]);
    let outcome = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap();

    // Both policies matched, neither produced a record.
    assert_eq!(outcome.matched_policy_count, 2);
    assert!(outcome.warranties.is_empty());
    assert!(outcome.return_policies.is_empty());
}

#[tokio::test]
async fn price_protection_and_other_policies_derive_nothing() {
    let catalog = FakeCatalog::new(vec![
        policy("Apple", PolicyType::PriceProtection, Some(30)),
        policy("Apple", PolicyType::Other, Some(365)),
    ]);
    let outcome = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap();

    assert_eq!(outcome.matched_policy_count, 2);
    assert!(outcome.warranties.is_empty());
    assert!(outcome.return_policies.is_empty());
}

#[tokio::test]
async fn missing_policy_fields_fall_back_to_documented_literals() {
    let catalog = FakeCatalog::new(vec![
        policy("Hoka", PolicyType::Warranty, Some(365)),
        policy("Hoka", PolicyType::Return, Some(30)),
    ]);
    let outcome = match_purchase(&catalog, &purchase("Hoka", date(2024, 3, 15)))
        .await
        .unwrap();

    let warranty = &outcome.warranties[0];
    assert_eq!(warranty.exclusions, "See brand policy for details");
    assert_eq!(warranty.claim_process, "Contact brand directly");

    let ret = &outcome.return_policies[0];
    assert_eq!(ret.conditions, "Standard return conditions apply");
    assert_eq!(ret.process, "Return to store or contact brand");
}

#[tokio::test]
async fn populated_policy_fields_are_copied_verbatim() {
    let mut warranty_policy = policy("Apple", PolicyType::Warranty, Some(365));
    warranty_policy.exclusions = Some("Accidental damage, liquid damage".to_string());
    warranty_policy.process = Some("Contact Apple Support".to_string());
    let catalog = FakeCatalog::new(vec![warranty_policy]);

    let outcome = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap();
    let warranty = &outcome.warranties[0];
    assert_eq!(warranty.exclusions, "Accidental damage, liquid damage");
    assert_eq!(warranty.claim_process, "Contact Apple Support");
    assert_eq!(warranty.description, "Apple benefit description");
    assert_eq!(warranty.coverage, warranty.description);
}

#[tokio::test]
async fn derived_records_preserve_catalog_iteration_order() {
    let mut first = policy("Apple", PolicyType::Warranty, Some(365));
    first.id = "p1".to_string();
    let mut second = policy("Apple", PolicyType::Warranty, Some(90));
    second.id = "p2".to_string();
    let catalog = FakeCatalog::new(vec![first, second]);

    let outcome = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap();
    assert_eq!(outcome.warranties.len(), 2);
    assert_eq!(outcome.warranties[0].duration, 365);
    assert_eq!(outcome.warranties[1].duration, 90);
}

#[tokio::test]
async fn inactive_policies_are_filtered_by_the_catalog_query() {
    let mut inactive = policy("Apple", PolicyType::Warranty, Some(365));
    inactive.is_active = false;
    let catalog = FakeCatalog::new(vec![inactive]);

    let outcome = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap();
    assert_eq!(outcome.matched_policy_count, 0);
    assert!(outcome.warranties.is_empty());
}

#[tokio::test]
async fn catalog_failure_aborts_with_lookup_error_and_no_partial_result() {
    let catalog = FakeCatalog::failing();
    let err = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, MatchError::Lookup(_)));
}

#[tokio::test]
async fn mixed_policy_set_counts_all_matches_but_derives_selectively() {
    // Apple's real catalog shape: warranty + return + an "other" perk.
    let mut perk = policy("Apple", PolicyType::Other, Some(365));
    perk.title = "Free Charger Replacements".to_string();
    let catalog = FakeCatalog::new(vec![
        policy("Apple", PolicyType::Warranty, Some(365)),
        policy("Apple", PolicyType::Return, Some(14)),
        perk,
    ]);

    let outcome = match_purchase(&catalog, &purchase("Apple", date(2024, 6, 1)))
        .await
        .unwrap();
    assert_eq!(outcome.matched_policy_count, 3);
    assert_eq!(outcome.warranties.len(), 1);
    assert_eq!(outcome.return_policies.len(), 1);
    assert_eq!(outcome.return_policies[0].expires_at, date(2024, 6, 15));
}
