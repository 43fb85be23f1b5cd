//! Built-in brand catalog seed data and the routine that loads it.
//!
//! The catalog is reference data normally maintained by hand; this seed gives
//! a fresh deployment the brands people actually ask about.

use anyhow::Result;
use benefits::PolicyType;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::models::{Brand, BrandPolicyRecord};
use crate::store::ZavviStore;

pub struct SeedPolicy {
    pub policy_type: PolicyType,
    pub title: &'static str,
    pub description: &'static str,
    pub duration: Option<i64>,
    pub conditions: &'static str,
    pub process: &'static str,
    pub exclusions: &'static str,
}

pub struct SeedBrand {
    pub name: &'static str,
    pub slug: &'static str,
    pub website: &'static str,
    pub description: &'static str,
    pub default_warranty: Option<i64>,
    pub default_return_policy: Option<i64>,
    pub policies: &'static [SeedPolicy],
}

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub brands_created: usize,
    pub brands_skipped: usize,
    pub policies_created: usize,
}

pub const CATALOG: &[SeedBrand] = &[
    SeedBrand {
        name: "Costco",
        slug: "costco",
        website: "https://costco.com",
        description: "Warehouse club retailer known for excellent return policies",
        default_warranty: Some(365),
        default_return_policy: Some(999_999),
        policies: &[SeedPolicy {
            policy_type: PolicyType::Return,
            title: "Lifetime Return Policy",
            description: "Return most items at any time for a full refund, even without receipt",
            duration: Some(999_999),
            conditions: "Items must be in sellable condition. Electronics have 90-day return window.",
            process: "Bring item to any Costco warehouse with membership card",
            exclusions: "Electronics, jewelry, and some seasonal items",
        }],
    },
    SeedBrand {
        name: "Apple",
        slug: "apple",
        website: "https://apple.com",
        description: "Technology company known for premium products and customer service",
        default_warranty: Some(365),
        default_return_policy: Some(14),
        policies: &[
            SeedPolicy {
                policy_type: PolicyType::Warranty,
                title: "1-Year Limited Warranty",
                description: "Covers manufacturing defects and hardware failures",
                duration: Some(365),
                conditions: "Must be purchased from Apple or authorized retailer",
                process: "Contact Apple Support or visit Apple Store",
                exclusions: "Accidental damage, liquid damage, cosmetic damage",
            },
            SeedPolicy {
                policy_type: PolicyType::Return,
                title: "14-Day Return Policy",
                description: "Return most products within 14 days of purchase",
                duration: Some(14),
                conditions: "Product must be in original condition with packaging",
                process: "Return to Apple Store or contact Apple Support",
                exclusions: "Customized products, opened software",
            },
            SeedPolicy {
                policy_type: PolicyType::Other,
                title: "Free Charger Replacements",
                description: "Replace damaged Lightning cables and chargers for free",
                duration: Some(365),
                conditions: "Must be genuine Apple product",
                process: "Visit Apple Store with damaged cable",
                exclusions: "Third-party cables, intentional damage",
            },
        ],
    },
    SeedBrand {
        name: "Hoka",
        slug: "hoka",
        website: "https://hoka.com",
        description: "Running shoe brand known for comfort and durability",
        default_warranty: Some(365),
        default_return_policy: Some(30),
        policies: &[
            SeedPolicy {
                policy_type: PolicyType::Warranty,
                title: "1-Year Wear Warranty",
                description: "Replace shoes that wear out within one year, even from normal use",
                duration: Some(365),
                conditions: "Must be purchased from Hoka or authorized retailer",
                process: "Contact Hoka customer service with photos",
                exclusions: "Intentional damage, misuse, or abuse",
            },
            SeedPolicy {
                policy_type: PolicyType::Return,
                title: "30-Day Trial",
                description: "Return unworn shoes within 30 days",
                duration: Some(30),
                conditions: "Shoes must be unworn with original packaging",
                process: "Return to retailer or contact Hoka directly",
                exclusions: "Worn shoes, customized products",
            },
        ],
    },
    SeedBrand {
        name: "REI",
        slug: "rei",
        website: "https://rei.com",
        description: "Outdoor gear retailer with excellent return policies",
        default_warranty: Some(365),
        default_return_policy: Some(365),
        policies: &[SeedPolicy {
            policy_type: PolicyType::Return,
            title: "1-Year Return Policy",
            description: "Return any item within one year for any reason",
            duration: Some(365),
            conditions: "Item must be in sellable condition",
            process: "Return to any REI store or mail back",
            exclusions: "Items damaged by misuse or normal wear",
        }],
    },
    SeedBrand {
        name: "Patagonia",
        slug: "patagonia",
        website: "https://patagonia.com",
        description: "Outdoor clothing company with lifetime warranty",
        default_warranty: Some(999_999),
        default_return_policy: Some(30),
        policies: &[SeedPolicy {
            policy_type: PolicyType::Warranty,
            title: "Ironclad Guarantee",
            description: "Repair or replace any Patagonia product for its useful life",
            duration: Some(999_999),
            conditions: "Product must be repairable or replaceable",
            process: "Submit repair request online or visit store",
            exclusions: "Items damaged beyond repair",
        }],
    },
    SeedBrand {
        name: "LL Bean",
        slug: "ll-bean",
        website: "https://llbean.com",
        description: "Outdoor retailer with lifetime satisfaction guarantee",
        default_warranty: Some(999_999),
        default_return_policy: Some(365),
        policies: &[SeedPolicy {
            policy_type: PolicyType::Return,
            title: "Lifetime Satisfaction Guarantee",
            description: "Return any item at any time if not satisfied",
            duration: Some(999_999),
            conditions: "Must be LL Bean product",
            process: "Return to store or mail back",
            exclusions: "Items purchased from third parties",
        }],
    },
];

/// Load the built-in catalog into the store. Idempotent by slug: brands that
/// already exist are left alone, policies included.
pub async fn apply(store: &ZavviStore) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for seed in CATALOG {
        if store.brand_exists_by_slug(seed.slug).await {
            info!("Brand {} already seeded, skipping", seed.name);
            summary.brands_skipped += 1;
            continue;
        }

        let now = Utc::now();
        let brand = store
            .insert_brand(Brand {
                id: Uuid::new_v4().to_string(),
                name: seed.name.to_string(),
                slug: seed.slug.to_string(),
                logo_url: None,
                website: Some(seed.website.to_string()),
                description: Some(seed.description.to_string()),
                default_warranty: seed.default_warranty,
                default_return_policy: seed.default_return_policy,
                is_verified: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
        summary.brands_created += 1;

        for policy in seed.policies {
            store
                .insert_policy(BrandPolicyRecord {
                    id: Uuid::new_v4().to_string(),
                    brand_id: brand.id.clone(),
                    policy_type: policy.policy_type,
                    title: policy.title.to_string(),
                    description: policy.description.to_string(),
                    duration: policy.duration,
                    conditions: Some(policy.conditions.to_string()),
                    process: Some(policy.process.to_string()),
                    exclusions: Some(policy.exclusions.to_string()),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            summary.policies_created += 1;
        }

        info!(
            "Seeded brand {} with {} policies",
            seed.name,
            seed.policies.len()
        );
    }

    Ok(summary)
}
