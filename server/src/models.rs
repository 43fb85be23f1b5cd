//! Persistent records and wire models for the Zavvi API.
//!
//! Every wire field is camelCase; timestamps are RFC 3339 UTC. Request bodies
//! mirror the shapes the web client already sends.

use benefits::{PolicyType, RefundType, WarrantyType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub title: String,
    pub description: String,
    pub brand: String,
    pub product_name: String,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_text: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_warranty: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_return_policy: Option<i64>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog entry owned by a brand; long-lived reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPolicyRecord {
    pub id: String,
    pub brand_id: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-purchase warranty record materialized at intake time. Never mutated
/// here after creation; expiry-state transitions belong to the alerting side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warranty {
    pub id: String,
    pub purchase_id: String,
    pub brand: String,
    pub duration: i64,
    #[serde(rename = "type")]
    pub warranty_type: WarrantyType,
    pub description: String,
    pub coverage: String,
    pub exclusions: String,
    pub claim_process: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPolicy {
    pub id: String,
    pub purchase_id: String,
    pub brand: String,
    pub duration: i64,
    pub conditions: String,
    pub process: String,
    pub refund_type: RefundType,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub original_price: f64,
    pub discounted_price: f64,
    pub discount_percentage: i64,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Request bodies

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    pub title: String,
    pub description: String,
    pub brand: String,
    pub product_name: String,
    pub purchase_price: f64,
    /// RFC 3339; parsed (and rejected) by the intake service, not serde, so
    /// a bad date reports the same validation error the matcher contract
    /// defines instead of a deserialization failure.
    pub purchase_date: String,
    #[serde(default)]
    pub receipt_image_url: Option<String>,
    #[serde(default)]
    pub receipt_text: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub store_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_warranty: Option<i64>,
    #[serde(default)]
    pub default_return_policy: Option<i64>,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandPolicyRequest {
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub process: Option<String>,
    #[serde(default)]
    pub exclusions: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrandBody {
    pub brand: CreateBrandRequest,
    #[serde(default)]
    pub policies: Vec<CreateBrandPolicyRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub title: String,
    pub description: String,
    pub original_price: f64,
    pub discounted_price: f64,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaitlistRequest {
    pub email: String,
    #[serde(default = "default_waitlist_source")]
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn default_true() -> bool {
    true
}

fn default_waitlist_source() -> String {
    "landing_page".to_string()
}

// ---------------------------------------------------------------------------
// Response shapes

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A purchase with its derived benefit records attached, as the dashboard
/// lists them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseWithBenefits {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub warranties: Vec<Warranty>,
    pub return_policies: Vec<ReturnPolicy>,
}

/// A brand with its active policies attached, as the brand directory lists
/// them.
#[derive(Debug, Clone, Serialize)]
pub struct BrandWithPolicies {
    #[serde(flatten)]
    pub brand: Brand,
    pub policies: Vec<BrandPolicyRecord>,
}

/// Minimal shape check; real deliverability is out of scope.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        _ => false,
    }
}
