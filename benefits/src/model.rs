use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback text used when a warranty policy carries no exclusions.
pub const WARRANTY_EXCLUSIONS_FALLBACK: &str = "See brand policy for details";
/// Fallback text used when a warranty policy carries no claim process.
pub const WARRANTY_CLAIM_PROCESS_FALLBACK: &str = "Contact brand directly";
/// Fallback text used when a return policy carries no conditions.
pub const RETURN_CONDITIONS_FALLBACK: &str = "Standard return conditions apply";
/// Fallback text used when a return policy carries no process.
pub const RETURN_PROCESS_FALLBACK: &str = "Return to store or contact brand";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    Warranty,
    Return,
    PriceProtection,
    Other,
}

impl PolicyType {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "warranty" => Some(PolicyType::Warranty),
            "return" => Some(PolicyType::Return),
            "price_protection" => Some(PolicyType::PriceProtection),
            "other" => Some(PolicyType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WarrantyType {
    Manufacturer,
    Extended,
    Accidental,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefundType {
    Full,
    StoreCredit,
    Exchange,
}

/// A catalog entry describing one benefit a brand offers. Read-only input to
/// the matcher; the catalog collaborator owns its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPolicy {
    pub id: String,
    pub brand_id: String,
    /// Canonical name of the owning brand, resolved by the catalog query.
    pub brand_name: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub title: String,
    pub description: String,
    /// Benefit duration in days. Duration-less policies are informational only
    /// and never produce a derived record.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub process: Option<String>,
    #[serde(default)]
    pub exclusions: Option<String>,
    pub is_active: bool,
}

/// The matcher's view of a purchase: the brand free-text field and the
/// purchase date are the only inputs it reads.
#[derive(Debug, Clone)]
pub struct PurchaseFacts {
    pub brand: String,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedWarranty {
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedReturnPolicy {
    pub brand: String,
    pub duration: i64,
    pub conditions: String,
    pub process: String,
    pub refund_type: RefundType,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Everything one match call produced. `matched_policy_count` counts the
/// policies the catalog returned, not the records derived from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub warranties: Vec<DerivedWarranty>,
    pub return_policies: Vec<DerivedReturnPolicy>,
    pub matched_policy_count: usize,
}
