//! Single persistence backend for the application: one JSON document on disk
//! behind a read-write lock.
//!
//! Collections keep insertion order; queries filter and sort in memory. Every
//! mutation persists a full snapshot off the async runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use benefits::PolicyType;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{
    Brand, BrandPolicyRecord, ContactMessage, Deal, Purchase, ReturnPolicy, Warranty,
};

/// Signups carried over from the launched marketing page; a fresh store must
/// keep reporting a count continuous with it.
const WAITLIST_SEED_COUNT: u64 = 237;

#[derive(Debug, Clone)]
pub struct ZavviStore {
    path: PathBuf,
    state: Arc<RwLock<Db>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Db {
    #[serde(default)]
    purchases: Vec<Purchase>,
    #[serde(default)]
    brands: Vec<Brand>,
    #[serde(default)]
    policies: Vec<BrandPolicyRecord>,
    #[serde(default)]
    warranties: Vec<Warranty>,
    #[serde(default)]
    return_policies: Vec<ReturnPolicy>,
    #[serde(default)]
    deals: Vec<Deal>,
    #[serde(default = "Waitlist::seeded")]
    waitlist: Waitlist,
    #[serde(default)]
    contacts: Vec<ContactMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Waitlist {
    count: u64,
    emails: Vec<String>,
}

impl Waitlist {
    fn seeded() -> Self {
        Self {
            count: WAITLIST_SEED_COUNT,
            emails: Vec::new(),
        }
    }
}

impl Default for Waitlist {
    fn default() -> Self {
        Self::seeded()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseFilter {
    pub brand: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BrandFilter {
    pub search: Option<String>,
    pub verified_only: bool,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DealFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub limit: usize,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page_slice<T: Clone>(items: &[T], page: usize, limit: usize) -> Vec<T> {
    let page = page.max(1);
    let skip = (page - 1).saturating_mul(limit);
    items.iter().skip(skip).take(limit).cloned().collect()
}

/// Sort key matching the catalog's string ordering of the type column.
fn policy_type_key(policy_type: PolicyType) -> &'static str {
    match policy_type {
        PolicyType::Other => "other",
        PolicyType::PriceProtection => "price_protection",
        PolicyType::Return => "return",
        PolicyType::Warranty => "warranty",
    }
}

impl ZavviStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading store at {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| "parsing store JSON")?
        } else {
            Db::default()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    // -- purchases ----------------------------------------------------------

    pub async fn insert_purchase(&self, purchase: Purchase) -> Result<Purchase> {
        let mut guard = self.state.write().await;
        guard.purchases.push(purchase.clone());
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(purchase)
    }

    /// Filtered page of purchases, newest first, plus the filtered total.
    pub async fn list_purchases(&self, filter: &PurchaseFilter) -> (Vec<Purchase>, usize) {
        let guard = self.state.read().await;
        let mut purchases: Vec<Purchase> = guard
            .purchases
            .iter()
            .filter(|p| {
                if let Some(ref brand) = filter.brand {
                    if !contains_ci(&p.brand, brand) {
                        return false;
                    }
                }
                if let Some(ref search) = filter.search {
                    if !(contains_ci(&p.title, search)
                        || contains_ci(&p.description, search)
                        || contains_ci(&p.product_name, search))
                    {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        drop(guard);

        purchases.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = purchases.len();
        (page_slice(&purchases, filter.page, filter.limit), total)
    }

    // -- brands and policies ------------------------------------------------

    pub async fn insert_brand(&self, brand: Brand) -> Result<Brand> {
        let mut guard = self.state.write().await;
        guard.brands.push(brand.clone());
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(brand)
    }

    pub async fn insert_policy(&self, policy: BrandPolicyRecord) -> Result<BrandPolicyRecord> {
        let mut guard = self.state.write().await;
        guard.policies.push(policy.clone());
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(policy)
    }

    pub async fn brand_exists_by_slug(&self, slug: &str) -> bool {
        let guard = self.state.read().await;
        guard.brands.iter().any(|b| b.slug == slug)
    }

    /// Filtered page of brands, name ascending, plus the filtered total.
    pub async fn list_brands(&self, filter: &BrandFilter) -> (Vec<Brand>, usize) {
        let guard = self.state.read().await;
        let mut brands: Vec<Brand> = guard
            .brands
            .iter()
            .filter(|b| {
                if filter.verified_only && !b.is_verified {
                    return false;
                }
                if let Some(ref search) = filter.search {
                    let description_hit = b
                        .description
                        .as_deref()
                        .map(|d| contains_ci(d, search))
                        .unwrap_or(false);
                    if !(contains_ci(&b.name, search) || description_hit) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        drop(guard);

        brands.sort_by(|a, b| a.name.cmp(&b.name));
        let total = brands.len();
        (page_slice(&brands, filter.page, filter.limit), total)
    }

    /// Active policies for one brand, ordered by type the way the directory
    /// page shows them.
    pub async fn active_policies_for_brand(&self, brand_id: &str) -> Vec<BrandPolicyRecord> {
        let guard = self.state.read().await;
        let mut policies: Vec<BrandPolicyRecord> = guard
            .policies
            .iter()
            .filter(|p| p.brand_id == brand_id && p.is_active)
            .cloned()
            .collect();
        drop(guard);
        policies.sort_by_key(|p| policy_type_key(p.policy_type));
        policies
    }

    /// The catalog query behind purchase matching: every active policy of
    /// every brand whose canonical name contains `needle` case-insensitively,
    /// in catalog insertion order. Lexically overlapping brand names all
    /// match; there is no single-best-match selection.
    pub async fn find_active_policies_by_brand_contains(
        &self,
        needle: &str,
    ) -> Vec<(Brand, BrandPolicyRecord)> {
        let guard = self.state.read().await;
        let mut matches = Vec::new();
        for brand in guard
            .brands
            .iter()
            .filter(|b| contains_ci(&b.name, needle))
        {
            for policy in guard
                .policies
                .iter()
                .filter(|p| p.brand_id == brand.id && p.is_active)
            {
                matches.push((brand.clone(), policy.clone()));
            }
        }
        matches
    }

    // -- derived benefits ---------------------------------------------------

    pub async fn insert_warranty(&self, warranty: Warranty) -> Result<Warranty> {
        let mut guard = self.state.write().await;
        guard.warranties.push(warranty.clone());
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(warranty)
    }

    pub async fn insert_return_policy(&self, policy: ReturnPolicy) -> Result<ReturnPolicy> {
        let mut guard = self.state.write().await;
        guard.return_policies.push(policy.clone());
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(policy)
    }

    pub async fn warranties_for_purchase(&self, purchase_id: &str) -> Vec<Warranty> {
        let guard = self.state.read().await;
        guard
            .warranties
            .iter()
            .filter(|w| w.purchase_id == purchase_id)
            .cloned()
            .collect()
    }

    pub async fn return_policies_for_purchase(&self, purchase_id: &str) -> Vec<ReturnPolicy> {
        let guard = self.state.read().await;
        guard
            .return_policies
            .iter()
            .filter(|r| r.purchase_id == purchase_id)
            .cloned()
            .collect()
    }

    // -- deals ---------------------------------------------------------------

    pub async fn insert_deal(&self, deal: Deal) -> Result<Deal> {
        let mut guard = self.state.write().await;
        guard.deals.push(deal.clone());
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(deal)
    }

    /// Active deals, newest first, with category/search filters.
    pub async fn list_deals(&self, filter: &DealFilter) -> (Vec<Deal>, usize) {
        let guard = self.state.read().await;
        let mut deals: Vec<Deal> = guard
            .deals
            .iter()
            .filter(|d| {
                if !d.is_active {
                    return false;
                }
                if let Some(ref category) = filter.category {
                    if &d.category != category {
                        return false;
                    }
                }
                if let Some(ref search) = filter.search {
                    if !(contains_ci(&d.title, search) || contains_ci(&d.description, search)) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        drop(guard);

        deals.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        let total = deals.len();
        (page_slice(&deals, filter.page, filter.limit), total)
    }

    // -- waitlist ------------------------------------------------------------

    pub async fn waitlist_count(&self) -> u64 {
        let guard = self.state.read().await;
        guard.waitlist.count
    }

    pub async fn waitlist_contains(&self, email: &str) -> bool {
        let guard = self.state.read().await;
        guard.waitlist.emails.iter().any(|e| e == email)
    }

    /// Record a signup and return the new count.
    pub async fn push_waitlist(&self, email: &str) -> Result<u64> {
        let mut guard = self.state.write().await;
        guard.waitlist.emails.push(email.to_string());
        guard.waitlist.count += 1;
        let count = guard.waitlist.count;
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(count)
    }

    // -- contact -------------------------------------------------------------

    pub async fn insert_contact(&self, contact: ContactMessage) -> Result<ContactMessage> {
        let mut guard = self.state.write().await;
        guard.contacts.push(contact.clone());
        let snapshot = guard.clone();
        drop(guard);
        persist(&self.path, snapshot).await?;
        Ok(contact)
    }

    pub async fn list_contacts(&self) -> Vec<ContactMessage> {
        let guard = self.state.read().await;
        guard.contacts.clone()
    }
}

async fn persist(path: &Path, db: Db) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating store directory {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(&db).context("serializing store")?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing store to {}", path.display()))?;
        Ok::<(), anyhow::Error>(())
    })
    .await
    .context("joining store persistence task")??;

    Ok(())
}
