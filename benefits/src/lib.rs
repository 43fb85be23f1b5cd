//! Purchase-to-policy matching and benefit derivation.
//!
//! Given the facts of a newly recorded purchase, the matcher queries a brand
//! policy catalog and materializes derived warranty / return-policy records
//! with computed expiration dates. Persistence of the derived records belongs
//! to the caller; this crate performs the single catalog read and nothing else.

pub mod catalog;
pub mod matcher;
pub mod model;

pub use catalog::{CatalogError, PolicyCatalog};
pub use matcher::{match_purchase, MatchError};
pub use model::{
    BrandPolicy, DerivedReturnPolicy, DerivedWarranty, MatchOutcome, PolicyType, PurchaseFacts,
    RefundType, WarrantyType,
};
