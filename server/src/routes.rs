//! HTTP route handlers for the Zavvi API
//!
//! Every response uses the `{success, data, error, message}` envelope; list
//! endpoints add a `pagination` block. The principal on record-creating
//! endpoints is an opaque ID supplied in the `X-Principal-Id` header.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::intake::IntakeError;
use crate::models::{
    is_valid_email, Brand, BrandPolicyRecord, BrandWithPolicies, ContactMessage, ContactRequest,
    CreateBrandBody, CreateDealRequest, CreatePurchaseRequest, Deal, Pagination,
    PurchaseWithBenefits, WaitlistRequest,
};
use crate::store::{BrandFilter, DealFilter, PurchaseFilter};
use crate::{AppError, AppResult, AppState};

pub const PRINCIPAL_HEADER: &str = "x-principal-id";

fn principal_from(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::bad_request("Principal ID is required"))
}

// ---------------------------------------------------------------------------
// Purchases

#[derive(Deserialize, Debug, Clone)]
pub struct ListPurchasesQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub brand: Option<String>,
    pub search: Option<String>,
}

/// POST /api/purchases - record a purchase and attach derived benefits
pub async fn create_purchase(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePurchaseRequest>,
) -> AppResult<Json<Value>> {
    debug!("Handling POST /api/purchases");
    let principal = principal_from(&headers)?;

    match state.purchases.create_purchase(&principal, request).await {
        Ok(created) => {
            info!(
                "Created purchase {} with {} matched policies",
                created.purchase.id, created.matched_policy_count
            );
            Ok(Json(json!({
                "success": true,
                "data": {
                    "purchase": created.purchase,
                    "warranties": created.warranties,
                    "returnPolicies": created.return_policies,
                    "brandPolicies": created.matched_policy_count,
                },
                "message": "Purchase created successfully with brand policies applied",
            })))
        }
        Err(IntakeError::Validation(message)) => Err(AppError::bad_request(message)),
        Err(IntakeError::Internal(err)) => {
            error!("Failed to create purchase: {}", err);
            Err(AppError::internal("Internal server error"))
        }
    }
}

/// GET /api/purchases - filtered, paginated purchase history
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<ListPurchasesQuery>,
) -> AppResult<Json<Value>> {
    debug!("Handling GET /api/purchases: {:?}", query);

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10);
    let filter = PurchaseFilter {
        brand: query.brand,
        search: query.search,
        page,
        limit,
    };

    let (purchases, total) = state.store.list_purchases(&filter).await;

    let mut data = Vec::with_capacity(purchases.len());
    for purchase in purchases {
        let warranties = state.store.warranties_for_purchase(&purchase.id).await;
        let return_policies = state.store.return_policies_for_purchase(&purchase.id).await;
        data.push(PurchaseWithBenefits {
            purchase,
            warranties,
            return_policies,
        });
    }

    info!("Listed {} of {} purchases", data.len(), total);
    Ok(Json(json!({
        "success": true,
        "data": data,
        "pagination": Pagination::new(page, limit, total),
    })))
}

// ---------------------------------------------------------------------------
// Brands

#[derive(Deserialize, Debug, Clone)]
pub struct ListBrandsQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub verified: Option<String>,
}

/// POST /api/brands - create a brand and any nested policies
pub async fn create_brand(
    State(state): State<AppState>,
    Json(body): Json<CreateBrandBody>,
) -> AppResult<Json<Value>> {
    debug!("Handling POST /api/brands");

    let request = body.brand;
    if request.name.trim().is_empty() {
        return Err(AppError::bad_request("Brand name is required"));
    }
    if request.slug.trim().is_empty() {
        return Err(AppError::bad_request("Slug is required"));
    }
    if state.store.brand_exists_by_slug(&request.slug).await {
        return Err(AppError::bad_request("Brand slug already exists"));
    }

    let now = Utc::now();
    let brand = Brand {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        slug: request.slug,
        logo_url: request.logo_url,
        website: request.website,
        description: request.description,
        default_warranty: request.default_warranty,
        default_return_policy: request.default_return_policy,
        is_verified: request.is_verified,
        created_at: now,
        updated_at: now,
    };
    let brand = state.store.insert_brand(brand).await.map_err(|err| {
        error!("Failed to create brand: {}", err);
        AppError::internal("Internal server error")
    })?;

    let mut policies = Vec::with_capacity(body.policies.len());
    for policy_request in body.policies {
        if policy_request.title.trim().is_empty() {
            return Err(AppError::bad_request("Title is required"));
        }
        if policy_request.description.trim().is_empty() {
            return Err(AppError::bad_request("Description is required"));
        }
        if let Some(duration) = policy_request.duration {
            if duration <= 0 {
                return Err(AppError::bad_request("Duration must be positive"));
            }
        }

        let policy = BrandPolicyRecord {
            id: Uuid::new_v4().to_string(),
            brand_id: brand.id.clone(),
            policy_type: policy_request.policy_type,
            title: policy_request.title,
            description: policy_request.description,
            duration: policy_request.duration,
            conditions: policy_request.conditions,
            process: policy_request.process,
            exclusions: policy_request.exclusions,
            is_active: policy_request.is_active,
            created_at: now,
            updated_at: now,
        };
        policies.push(state.store.insert_policy(policy).await.map_err(|err| {
            error!("Failed to create brand policy: {}", err);
            AppError::internal("Internal server error")
        })?);
    }

    info!("Created brand {} with {} policies", brand.id, policies.len());
    Ok(Json(json!({
        "success": true,
        "data": {
            "brand": brand,
            "policies": policies,
        },
        "message": "Brand and policies created successfully",
    })))
}

/// GET /api/brands - brand directory with active policies attached
pub async fn list_brands(
    State(state): State<AppState>,
    Query(query): Query<ListBrandsQuery>,
) -> AppResult<Json<Value>> {
    debug!("Handling GET /api/brands: {:?}", query);

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20);
    let filter = BrandFilter {
        search: query.search,
        verified_only: query.verified.as_deref() == Some("true"),
        page,
        limit,
    };

    let (brands, total) = state.store.list_brands(&filter).await;

    let mut data = Vec::with_capacity(brands.len());
    for brand in brands {
        let policies = state.store.active_policies_for_brand(&brand.id).await;
        data.push(BrandWithPolicies { brand, policies });
    }

    info!("Listed {} of {} brands", data.len(), total);
    Ok(Json(json!({
        "success": true,
        "data": data,
        "pagination": Pagination::new(page, limit, total),
    })))
}

// ---------------------------------------------------------------------------
// Deals

#[derive(Deserialize, Debug, Clone)]
pub struct ListDealsQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// POST /api/deals - record a deal; the discount percentage is derived
/// server-side
pub async fn create_deal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateDealRequest>,
) -> AppResult<Json<Value>> {
    debug!("Handling POST /api/deals");
    let principal = principal_from(&headers)?;

    if request.title.trim().is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::bad_request("Description is required"));
    }
    if request.original_price <= 0.0 {
        return Err(AppError::bad_request("Original price must be positive"));
    }
    if request.discounted_price <= 0.0 {
        return Err(AppError::bad_request("Discounted price must be positive"));
    }
    if request.category.trim().is_empty() {
        return Err(AppError::bad_request("Category is required"));
    }
    if request.url.trim().is_empty() {
        return Err(AppError::bad_request("Invalid URL"));
    }

    let expires_at = match request.expires_at.as_deref() {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    AppError::bad_request("Expiry date must be an RFC 3339 timestamp")
                })?,
        ),
        None => None,
    };

    let discount_percentage = ((request.original_price - request.discounted_price)
        / request.original_price
        * 100.0)
        .round() as i64;

    let now = Utc::now();
    let deal = Deal {
        id: Uuid::new_v4().to_string(),
        title: request.title,
        description: request.description,
        original_price: request.original_price,
        discounted_price: request.discounted_price,
        discount_percentage,
        category: request.category,
        tags: request.tags,
        url: request.url,
        image_url: request.image_url,
        expires_at,
        is_active: request.is_active,
        user_id: principal,
        created_at: now,
        updated_at: now,
    };

    let deal = state.store.insert_deal(deal).await.map_err(|err| {
        error!("Failed to create deal: {}", err);
        AppError::internal("Internal server error")
    })?;

    info!("Created deal {}", deal.id);
    Ok(Json(json!({
        "success": true,
        "data": deal,
        "message": "Deal created successfully",
    })))
}

/// GET /api/deals - active deals, newest first
pub async fn list_deals(
    State(state): State<AppState>,
    Query(query): Query<ListDealsQuery>,
) -> AppResult<Json<Value>> {
    debug!("Handling GET /api/deals: {:?}", query);

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10);
    let filter = DealFilter {
        category: query.category,
        search: query.search,
        page,
        limit,
    };

    let (deals, total) = state.store.list_deals(&filter).await;

    info!("Listed {} of {} deals", deals.len(), total);
    Ok(Json(json!({
        "success": true,
        "data": deals,
        "pagination": Pagination::new(page, limit, total),
    })))
}

// ---------------------------------------------------------------------------
// Waitlist

/// GET /api/waitlist - current signup count
pub async fn waitlist_count(State(state): State<AppState>) -> AppResult<Json<Value>> {
    debug!("Handling GET /api/waitlist");
    let count = state.store.waitlist_count().await;
    Ok(Json(json!({
        "success": true,
        "count": count,
    })))
}

/// POST /api/waitlist - join the waitlist; duplicate signups are reported as
/// success without incrementing the count
pub async fn join_waitlist(
    State(state): State<AppState>,
    Json(request): Json<WaitlistRequest>,
) -> AppResult<Json<Value>> {
    debug!("Handling POST /api/waitlist");

    if !is_valid_email(&request.email) {
        return Err(AppError::bad_request("Invalid email address"));
    }

    if state.store.waitlist_contains(&request.email).await {
        let count = state.store.waitlist_count().await;
        return Ok(Json(json!({
            "success": true,
            "message": "You're already on the waitlist!",
            "data": {
                "email": request.email,
                "source": request.source,
                "count": count,
                "joinedAt": Utc::now(),
            },
        })));
    }

    let count = state
        .store
        .push_waitlist(&request.email)
        .await
        .map_err(|err| {
            error!("Waitlist signup failed: {}", err);
            AppError::internal("Internal server error")
        })?;

    info!(
        "New waitlist signup: {} from {} - Total: {}",
        request.email, request.source, count
    );
    Ok(Json(json!({
        "success": true,
        "message": "Successfully joined waitlist! Check your email for the cheat sheet.",
        "data": {
            "email": request.email,
            "source": request.source,
            "count": count,
            "joinedAt": Utc::now(),
        },
    })))
}

// ---------------------------------------------------------------------------
// Contact

/// POST /api/contact - store a contact-form message
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> AppResult<Json<Value>> {
    debug!("Handling POST /api/contact");

    if request.name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }
    if !is_valid_email(&request.email) {
        return Err(AppError::bad_request("Invalid email address"));
    }
    if request.message.len() < 10 {
        return Err(AppError::bad_request(
            "Message must be at least 10 characters",
        ));
    }

    let contact = ContactMessage {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        email: request.email,
        message: request.message,
        timestamp: Utc::now(),
    };

    let contact = state.store.insert_contact(contact).await.map_err(|err| {
        error!("Contact form error: {}", err);
        AppError::internal("Failed to send message")
    })?;

    info!("Stored contact message {}", contact.id);
    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully!",
        "contact": contact,
    })))
}

/// GET /api/contact - stored messages plus count
pub async fn list_contacts(State(state): State<AppState>) -> AppResult<Json<Value>> {
    debug!("Handling GET /api/contact");
    let contacts = state.store.list_contacts().await;
    let count = contacts.len();
    Ok(Json(json!({
        "success": true,
        "contacts": contacts,
        "count": count,
    })))
}
