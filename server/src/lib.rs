//! Zavvi application service
//!
//! JSON-over-HTTP API for purchase tracking: purchases with derived
//! warranty/return-policy benefits, the brand policy catalog, deals, the
//! waitlist, and contact messages.

pub mod catalog;
pub mod intake;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::intake::PurchaseService;
use crate::store::ZavviStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ZavviStore,
    pub purchases: PurchaseService,
}

impl AppState {
    pub fn new(store: ZavviStore) -> Self {
        let purchases = PurchaseService::new(store.clone());
        Self { store, purchases }
    }
}

/// Custom error type for API responses. The body keeps the
/// `{success, error}` envelope the web client expects.
#[derive(Debug)]
pub struct AppError {
    pub status_code: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Internal server error: {}", err),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = axum::Json(serde_json::json!({
            "success": false,
            "error": self.message,
        }));
        (self.status_code, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Health check endpoint
async fn healthz() -> impl IntoResponse {
    "OK"
}

/// Create the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/api/purchases",
            get(routes::list_purchases).post(routes::create_purchase),
        )
        .route(
            "/api/brands",
            get(routes::list_brands).post(routes::create_brand),
        )
        .route(
            "/api/deals",
            get(routes::list_deals).post(routes::create_deal),
        )
        .route(
            "/api/waitlist",
            get(routes::waitlist_count).post(routes::join_waitlist),
        )
        .route(
            "/api/contact",
            get(routes::list_contacts).post(routes::submit_contact),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
