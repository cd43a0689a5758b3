use axum::{Router, middleware::from_fn_with_state};

use crate::{middleware::tenant::resolve_request_tenant, state::AppState};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod storefront;

// Every API request goes through tenant resolution; platform-only routes
// simply ignore the attached context.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(storefront::router())
        .nest("/auth", auth::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
        .layer(from_fn_with_state(state, resolve_request_tenant))
}
