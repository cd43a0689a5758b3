use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{catalog::Menu, tenants::StorefrontProfile},
    error::AppResult,
    middleware::tenant::CurrentTenant,
    response::{ApiResponse, Meta},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/storefront", get(storefront_profile))
        .route("/meals", get(list_meals))
}

#[utoipa::path(
    get,
    path = "/api/storefront",
    responses(
        (status = 200, description = "Storefront served on this host", body = ApiResponse<StorefrontProfile>),
        (status = 404, description = "Tenant not found"),
        (status = 503, description = "Tenant unavailable")
    ),
    tag = "Storefront"
)]
pub async fn storefront_profile(
    CurrentTenant(tenant): CurrentTenant,
) -> Json<ApiResponse<StorefrontProfile>> {
    Json(ApiResponse::success(
        "Storefront",
        StorefrontProfile::from(&tenant),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/meals",
    responses(
        (status = 200, description = "Orderable meals with their components", body = ApiResponse<Menu>)
    ),
    tag = "Storefront"
)]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = catalog_service::list_menu(&state, &tenant).await?;
    Ok(Json(resp))
}
