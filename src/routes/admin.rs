use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::{CreateComponentRequest, CreateMealRequest, StockAdjustRequest},
        orders::UpdateOrderStatusRequest,
        tenants::{CreateTenantRequest, TenantList, UpdateTenantRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Component, Meal, Order, Tenant},
    response::ApiResponse,
    routes::params::Pagination,
    services::{catalog_service, order_service, tenant_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(list_tenants).post(create_tenant))
        .route("/tenants/{id}", patch(update_tenant))
        .route("/tenants/{id}/meals", post(create_meal))
        .route("/meals/{id}/components", post(create_component))
        .route("/components/{id}/stock", patch(adjust_stock))
        .route("/orders/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/admin/tenants",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "All tenants", body = ApiResponse<TenantList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TenantList>>> {
    let resp = tenant_service::list_tenants(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = ApiResponse<Tenant>),
        (status = 400, description = "Invalid or duplicate slug/domain"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTenantRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Tenant>>)> {
    let resp = tenant_service::create_tenant(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Settings or activation changed", body = ApiResponse<Tenant>),
        (status = 404, description = "Tenant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_tenant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantRequest>,
) -> AppResult<Json<ApiResponse<Tenant>>> {
    let resp = tenant_service::update_tenant(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/tenants/{id}/meals",
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal created", body = ApiResponse<Meal>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateMealRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Meal>>)> {
    let resp = catalog_service::create_meal(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/admin/meals/{id}/components",
    params(
        ("id" = Uuid, Path, description = "Meal ID")
    ),
    request_body = CreateComponentRequest,
    responses(
        (status = 201, description = "Component created", body = ApiResponse<Component>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_component(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateComponentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Component>>)> {
    let resp = catalog_service::create_component(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/components/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Component ID")
    ),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<Component>),
        (status = 400, description = "Untracked stock or negative result")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<Component>>> {
    let resp = catalog_service::adjust_stock(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order confirmed or cancelled", body = ApiResponse<Order>),
        (status = 400, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, id, &payload.status).await?;
    Ok(Json(resp))
}
