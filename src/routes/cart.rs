use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartUpdate, UpdateCartItemRequest},
    error::AppResult,
    middleware::tenant::Storefront,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
    storefront::CartSummary,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_summary).post(add_to_cart).delete(clear_cart))
        .route(
            "/{component_id}",
            patch(update_quantity).delete(remove_from_cart),
        )
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart of the current storefront", body = ApiResponse<CartSummary>),
        (status = 404, description = "Tenant not found"),
        (status = 503, description = "Tenant unavailable")
    ),
    tag = "Cart"
)]
pub async fn cart_summary(
    State(state): State<AppState>,
    storefront: Storefront,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::get_cart(&state, &storefront).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added, or the stock problem in `error`", body = ApiResponse<CartUpdate>),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Component not found")
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    storefront: Storefront,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartUpdate>>> {
    let resp = cart_service::add_to_cart(&state, &storefront, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cart/{component_id}",
    params(
        ("component_id" = Uuid, Path, description = "Component ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity set; zero removes the line", body = ApiResponse<CartUpdate>),
        (status = 404, description = "Not in cart")
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    storefront: Storefront,
    Path(component_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartUpdate>>> {
    let resp = cart_service::update_quantity(&state, &storefront, component_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{component_id}",
    params(
        ("component_id" = Uuid, Path, description = "Component ID")
    ),
    responses(
        (status = 200, description = "Removed", body = ApiResponse<CartUpdate>),
        (status = 404, description = "Not in cart")
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    storefront: Storefront,
    Path(component_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartUpdate>>> {
    let resp = cart_service::remove_from_cart(&state, &storefront, component_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartUpdate>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(storefront: Storefront) -> AppResult<Json<ApiResponse<CartUpdate>>> {
    let resp = cart_service::clear_cart(&storefront).await?;
    Ok(Json(resp))
}
