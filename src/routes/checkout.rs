use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};

use crate::{
    dto::{
        checkout::{MethodUpdate, SelectMethodRequest},
        orders::OrderWithItems,
    },
    error::AppResult,
    middleware::{auth::AuthUser, tenant::Storefront},
    response::ApiResponse,
    services::checkout_service,
    state::AppState,
    storefront::CheckoutOptions,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout_options).post(proceed))
        .route("/method", put(select_method))
}

#[utoipa::path(
    get,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Offered methods and the current choice", body = ApiResponse<CheckoutOptions>)
    ),
    tag = "Checkout"
)]
pub async fn checkout_options(
    storefront: Storefront,
) -> AppResult<Json<ApiResponse<CheckoutOptions>>> {
    let resp = checkout_service::checkout_options(&storefront).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/checkout/method",
    request_body = SelectMethodRequest,
    responses(
        (status = 200, description = "Method selected, or the reason in `error`", body = ApiResponse<MethodUpdate>)
    ),
    tag = "Checkout"
)]
pub async fn select_method(
    storefront: Storefront,
    Json(payload): Json<SelectMethodRequest>,
) -> AppResult<Json<ApiResponse<MethodUpdate>>> {
    let resp = checkout_service::select_method(&storefront, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderWithItems>),
        (status = 303, description = "Empty cart or login required; see Location"),
        (status = 422, description = "Method unavailable, below minimum order or out of stock")
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn proceed(
    State(state): State<AppState>,
    storefront: Storefront,
    user: Option<AuthUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let resp = checkout_service::proceed(&state, &storefront, user.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
