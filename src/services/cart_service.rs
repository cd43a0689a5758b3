use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartUpdate, UpdateCartItemRequest},
    error::{AppError, AppResult},
    middleware::tenant::Storefront,
    response::{ApiResponse, Meta},
    services::catalog_service::{find_cart_component, load_cart_components},
    state::AppState,
    storefront::{Cart, CartSummary},
};

pub async fn get_cart(
    state: &AppState,
    storefront: &Storefront,
) -> AppResult<ApiResponse<CartSummary>> {
    let cart = load_fresh_cart(state, storefront).await?;
    Ok(ApiResponse::success("OK", cart.summary(), Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    storefront: &Storefront,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartUpdate>> {
    let mut cart = load_fresh_cart(state, storefront).await?;

    let component =
        find_cart_component(&state.orm, storefront.tenant.id, payload.component_id).await?;
    if component.meal_id != payload.meal_id {
        return Err(AppError::NotFound);
    }

    let max = state.config.max_quantity_per_component;
    let result = cart.add(&component, payload.quantity, max).map(|item| item.quantity);
    match result {
        Ok(quantity) => {
            storefront.session.save_cart(&cart).await?;
            tracing::debug!(
                tenant = %storefront.tenant.slug,
                component_id = %component.id,
                quantity,
                "cart item added"
            );
            Ok(cart_updated("Added to cart", &cart))
        }
        Err(err) => soft_fail(err, &cart),
    }
}

/// Set a line's quantity; zero or less removes it.
pub async fn update_quantity(
    state: &AppState,
    storefront: &Storefront,
    component_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartUpdate>> {
    if payload.quantity <= 0 {
        return remove_from_cart(state, storefront, component_id).await;
    }

    let mut cart = load_fresh_cart(state, storefront).await?;
    if cart.get(component_id).is_none() {
        return Err(AppError::NotFound);
    }
    let component = find_cart_component(&state.orm, storefront.tenant.id, component_id).await?;

    let max = state.config.max_quantity_per_component;
    let result = cart
        .update_quantity(&component, payload.quantity, max)
        .map(|_| ());
    match result {
        Ok(()) => {
            storefront.session.save_cart(&cart).await?;
            Ok(cart_updated("Cart updated", &cart))
        }
        Err(err) => soft_fail(err, &cart),
    }
}

pub async fn remove_from_cart(
    state: &AppState,
    storefront: &Storefront,
    component_id: Uuid,
) -> AppResult<ApiResponse<CartUpdate>> {
    let mut cart = load_fresh_cart(state, storefront).await?;
    cart.remove(component_id)?;
    storefront.session.save_cart(&cart).await?;
    tracing::debug!(
        tenant = %storefront.tenant.slug,
        component_id = %component_id,
        "cart item removed"
    );
    Ok(cart_updated("Removed from cart", &cart))
}

pub async fn clear_cart(storefront: &Storefront) -> AppResult<ApiResponse<CartUpdate>> {
    let mut cart = storefront.session.load_cart().await?;
    cart.clear();
    storefront.session.save_cart(&cart).await?;
    Ok(cart_updated("Cart cleared", &cart))
}

/// Load the tenant's cart and bring it in line with the catalog.
///
/// Lines are re-priced and dropped when their component is gone or can no
/// longer be ordered; the session is only written when something changed.
pub async fn load_fresh_cart(state: &AppState, storefront: &Storefront) -> AppResult<Cart> {
    let mut cart = storefront.session.load_cart().await?;
    if cart.is_empty() {
        return Ok(cart);
    }

    let ids: Vec<Uuid> = cart.items().iter().map(|i| i.component_id).collect();
    let catalog = load_cart_components(&state.orm, storefront.tenant.id, &ids).await?;
    if cart.refresh(&catalog, state.config.max_quantity_per_component) {
        tracing::debug!(tenant = %storefront.tenant.slug, "cart refreshed from catalog");
        storefront.session.save_cart(&cart).await?;
    }
    Ok(cart)
}

fn cart_updated(message: &str, cart: &Cart) -> ApiResponse<CartUpdate> {
    ApiResponse::success(
        message,
        CartUpdate {
            cart: cart.summary(),
            error: None,
        },
        Some(Meta::empty()),
    )
}

/// Stock and availability problems are reported in the body, not as a failure.
fn soft_fail(err: AppError, cart: &Cart) -> AppResult<ApiResponse<CartUpdate>> {
    match err {
        AppError::ComponentUnavailable(message) => Ok(ApiResponse::success(
            message.clone(),
            CartUpdate {
                cart: cart.summary(),
                error: Some(message),
            },
            Some(Meta::empty()),
        )),
        other => Err(other),
    }
}
