use crate::{
    dto::{
        checkout::{MethodUpdate, SelectMethodRequest},
        orders::OrderWithItems,
    },
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, tenant::Storefront},
    response::{ApiResponse, Meta},
    services::{cart_service::load_fresh_cart, order_service::place_order},
    state::AppState,
    storefront::{
        AvailableMethods, CheckoutOptions, MethodSelector, checkout::ensure_can_proceed,
    },
};

/// Stored method checked against what the tenant offers right now. A withdrawn
/// method is reset to `Unset` in the session as well.
async fn load_selector(storefront: &Storefront) -> AppResult<MethodSelector> {
    let current = storefront.session.load_method().await?;
    let mut selector =
        MethodSelector::new(current, AvailableMethods::for_tenant(&storefront.tenant));
    if selector.revalidate() {
        storefront.session.save_method(selector.current()).await?;
        tracing::debug!(
            tenant = %storefront.tenant.slug,
            withdrawn = %current,
            "stored checkout method no longer offered"
        );
    }
    Ok(selector)
}

/// Entry to the delivery-method step: re-validate and possibly auto-select.
pub async fn checkout_options(storefront: &Storefront) -> AppResult<ApiResponse<CheckoutOptions>> {
    let mut selector = load_selector(storefront).await?;
    if selector.enter_step() {
        storefront.session.save_method(selector.current()).await?;
        tracing::debug!(
            tenant = %storefront.tenant.slug,
            method = %selector.current(),
            "checkout method adjusted"
        );
    }
    Ok(ApiResponse::success(
        "Checkout options",
        selector.options(),
        Some(Meta::empty()),
    ))
}

pub async fn select_method(
    storefront: &Storefront,
    payload: SelectMethodRequest,
) -> AppResult<ApiResponse<MethodUpdate>> {
    let mut selector = load_selector(storefront).await?;
    match selector.select(payload.method) {
        Ok(method) => {
            storefront.session.save_method(method).await?;
            Ok(ApiResponse::success(
                "Checkout method selected",
                MethodUpdate {
                    options: selector.options(),
                    error: None,
                },
                Some(Meta::empty()),
            ))
        }
        Err(err @ AppError::MethodUnavailable(_)) => {
            let message = err.to_string();
            Ok(ApiResponse::success(
                message.clone(),
                MethodUpdate {
                    options: selector.options(),
                    error: Some(message),
                },
                Some(Meta::empty()),
            ))
        }
        Err(other) => Err(other),
    }
}

/// Final step: place the order and empty this tenant's cart.
pub async fn proceed(
    state: &AppState,
    storefront: &Storefront,
    user: Option<&AuthUser>,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let cart = load_fresh_cart(state, storefront).await?;
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }
    let selector = load_selector(storefront).await?;

    let ticket = ensure_can_proceed(
        &cart,
        user.map(|u| u.user_id),
        &selector,
        storefront.tenant.minimum_order_amount,
    )?;

    let placed = place_order(state, &storefront.tenant, ticket, &cart).await?;
    storefront.session.clear_checkout().await?;

    Ok(ApiResponse::success(
        "Order placed",
        placed,
        Some(Meta::empty()),
    ))
}
