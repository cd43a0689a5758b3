use std::sync::Arc;

use chrono::Utc;
use dancy_meals::{
    config::AppConfig,
    db::orm_from_pool,
    dto::checkout::SelectMethodRequest,
    error::AppError,
    middleware::tenant::Storefront,
    models::Tenant,
    services::checkout_service,
    state::AppState,
    storefront::{
        AvailableMethods, Cart, CartComponent, CheckoutMethod, MethodSelector, TenantSession,
        checkout::ensure_can_proceed,
    },
};
use sqlx::postgres::PgPoolOptions;
use tower_sessions::{MemoryStore, Session};
use uuid::Uuid;

fn methods(delivery: bool, pickup: bool) -> AvailableMethods {
    AvailableMethods { delivery, pickup }
}

fn tenant(delivery: bool, pickup: bool, minimum_order_amount: i64) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: Uuid::new_v4(),
        name: "Mama Dancy".into(),
        slug: "mama-dancy".into(),
        custom_domain: None,
        is_active: true,
        minimum_order_amount,
        offers_delivery: delivery,
        offers_pickup: pickup,
        created_at: now,
        updated_at: now,
    }
}

fn storefront(tenant: Tenant) -> Storefront {
    let session = Session::new(None, Arc::new(MemoryStore::default()), None);
    Storefront {
        session: TenantSession::new(session, tenant.id),
        tenant,
    }
}

fn cart_with(price: i64, quantity: i32) -> Cart {
    let component = CartComponent {
        id: Uuid::new_v4(),
        meal_id: Uuid::new_v4(),
        name: "Rice bowl".into(),
        meal_name: "Jollof Rice".into(),
        price,
        stock: None,
        available: true,
    };
    let mut cart = Cart::new();
    cart.add(&component, quantity, 10).expect("add");
    cart
}

#[test]
fn selecting_unoffered_method_keeps_state() {
    let mut selector = MethodSelector::new(CheckoutMethod::Delivery, methods(true, false));

    let err = selector.select(CheckoutMethod::Pickup).unwrap_err();

    assert!(matches!(err, AppError::MethodUnavailable(CheckoutMethod::Pickup)));
    assert_eq!(selector.current(), CheckoutMethod::Delivery);
}

#[test]
fn unset_is_never_selectable() {
    let mut selector = MethodSelector::new(CheckoutMethod::Unset, methods(true, true));
    assert!(selector.select(CheckoutMethod::Unset).is_err());
}

#[test]
fn single_offered_method_is_auto_selected() {
    let mut selector = MethodSelector::new(CheckoutMethod::Unset, methods(false, true));

    assert!(selector.enter_step());
    assert_eq!(selector.current(), CheckoutMethod::Pickup);
    assert!(!selector.enter_step());
}

#[test]
fn both_offered_stays_unset() {
    let mut selector = MethodSelector::new(CheckoutMethod::Unset, methods(true, true));

    assert!(!selector.enter_step());
    assert_eq!(selector.current(), CheckoutMethod::Unset);
}

#[test]
fn withdrawn_method_is_reset() {
    let mut selector = MethodSelector::new(CheckoutMethod::Delivery, methods(false, true));

    assert!(selector.enter_step());
    assert_eq!(selector.current(), CheckoutMethod::Pickup);

    let mut both = MethodSelector::new(CheckoutMethod::Pickup, methods(true, false));
    both.enter_step();
    assert_eq!(both.current(), CheckoutMethod::Delivery);
}

#[test]
fn revalidate_only_drops_withdrawn_methods() {
    let mut withdrawn = MethodSelector::new(CheckoutMethod::Delivery, methods(false, true));
    assert!(withdrawn.revalidate());
    assert_eq!(withdrawn.current(), CheckoutMethod::Unset);
    assert_eq!(withdrawn.options().current_method, CheckoutMethod::Unset);

    let mut offered = MethodSelector::new(CheckoutMethod::Pickup, methods(false, true));
    assert!(!offered.revalidate());
    assert_eq!(offered.current(), CheckoutMethod::Pickup);
}

#[test]
fn proceed_checks_run_in_order() {
    let selector = MethodSelector::new(CheckoutMethod::Unset, methods(true, true));
    let user = Some(Uuid::new_v4());

    assert!(matches!(
        ensure_can_proceed(&Cart::new(), None, &selector, 0),
        Err(AppError::EmptyCart)
    ));

    let cart = cart_with(1200, 1);
    assert!(matches!(
        ensure_can_proceed(&cart, None, &selector, 0),
        Err(AppError::Unauthenticated)
    ));
    assert!(matches!(
        ensure_can_proceed(&cart, user, &selector, 0),
        Err(AppError::MethodUnavailable(CheckoutMethod::Unset))
    ));

    let chosen = MethodSelector::new(CheckoutMethod::Delivery, methods(true, true));
    assert!(matches!(
        ensure_can_proceed(&cart, user, &chosen, 5000),
        Err(AppError::BelowMinimumOrder {
            minimum: 5000,
            total: 1200
        })
    ));

    let ticket = ensure_can_proceed(&cart, user, &chosen, 1000).expect("ticket");
    assert_eq!(ticket.total, 1200);
    assert_eq!(ticket.method, CheckoutMethod::Delivery);
}

#[test]
fn redirect_errors_point_to_the_right_place() {
    use axum::{http::header, response::IntoResponse};

    let response = AppError::EmptyCart.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/api/cart");

    let response = AppError::Unauthenticated.into_response();
    assert_eq!(response.headers()[header::LOCATION], "/api/auth/login");
}

#[tokio::test]
async fn options_persist_auto_selected_method() {
    let storefront = storefront(tenant(false, true, 0));

    let options = checkout_service::checkout_options(&storefront)
        .await
        .expect("options")
        .data
        .expect("data");

    assert!(!options.has_delivery);
    assert_eq!(options.current_method, CheckoutMethod::Pickup);
    assert_eq!(
        storefront.session.load_method().await.expect("load"),
        CheckoutMethod::Pickup
    );
}

#[tokio::test]
async fn unavailable_selection_is_reported_softly() {
    let storefront = storefront(tenant(true, false, 0));
    storefront
        .session
        .save_method(CheckoutMethod::Delivery)
        .await
        .expect("save");

    let update = checkout_service::select_method(
        &storefront,
        SelectMethodRequest {
            method: CheckoutMethod::Pickup,
        },
    )
    .await
    .expect("soft failure")
    .data
    .expect("data");

    assert!(update.error.is_some());
    assert_eq!(update.options.current_method, CheckoutMethod::Delivery);
    assert_eq!(
        storefront.session.load_method().await.expect("load"),
        CheckoutMethod::Delivery
    );
}

#[tokio::test]
async fn withdrawn_method_is_reset_when_selecting() {
    let storefront = storefront(tenant(false, true, 0));
    storefront
        .session
        .save_method(CheckoutMethod::Delivery)
        .await
        .expect("save");

    let update = checkout_service::select_method(
        &storefront,
        SelectMethodRequest {
            method: CheckoutMethod::Delivery,
        },
    )
    .await
    .expect("soft failure")
    .data
    .expect("data");

    assert!(update.error.is_some());
    assert!(!update.options.has_delivery);
    assert_eq!(update.options.current_method, CheckoutMethod::Unset);
    assert_eq!(
        storefront.session.load_method().await.expect("load"),
        CheckoutMethod::Unset
    );
}

#[tokio::test]
async fn selecting_after_withdrawal_reports_new_choice() {
    let storefront = storefront(tenant(false, true, 0));
    storefront
        .session
        .save_method(CheckoutMethod::Delivery)
        .await
        .expect("save");

    let update = checkout_service::select_method(
        &storefront,
        SelectMethodRequest {
            method: CheckoutMethod::Pickup,
        },
    )
    .await
    .expect("selected")
    .data
    .expect("data");

    assert!(update.error.is_none());
    assert_eq!(update.options.current_method, CheckoutMethod::Pickup);
}

fn lazy_state() -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .expect("lazy pool");
    AppState {
        orm: orm_from_pool(&pool),
        pool,
        config: Arc::new(AppConfig {
            database_url: "postgres://localhost/unused".into(),
            host: "127.0.0.1".into(),
            port: 3000,
            main_domain: "dancymeals.test".into(),
            reserved_subdomains: vec!["www".into()],
            jwt_secret: "test-secret".into(),
            max_quantity_per_component: 10,
            secure_cookie: false,
            order_stale_after_minutes: 60,
        }),
    }
}

#[tokio::test]
async fn proceed_with_empty_cart_changes_nothing() {
    let state = lazy_state();
    let storefront = storefront(tenant(true, true, 0));
    storefront
        .session
        .save_method(CheckoutMethod::Pickup)
        .await
        .expect("save");

    let result = checkout_service::proceed(&state, &storefront, None).await;

    assert!(matches!(result, Err(AppError::EmptyCart)));
    assert!(storefront.session.load_cart().await.expect("cart").is_empty());
    assert_eq!(
        storefront.session.load_method().await.expect("method"),
        CheckoutMethod::Pickup
    );
}

#[tokio::test]
async fn proceed_with_empty_cart_leaves_withdrawn_method_alone() {
    let state = lazy_state();
    let storefront = storefront(tenant(false, true, 0));
    storefront
        .session
        .save_method(CheckoutMethod::Delivery)
        .await
        .expect("save");

    let result = checkout_service::proceed(&state, &storefront, None).await;

    assert!(matches!(result, Err(AppError::EmptyCart)));
    assert_eq!(
        storefront.session.load_method().await.expect("method"),
        CheckoutMethod::Delivery
    );
}

#[tokio::test]
async fn bearer_extractor_rejects_missing_header_with_401() {
    use axum::extract::{FromRequestParts, OptionalFromRequestParts};
    use dancy_meals::middleware::auth::AuthUser;

    let state = lazy_state();
    let (mut parts, _) = axum::http::Request::builder()
        .uri("/api/orders")
        .body(())
        .expect("request")
        .into_parts();

    let strict = <AuthUser as FromRequestParts<AppState>>::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(strict, AppError::Unauthorized));
    assert_eq!(strict.status(), axum::http::StatusCode::UNAUTHORIZED);

    let optional =
        <AuthUser as OptionalFromRequestParts<AppState>>::from_request_parts(&mut parts, &state)
            .await
            .expect("optional");
    assert!(optional.is_none());
}
