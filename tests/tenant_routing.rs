use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use dancy_meals::{
    config::AppConfig, db::orm_from_pool, routes::create_api_router, state::AppState,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

// Platform hosts never reach the tenant table, so a pool that is never
// connected is enough here.
fn app() -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://localhost/unused")
        .expect("lazy pool");
    let state = AppState {
        orm: orm_from_pool(&pool),
        pool,
        config: Arc::new(AppConfig {
            database_url: "postgres://localhost/unused".into(),
            host: "127.0.0.1".into(),
            port: 3000,
            main_domain: "dancymeals.test".into(),
            reserved_subdomains: vec!["www".into(), "api".into(), "admin".into(), "app".into()],
            jwt_secret: "test-secret".into(),
            max_quantity_per_component: 10,
            secure_cookie: false,
            order_stale_after_minutes: 60,
        }),
    };

    Router::new()
        .nest("/api", create_api_router(state.clone()))
        .layer(SessionManagerLayer::new(MemoryStore::default()))
        .with_state(state)
}

async fn send(request: Request<Body>) -> Response {
    app().oneshot(request).await.expect("infallible")
}

fn get(uri: &str, host: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .expect("request")
}

async fn error_of(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    body["data"]["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn tenant_route_on_main_domain_is_not_found() {
    let response = send(get("/api/cart", "dancymeals.test")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(response).await, "Tenant not found");
}

#[tokio::test]
async fn host_port_is_ignored() {
    let response = send(get("/api/storefront", "DancyMeals.test:8080")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(response).await, "Tenant not found");
}

#[tokio::test]
async fn reserved_subdomain_and_ip_are_platform_hosts() {
    for host in ["www.dancymeals.test", "127.0.0.1:3000", "[::1]:3000"] {
        let response = send(get("/api/meals", host)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{host}");
        assert_eq!(error_of(response).await, "Tenant not found", "{host}");
    }
}

#[tokio::test]
async fn uri_host_is_used_without_host_header() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("http://dancymeals.test/api/checkout")
        .body(Body::empty())
        .expect("request");

    let response = send(request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(response).await, "Tenant not found");
}

#[tokio::test]
async fn platform_routes_pass_through_on_main_domain() {
    // Reaches the login handler, which rejects the missing JSON body.
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::HOST, "dancymeals.test")
        .body(Body::empty())
        .expect("request");

    let response = send(request).await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn missing_token_on_api_route_is_unauthorized_not_redirect() {
    let response = send(get("/api/admin/tenants", "dancymeals.test")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert_eq!(error_of(response).await, "Unauthorized");
}

#[tokio::test]
async fn guest_checkout_on_platform_host_is_not_found() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/checkout")
        .header(header::HOST, "dancymeals.test")
        .body(Body::empty())
        .expect("request");

    let response = send(request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
