use chrono::Utc;
use dancy_meals::{
    error::{AppError, AppResult},
    models::Tenant,
    tenancy::{HostClass, RequestTenant, TenantDirectory, classify_host, resolve_tenant},
};
use uuid::Uuid;

const MAIN: &str = "dancymeals.test";

struct InMemoryDirectory {
    tenants: Vec<Tenant>,
}

impl TenantDirectory for InMemoryDirectory {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tenant>> {
        Ok(self.tenants.iter().find(|t| t.slug == slug).cloned())
    }

    async fn find_by_custom_domain(&self, domain: &str) -> AppResult<Option<Tenant>> {
        Ok(self
            .tenants
            .iter()
            .find(|t| t.custom_domain.as_deref() == Some(domain))
            .cloned())
    }
}

fn tenant(slug: &str, custom_domain: Option<&str>, is_active: bool) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: Uuid::new_v4(),
        name: slug.to_string(),
        slug: slug.to_string(),
        custom_domain: custom_domain.map(str::to_string),
        is_active,
        minimum_order_amount: 0,
        offers_delivery: true,
        offers_pickup: true,
        created_at: now,
        updated_at: now,
    }
}

fn directory() -> InMemoryDirectory {
    InMemoryDirectory {
        tenants: vec![
            tenant("mama-dancy", Some("order.mamadancy.com"), true),
            tenant("closed", None, false),
        ],
    }
}

fn reserved() -> Vec<String> {
    vec!["www".into(), "api".into(), "admin".into(), "app".into()]
}

async fn resolve(host: &str) -> AppResult<RequestTenant> {
    resolve_tenant(classify_host(host, MAIN), &reserved(), &directory()).await
}

#[tokio::test]
async fn main_domain_and_ip_resolve_to_platform() {
    assert!(matches!(resolve(MAIN).await, Ok(RequestTenant::Platform)));
    assert!(matches!(resolve("127.0.0.1:3000").await, Ok(RequestTenant::Platform)));
}

#[tokio::test]
async fn reserved_subdomain_behaves_like_main_domain() {
    assert!(matches!(resolve("www.dancymeals.test").await, Ok(RequestTenant::Platform)));
    assert!(matches!(resolve("API.dancymeals.test").await, Ok(RequestTenant::Platform)));
}

#[tokio::test]
async fn subdomain_and_custom_domain_find_the_same_tenant() {
    let by_slug = resolve("mama-dancy.dancymeals.test").await.expect("slug");
    let by_domain = resolve("order.mamadancy.com").await.expect("domain");

    let slug_tenant = by_slug.tenant().expect("tenant");
    let domain_tenant = by_domain.tenant().expect("tenant");
    assert_eq!(slug_tenant.id, domain_tenant.id);
    assert_eq!(slug_tenant.slug, "mama-dancy");
}

#[tokio::test]
async fn unknown_host_is_not_found() {
    assert!(matches!(
        resolve("ghost.dancymeals.test").await,
        Err(AppError::TenantNotFound)
    ));
    assert!(matches!(
        resolve("unknown.example").await,
        Err(AppError::TenantNotFound)
    ));
}

#[tokio::test]
async fn inactive_tenant_is_unavailable() {
    let err = resolve("closed.dancymeals.test").await.unwrap_err();
    assert!(matches!(err, AppError::TenantUnavailable));
    assert_eq!(err.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn resolution_is_idempotent() {
    let first = resolve("mama-dancy.dancymeals.test").await.expect("first");
    let second = resolve("mama-dancy.dancymeals.test").await.expect("second");
    assert_eq!(
        first.tenant().map(|t| t.id),
        second.tenant().map(|t| t.id)
    );
}

#[tokio::test]
async fn platform_class_never_touches_directory() {
    let empty = InMemoryDirectory { tenants: vec![] };
    let resolved = resolve_tenant(HostClass::MainDomain, &[], &empty).await;
    assert!(matches!(resolved, Ok(RequestTenant::Platform)));
}
