use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::{
    error::AppError,
    models::Tenant,
    state::AppState,
    storefront::TenantSession,
    tenancy::{OrmTenantDirectory, RequestTenant, classify_host, resolve_tenant},
};

/// Resolve the storefront for the request host and attach it as [`RequestTenant`].
///
/// Unknown hosts end the request with 404, deactivated tenants with 503.
pub async fn resolve_request_tenant(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = request_host(&request);
    let class = classify_host(&host, &state.config.main_domain);
    let directory = OrmTenantDirectory::new(&state.orm);

    let resolved = match resolve_tenant(class, &state.config.reserved_subdomains, &directory).await
    {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::warn!(host = %host, error = %err, "tenant resolution failed");
            return Err(err);
        }
    };

    if let Some(tenant) = resolved.tenant() {
        tracing::debug!(host = %host, tenant = %tenant.slug, "tenant resolved");
    }

    request.extensions_mut().insert(resolved);
    Ok(next.run(request).await)
}

fn request_host(request: &Request) -> String {
    request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default()
        .to_string()
}

/// The storefront selected by the request host. Rejects platform hosts.
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub Tenant);

impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestTenant>() {
            Some(RequestTenant::Tenant(tenant)) => Ok(CurrentTenant(tenant.clone())),
            _ => Err(AppError::TenantNotFound),
        }
    }
}

/// Current tenant together with its slice of the visitor's session.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub tenant: Tenant,
    pub session: TenantSession,
}

impl<S> FromRequestParts<S> for Storefront
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentTenant(tenant) = CurrentTenant::from_request_parts(parts, state).await?;
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(anyhow::anyhow!(msg)))?;

        Ok(Self {
            session: TenantSession::new(session, tenant.id),
            tenant,
        })
    }
}
