use std::future::Future;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    db::OrmConn,
    entity::tenants::{Column as TenantCol, Entity as Tenants},
    error::{AppError, AppResult},
    models::Tenant,
    services::tenant_service::tenant_from_entity,
    tenancy::host::HostClass,
};

/// Tenant context attached to every request by the tenant middleware.
#[derive(Debug, Clone)]
pub enum RequestTenant {
    /// Main domain or bare IP: no storefront selected.
    Platform,
    Tenant(Tenant),
}

impl RequestTenant {
    pub fn tenant(&self) -> Option<&Tenant> {
        match self {
            RequestTenant::Platform => None,
            RequestTenant::Tenant(tenant) => Some(tenant),
        }
    }
}

/// Read access to tenant records keyed by slug or custom domain.
pub trait TenantDirectory {
    fn find_by_slug(&self, slug: &str) -> impl Future<Output = AppResult<Option<Tenant>>> + Send;

    fn find_by_custom_domain(
        &self,
        domain: &str,
    ) -> impl Future<Output = AppResult<Option<Tenant>>> + Send;
}

pub struct OrmTenantDirectory<'a> {
    conn: &'a OrmConn,
}

impl<'a> OrmTenantDirectory<'a> {
    pub fn new(conn: &'a OrmConn) -> Self {
        Self { conn }
    }
}

impl TenantDirectory for OrmTenantDirectory<'_> {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tenant>> {
        let tenant = Tenants::find()
            .filter(TenantCol::Slug.eq(slug))
            .one(self.conn)
            .await?;
        Ok(tenant.map(tenant_from_entity))
    }

    async fn find_by_custom_domain(&self, domain: &str) -> AppResult<Option<Tenant>> {
        let tenant = Tenants::find()
            .filter(TenantCol::CustomDomain.eq(domain))
            .one(self.conn)
            .await?;
        Ok(tenant.map(tenant_from_entity))
    }
}

/// Turn a host classification into the request's tenant context.
///
/// Reserved subdomains are treated as the main domain. Unknown hosts fail with
/// [`AppError::TenantNotFound`], deactivated tenants with
/// [`AppError::TenantUnavailable`].
pub async fn resolve_tenant<D: TenantDirectory>(
    class: HostClass,
    reserved_subdomains: &[String],
    directory: &D,
) -> AppResult<RequestTenant> {
    let found = match class {
        HostClass::Ip | HostClass::MainDomain => return Ok(RequestTenant::Platform),
        HostClass::Subdomain(slug) => {
            if reserved_subdomains.iter().any(|r| r.eq_ignore_ascii_case(&slug)) {
                return Ok(RequestTenant::Platform);
            }
            directory.find_by_slug(&slug).await?
        }
        HostClass::CustomDomain(domain) => directory.find_by_custom_domain(&domain).await?,
    };

    match found {
        None => Err(AppError::TenantNotFound),
        Some(tenant) if !tenant.is_active => Err(AppError::TenantUnavailable),
        Some(tenant) => Ok(RequestTenant::Tenant(tenant)),
    }
}
