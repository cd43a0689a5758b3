use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Tenant,
    tenancy::{HostClass, classify_host},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
    pub custom_domain: Option<String>,
    #[serde(default)]
    pub minimum_order_amount: i64,
    #[serde(default = "default_true")]
    pub offers_delivery: bool,
    #[serde(default = "default_true")]
    pub offers_pickup: bool,
}

fn default_true() -> bool {
    true
}

impl CreateTenantRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        validate_slug(&normalize_slug(&self.slug))?;
        validate_settings(
            self.minimum_order_amount,
            self.offers_delivery,
            self.offers_pickup,
        )
    }
}

/// Partial update of tenant settings; absent fields are left alone.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    /// `Some(None)` clears the custom domain.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub custom_domain: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub minimum_order_amount: Option<i64>,
    pub offers_delivery: Option<bool>,
    pub offers_pickup: Option<bool>,
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TenantList {
    pub items: Vec<Tenant>,
}

/// What a visitor of a storefront may see about its tenant.
#[derive(Debug, Serialize, ToSchema)]
pub struct StorefrontProfile {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub minimum_order_amount: i64,
    pub offers_delivery: bool,
    pub offers_pickup: bool,
}

impl From<&Tenant> for StorefrontProfile {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name.clone(),
            slug: tenant.slug.clone(),
            minimum_order_amount: tenant.minimum_order_amount,
            offers_delivery: tenant.offers_delivery,
            offers_pickup: tenant.offers_pickup,
        }
    }
}

pub fn normalize_slug(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

pub fn validate_slug(slug: &str) -> AppResult<()> {
    let valid = !slug.is_empty()
        && slug.len() <= 63
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(AppError::BadRequest(
            "slug must be a lowercase DNS label".into(),
        ));
    }
    Ok(())
}

pub fn validate_settings(minimum_order_amount: i64, delivery: bool, pickup: bool) -> AppResult<()> {
    if minimum_order_amount < 0 {
        return Err(AppError::BadRequest(
            "minimum_order_amount cannot be negative".into(),
        ));
    }
    if !delivery && !pickup {
        return Err(AppError::BadRequest(
            "at least one of delivery or pickup must be offered".into(),
        ));
    }
    Ok(())
}

/// Normalize a custom domain and make sure requests for it would reach the
/// tenant. IP literals and hosts under the platform domain are refused, since
/// the host classifier never treats them as custom domains.
pub fn normalize_custom_domain(
    domain: Option<&str>,
    main_domain: &str,
) -> AppResult<Option<String>> {
    let Some(domain) = domain.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    match classify_host(domain, main_domain) {
        HostClass::CustomDomain(host) if !host.is_empty() => Ok(Some(host)),
        HostClass::Ip => Err(AppError::BadRequest(
            "custom domain cannot be an IP address".into(),
        )),
        _ => Err(AppError::BadRequest(
            "custom domain cannot be part of the platform domain".into(),
        )),
    }
}
