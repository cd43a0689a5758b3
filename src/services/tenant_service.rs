use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::tenants::{
        CreateTenantRequest, TenantList, UpdateTenantRequest, normalize_custom_domain,
        normalize_slug, validate_settings,
    },
    entity::tenants::{
        ActiveModel as TenantActive, Column as TenantCol, Entity as Tenants, Model as TenantModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Tenant,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_tenants(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<TenantList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Tenants::find().order_by_asc(TenantCol::Slug);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(tenant_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Tenants", TenantList { items }, Some(meta)))
}

pub async fn create_tenant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTenantRequest,
) -> AppResult<ApiResponse<Tenant>> {
    ensure_admin(user)?;
    payload.validate()?;

    let slug = normalize_slug(&payload.slug);
    if state
        .config
        .reserved_subdomains
        .iter()
        .any(|reserved| reserved == &slug)
    {
        return Err(AppError::BadRequest(format!("slug {slug} is reserved")));
    }
    let custom_domain =
        normalize_custom_domain(payload.custom_domain.as_deref(), &state.config.main_domain)?;

    ensure_unique(state, &slug, custom_domain.as_deref(), None).await?;

    let tenant = TenantActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        custom_domain: Set(custom_domain),
        is_active: Set(true),
        minimum_order_amount: Set(payload.minimum_order_amount),
        offers_delivery: Set(payload.offers_delivery),
        offers_pickup: Set(payload.offers_pickup),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(tenant = %tenant.slug, "tenant created");
    audit::record(
        &state.pool,
        Some(user.user_id),
        Some(tenant.id),
        "tenant_create",
        "tenants",
        serde_json::json!({ "slug": tenant.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Tenant created",
        tenant_from_entity(tenant),
        Some(Meta::empty()),
    ))
}

/// Apply settings changes and soft (de)activation. Tenants are never deleted.
pub async fn update_tenant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTenantRequest,
) -> AppResult<ApiResponse<Tenant>> {
    ensure_admin(user)?;

    let existing = Tenants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let minimum = payload
        .minimum_order_amount
        .unwrap_or(existing.minimum_order_amount);
    let delivery = payload.offers_delivery.unwrap_or(existing.offers_delivery);
    let pickup = payload.offers_pickup.unwrap_or(existing.offers_pickup);
    validate_settings(minimum, delivery, pickup)?;

    let custom_domain = match &payload.custom_domain {
        Some(domain) => Some(normalize_custom_domain(
            domain.as_deref(),
            &state.config.main_domain,
        )?),
        None => None,
    };
    if let Some(Some(domain)) = &custom_domain {
        ensure_unique(state, &existing.slug, Some(domain), Some(existing.id)).await?;
    }

    let mut active: TenantActive = existing.into();
    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        active.name = Set(name.trim().to_string());
    }
    if let Some(domain) = custom_domain {
        active.custom_domain = Set(domain);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.minimum_order_amount = Set(minimum);
    active.offers_delivery = Set(delivery);
    active.offers_pickup = Set(pickup);
    active.updated_at = Set(Utc::now().into());
    let tenant = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        Some(tenant.id),
        "tenant_update",
        "tenants",
        serde_json::json!({
            "is_active": tenant.is_active,
            "offers_delivery": tenant.offers_delivery,
            "offers_pickup": tenant.offers_pickup,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Tenant updated",
        tenant_from_entity(tenant),
        Some(Meta::empty()),
    ))
}

async fn ensure_unique(
    state: &AppState,
    slug: &str,
    custom_domain: Option<&str>,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Tenants::find();
    finder = match custom_domain {
        Some(domain) if exclude.is_some() => finder.filter(TenantCol::CustomDomain.eq(domain)),
        Some(domain) => finder.filter(
            TenantCol::Slug
                .eq(slug)
                .or(TenantCol::CustomDomain.eq(domain)),
        ),
        None => finder.filter(TenantCol::Slug.eq(slug)),
    };
    if let Some(id) = exclude {
        finder = finder.filter(TenantCol::Id.ne(id));
    }

    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::BadRequest(
            "slug or custom domain is already taken".into(),
        ));
    }
    Ok(())
}

pub fn tenant_from_entity(model: TenantModel) -> Tenant {
    Tenant {
        id: model.id,
        name: model.name,
        slug: model.slug,
        custom_domain: model.custom_domain,
        is_active: model.is_active,
        minimum_order_amount: model.minimum_order_amount,
        offers_delivery: model.offers_delivery,
        offers_pickup: model.offers_pickup,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
